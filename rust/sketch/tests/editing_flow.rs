// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end editing flow: build a two-room plan, split the shared wall in
//! the background, clone, and query.

use approx::assert_relative_eq;
use nalgebra::{Point2, Vector2};
use plan_lite_sketch::{
    clone_sketch_data, Background, Polygon, ReferencePointKind, Segment, Sketch, TopologyName,
};

fn p(x: f64, y: f64) -> Point2<f64> {
    Point2::new(x, y)
}

/// Kitchen (0..4) and living room (4..10) sharing the wall at x = 4.
fn plan() -> (Sketch, [plan_lite_sketch::FaceKey; 2], plan_lite_sketch::CurveKey) {
    let mut sketch = Sketch::new();
    let k: Vec<_> = [(0.0, 0.0), (4.0, 0.0), (10.0, 0.0), (10.0, 5.0), (4.0, 5.0), (0.0, 5.0)]
        .iter()
        .map(|&(x, y)| sketch.add_point(x, y))
        .collect();
    let l01 = sketch.add_line(k[0], k[1]).unwrap();
    let shared = sketch.add_line(k[1], k[4]).unwrap();
    let l45 = sketch.add_line(k[4], k[5]).unwrap();
    let l50 = sketch.add_line(k[5], k[0]).unwrap();
    let l12 = sketch.add_line(k[1], k[2]).unwrap();
    let l23 = sketch.add_line(k[2], k[3]).unwrap();
    let l34 = sketch.add_line(k[3], k[4]).unwrap();

    let kitchen_loop = sketch.add_wire(&[l01, shared, l45, l50]).unwrap();
    let living_loop = sketch.add_wire(&[l12, l23, l34, shared]).unwrap();
    let kitchen = sketch.add_face_with_loops(kitchen_loop, &[]).unwrap();
    let living = sketch.add_face_with_loops(living_loop, &[]).unwrap();
    sketch.face_mut(kitchen).unwrap().add_topo("1_kitchen");
    sketch.face_mut(living).unwrap().add_topo("2_living");

    sketch.set_background(Background::new(vec![Polygon::new(
        vec![
            Segment::line(p(0.0, 0.0), p(10.0, 0.0)),
            Segment::line(p(10.0, 0.0), p(10.0, 5.0)),
            Segment::line(p(10.0, 5.0), p(0.0, 5.0)),
            Segment::line(p(0.0, 5.0), p(0.0, 0.0)),
        ],
        Vec::new(),
    )]));
    (sketch, [kitchen, living], shared)
}

#[test]
fn shared_wall_is_one_edge() {
    let (sketch, faces, shared) = plan();
    let edges = sketch.all_edges_from_faces(&faces, false).unwrap();
    assert_eq!(edges.len(), 7);
    assert_eq!(edges.iter().filter(|&&e| e == shared).count(), 1);

    let uses = sketch.faces_by_edge(shared).unwrap();
    assert_eq!(uses.iter().map(|u| u.face).collect::<Vec<_>>(), faces.to_vec());
}

#[test]
fn exported_regions_are_normalized() {
    let (sketch, faces, _) = plan();
    for face in faces {
        let first = sketch.to_math_polygon(face).unwrap();
        let second = sketch.to_math_polygon(face).unwrap();
        assert_eq!(first, second);
        assert!(first.is_normalized());
    }
    assert_relative_eq!(sketch.face_area(faces[0]).unwrap(), 20.0);
    assert_relative_eq!(sketch.face_area(faces[1]).unwrap(), 30.0);

    let region = sketch.to_builder_region(faces[1]).unwrap();
    let topo: TopologyName = region.topo_name.unwrap().parse().unwrap();
    assert_eq!(topo.face_id, 2);
    assert_eq!(topo.name.as_deref(), Some("living"));
}

#[test]
fn background_split_follows_wall_edit() {
    let (mut sketch, _, _) = plan();
    let original = [Segment::line(p(0.0, 0.0), p(10.0, 0.0))];
    let replacement = [
        Segment::line(p(0.0, 0.0), p(4.0, 0.0)),
        Segment::line(p(4.0, 0.0), p(10.0, 0.0)),
    ];
    assert_eq!(sketch.change_background_by_edges(&original, &replacement).unwrap(), 1);
    assert_eq!(sketch.background_outer().len(), 5);
    assert_eq!(sketch.background_outer()[1], replacement[1]);
}

#[test]
fn clone_then_edit_leaves_source_alone() {
    let (sketch, faces, _) = plan();
    let mut copy = clone_sketch_data(&sketch);
    let copied_faces = copy.faces().to_vec();
    copy.copy_face(copied_faces[0], &Vector2::new(0.0, 10.0)).unwrap();
    copy.face_mut(copied_faces[1])
        .unwrap()
        .replace_topo_name("2_living", "1_kitchen");

    assert_eq!(sketch.face_count(), 2);
    assert_eq!(copy.face_count(), 3);
    assert_eq!(sketch.face(faces[1]).unwrap().topos(), &["2_living"]);
    assert_eq!(copy.face(copied_faces[1]).unwrap().topos(), &["1_kitchen"]);
}

#[test]
fn snapping_points_cover_the_plan() {
    let (sketch, _, _) = plan();
    let refs = sketch.reference_points();
    let endpoints = refs
        .iter()
        .filter(|r| r.kind == ReferencePointKind::Endpoint)
        .count();
    let midpoints = refs
        .iter()
        .filter(|r| r.kind == ReferencePointKind::Midpoint)
        .count();
    assert_eq!(endpoints, 6);
    assert_eq!(midpoints, 7);
    assert!(refs.iter().any(|r| r.point == p(4.0, 2.5)));
}

#[test]
fn dimensions_from_inside_a_room() {
    let (sketch, faces, _) = plan();
    let hits = sketch.face_dimensions(faces[1], &p(6.0, 1.0)).unwrap();
    assert_relative_eq!(hits.left.unwrap().distance, 2.0);
    assert_relative_eq!(hits.right.unwrap().distance, 4.0);
    assert_relative_eq!(hits.up.unwrap().distance, 4.0);
    assert_relative_eq!(hits.down.unwrap().distance, 1.0);
}
