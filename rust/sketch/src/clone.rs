// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Deep copies of sketches and faces.
//!
//! A clone allocates fresh arenas, so no key of the clone refers to an entity
//! of the source. Entities are copied points first, then curves, wires and
//! faces. Loops are assigned through [`Sketch::set_outer_loop`] and
//! [`Sketch::set_inner_loops`] as each face is copied, then every wire's
//! back-reference is pointed at the copy of its source owner.

use nalgebra::Vector2;
use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::keys::*;
use crate::sketch::{Curve, PointData, Sketch, Wire};

/// Source-to-clone key mapping produced by [`Sketch::clone_with_map`].
#[derive(Debug, Clone, Default)]
pub struct SketchKeyMap {
    pub points: FxHashMap<PointKey, PointKey>,
    pub curves: FxHashMap<CurveKey, CurveKey>,
    pub wires: FxHashMap<WireKey, WireKey>,
    pub faces: FxHashMap<FaceKey, FaceKey>,
}

/// Returns an independent deep copy of `sketch`.
pub fn clone_sketch_data(sketch: &Sketch) -> Sketch {
    sketch.clone_with_map().0
}

/// Copies a curve onto already-mapped point keys.
fn remap_curve(curve: &Curve, points: &FxHashMap<PointKey, PointKey>, offset: &Vector2<f64>) -> Option<Curve> {
    Some(match *curve {
        Curve::Line { from, to } => Curve::Line {
            from: *points.get(&from)?,
            to: *points.get(&to)?,
        },
        Curve::Arc {
            from,
            to,
            center,
            radius,
            clockwise,
        } => Curve::Arc {
            from: *points.get(&from)?,
            to: *points.get(&to)?,
            center: center + offset,
            radius,
            clockwise,
        },
        Curve::Circle {
            center,
            radius,
            clockwise,
        } => Curve::Circle {
            center: center + offset,
            radius,
            clockwise,
        },
    })
}

impl Sketch {
    /// Deep copy plus the mapping from source keys to clone keys.
    pub fn clone_with_map(&self) -> (Sketch, SketchKeyMap) {
        let mut out = Sketch::with_tolerance(self.tolerance);
        let mut map = SketchKeyMap::default();
        let no_offset = Vector2::zeros();

        for (key, data) in &self.points {
            map.points.insert(key, out.points.insert(*data));
        }

        for (key, curve) in &self.curves {
            // Curves always reference live points of their own sketch.
            if let Some(copy) = remap_curve(curve, &map.points, &no_offset) {
                map.curves.insert(key, out.curves.insert(copy));
            }
        }

        for (key, wire) in &self.wires {
            let curves: Option<Vec<CurveKey>> =
                wire.curves.iter().map(|ck| map.curves.get(ck).copied()).collect();
            if let Some(curves) = curves {
                let copy = Wire {
                    curves,
                    orientations: wire.orientations.clone(),
                    face: None,
                };
                map.wires.insert(key, out.wires.insert(copy));
            }
        }

        for &face_key in &self.face_order {
            let Some(face) = self.faces.get(face_key) else {
                continue;
            };
            let new_face = out.add_face();
            if let Some(outer) = face.outer_loop.and_then(|w| map.wires.get(&w).copied()) {
                let assigned = out.set_outer_loop(new_face, outer);
                debug_assert!(assigned.is_ok(), "outer loop of a fresh face: {assigned:?}");
            }
            let holes: Vec<WireKey> = face
                .inner_loops
                .iter()
                .filter_map(|w| map.wires.get(w).copied())
                .collect();
            let assigned = out.set_inner_loops(new_face, &holes);
            debug_assert!(assigned.is_ok(), "hole loops of a fresh face: {assigned:?}");
            out.faces[new_face].topos = face.topos.clone();
            map.faces.insert(face_key, new_face);
        }

        // A wire shared by several faces belongs to the one that assigned it
        // last, which need not be the last face replayed above.
        for (key, wire) in &self.wires {
            let (Some(&new_wire), Some(owner)) = (map.wires.get(&key), wire.face) else {
                continue;
            };
            if let Some(&new_owner) = map.faces.get(&owner) {
                let restored = out.reassert_wire_face(new_wire, new_owner);
                debug_assert!(restored.is_ok(), "owner of a cloned wire: {restored:?}");
            }
        }

        out.guidelines = self
            .guidelines
            .iter()
            .filter_map(|ck| map.curves.get(ck).copied())
            .collect();
        out.background = self.background.clone();

        tracing::debug!(
            points = map.points.len(),
            curves = map.curves.len(),
            wires = map.wires.len(),
            faces = map.faces.len(),
            "Cloned sketch"
        );
        (out, map)
    }

    /// Copies one face onto fresh points, curves and wires moved by `offset`.
    ///
    /// Points shared between the face's loops stay shared in the copy.
    pub fn copy_face(&mut self, face: FaceKey, offset: &Vector2<f64>) -> Result<FaceKey> {
        let source = self.faces.get(face).ok_or(Error::FaceNotFound(face))?;
        let outer = source.outer_loop.ok_or(Error::MissingOuterLoop(face))?;
        let holes = source.inner_loops.clone();
        let topos = source.topos.clone();

        let mut point_map: FxHashMap<PointKey, PointKey> = FxHashMap::default();
        let mut curve_map: FxHashMap<CurveKey, CurveKey> = FxHashMap::default();
        let mut new_loops = Vec::with_capacity(1 + holes.len());

        for wire_key in std::iter::once(outer).chain(holes.iter().copied()) {
            let wire = self.wires.get(wire_key).ok_or(Error::WireNotFound(wire_key))?.clone();
            let mut curves = Vec::with_capacity(wire.curves.len());
            for &ck in &wire.curves {
                if let Some(&copied) = curve_map.get(&ck) {
                    curves.push(copied);
                    continue;
                }
                let curve = *self.curves.get(ck).ok_or(Error::CurveNotFound(ck))?;
                if let Some((from, to)) = curve.endpoint_keys() {
                    for pk in [from, to] {
                        if !point_map.contains_key(&pk) {
                            let p = self.point_coords(pk).ok_or(Error::PointNotFound(pk))?;
                            let moved = p + offset;
                            let new_key = self.points.insert(PointData {
                                x: moved.x,
                                y: moved.y,
                            });
                            point_map.insert(pk, new_key);
                        }
                    }
                }
                let copy = remap_curve(&curve, &point_map, offset).ok_or(Error::CurveNotFound(ck))?;
                let new_key = self.curves.insert(copy);
                curve_map.insert(ck, new_key);
                curves.push(new_key);
            }
            new_loops.push(self.wires.insert(Wire {
                curves,
                orientations: wire.orientations,
                face: None,
            }));
        }

        let new_face = self.add_face();
        self.set_outer_loop(new_face, new_loops[0])?;
        self.set_inner_loops(new_face, &new_loops[1..])?;
        self.faces[new_face].topos = topos;

        tracing::debug!(
            ?face,
            copy = ?new_face,
            points = point_map.len(),
            curves = curve_map.len(),
            "Copied face"
        );
        Ok(new_face)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::construction::make_rectangle;
    use nalgebra::Point2;

    fn p(x: f64, y: f64) -> Point2<f64> {
        Point2::new(x, y)
    }

    fn room_with_hole() -> (Sketch, FaceKey) {
        let mut sketch = Sketch::new();
        let outer = sketch
            .add_polyline_loop(&[p(0.0, 0.0), p(4.0, 0.0), p(4.0, 4.0), p(0.0, 4.0)])
            .unwrap();
        let a = sketch.add_point(3.0, 2.0);
        let b = sketch.add_point(1.0, 2.0);
        let top = sketch.add_arc(a, b, p(2.0, 2.0), false).unwrap();
        let bottom = sketch.add_arc(b, a, p(2.0, 2.0), false).unwrap();
        let hole = sketch.add_wire(&[top, bottom]).unwrap();
        let face = sketch.add_face_with_loops(outer, &[hole]).unwrap();
        sketch.face_mut(face).unwrap().add_topo("1_room");
        (sketch, face)
    }

    #[test]
    fn clone_preserves_structure() {
        let (mut sketch, face) = room_with_hole();
        let a = sketch.add_point(9.0, 0.0);
        let b = sketch.add_point(9.0, 5.0);
        let guide = sketch.add_line(a, b).unwrap();
        sketch.add_guideline(guide).unwrap();

        let (copy, map) = sketch.clone_with_map();
        assert_eq!(copy.point_count(), sketch.point_count());
        assert_eq!(copy.curve_count(), sketch.curve_count());
        assert_eq!(copy.wire_count(), sketch.wire_count());
        assert_eq!(copy.face_count(), 1);
        assert_eq!(copy.guidelines(), &[map.curves[&guide]]);

        let new_face = map.faces[&face];
        let data = copy.face(new_face).unwrap();
        assert_eq!(data.topos(), &["1_room"]);
        for wire in data.loops() {
            assert_eq!(copy.wire_face(wire), Some(new_face));
        }
        assert_eq!(copy.face_area(new_face).unwrap(), sketch.face_area(face).unwrap());
    }

    #[test]
    fn clone_is_independent_both_ways() {
        let mut sketch = Sketch::new();
        let (face, _, lines) = make_rectangle(&mut sketch, p(0.0, 0.0), p(2.0, 2.0)).unwrap();
        let (mut copy, map) = sketch.clone_with_map();

        let (from, _) = copy.curve(map.curves[&lines[0]]).unwrap().endpoint_keys().unwrap();
        copy.move_point(from, p(-5.0, -5.0)).unwrap();
        assert_eq!(sketch.segment(lines[0]).unwrap().start(), Some(p(0.0, 0.0)));

        let (from, _) = sketch.curve(lines[0]).unwrap().endpoint_keys().unwrap();
        sketch.move_point(from, p(1.0, -1.0)).unwrap();
        let copied = copy.segment(map.curves[&lines[0]]).unwrap();
        assert_eq!(copied.start(), Some(p(-5.0, -5.0)));

        copy.face_mut(map.faces[&face]).unwrap().add_topo("2_copy");
        assert!(sketch.face(face).unwrap().topos().is_empty());
    }

    #[test]
    fn clone_does_not_touch_source_back_references() {
        let (sketch, face) = room_with_hole();
        let copy = clone_sketch_data(&sketch);
        for wire in sketch.face(face).unwrap().loops() {
            assert_eq!(sketch.wire_face(wire), Some(face));
        }
        assert_eq!(copy.face_count(), sketch.face_count());
    }

    #[test]
    fn copy_face_translates_and_shares_nothing() {
        let (mut sketch, face) = room_with_hole();
        let points_before = sketch.point_count();
        let copy = sketch.copy_face(face, &Vector2::new(10.0, 0.0)).unwrap();

        assert_eq!(sketch.face_count(), 2);
        assert_eq!(sketch.point_count(), points_before * 2);
        assert_eq!(sketch.face(copy).unwrap().topos(), &["1_room"]);

        let (min, max) = sketch.face_bounds(copy).unwrap();
        assert_eq!(min, p(10.0, 0.0));
        assert_eq!(max, p(14.0, 4.0));
        assert!((sketch.face_area(copy).unwrap() - sketch.face_area(face).unwrap()).abs() < 1e-9);

        let original_edges = sketch.all_edges_from_faces(&[face], false).unwrap();
        let copied_edges = sketch.all_edges_from_faces(&[copy], false).unwrap();
        assert!(copied_edges.iter().all(|e| !original_edges.contains(e)));
    }

    #[test]
    fn copy_face_requires_outer_loop() {
        let mut sketch = Sketch::new();
        let face = sketch.add_face();
        assert!(matches!(
            sketch.copy_face(face, &Vector2::zeros()),
            Err(Error::MissingOuterLoop(_))
        ));
    }

    #[test]
    fn clone_keeps_the_last_face_to_assign_a_shared_wire() {
        let mut sketch = Sketch::new();
        let wire = sketch
            .add_polyline_loop(&[p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0)])
            .unwrap();
        let first = sketch.add_face();
        let second = sketch.add_face();
        sketch.set_outer_loop(second, wire).unwrap();
        sketch.set_outer_loop(first, wire).unwrap();
        assert_eq!(sketch.wire_face(wire), Some(first));

        let (copy, map) = sketch.clone_with_map();
        assert_eq!(copy.wire_face(map.wires[&wire]), Some(map.faces[&first]));
        assert_eq!(
            copy.face(map.faces[&second]).unwrap().outer_loop(),
            Some(map.wires[&wire])
        );
    }

    #[test]
    fn clone_keeps_unowned_wires_unowned() {
        let mut sketch = Sketch::new();
        let loose = sketch
            .add_polyline_loop(&[p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0)])
            .unwrap();
        let (copy, map) = sketch.clone_with_map();
        assert_eq!(copy.wire_face(map.wires[&loose]), None);
    }
}
