// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Queries over a sketch: shared-edge lookup, edge and point traversal with
//! identity de-duplication, snapping reference points, and the two free
//! geometric helpers used by dimensioning tools.
//!
//! Traversals visit faces in insertion order, the outer loop before the
//! holes, then guidelines. An entity reachable through several faces is
//! reported once, at its first occurrence.

use nalgebra::{Point2, Vector2};
use rustc_hash::FxHashSet;
use serde::Serialize;
use std::f64::consts::FRAC_PI_2;

use crate::config::Tolerance;
use crate::error::{Error, Result};
use crate::keys::*;
use crate::segment::Segment;
use crate::sketch::{Curve, Sketch};

/// One use of an edge by a face loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceEdgeUse {
    pub face: FaceKey,
    pub wire: WireKey,
    /// `true` if `wire` is the face's outer loop.
    pub is_outer: bool,
}

/// Kind of a snapping reference point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferencePointKind {
    Endpoint,
    Midpoint,
    Center,
    Quadrant,
}

/// A snapping candidate generated from a curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferencePoint {
    pub point: Point2<f64>,
    pub kind: ReferencePointKind,
    /// The curve that produced the point (the first one, for shared endpoints).
    pub curve: CurveKey,
}

/// Nearest boundary hit along one ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub point: Point2<f64>,
    pub distance: f64,
}

/// Nearest boundary hits in the four axis directions.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DirectionalHits {
    pub left: Option<RayHit>,
    pub right: Option<RayHit>,
    pub up: Option<RayHit>,
    pub down: Option<RayHit>,
}

/// Center and radius of an arc given by chord and sagitta.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcCenter {
    pub center: Point2<f64>,
    pub radius: f64,
}

impl Sketch {
    /// Every face loop that uses `edge`, by key or by equal geometry.
    pub fn faces_by_edge(&self, edge: CurveKey) -> Result<Vec<FaceEdgeUse>> {
        let target = self.segment(edge).ok_or(Error::CurveNotFound(edge))?;
        Ok(self.collect_face_uses(|ck, seg| ck == edge || seg.geometric_eq(&target, &self.tolerance)))
    }

    /// Every face loop with a curve geometrically equal to `segment`.
    pub fn faces_by_segment(&self, segment: &Segment) -> Vec<FaceEdgeUse> {
        self.collect_face_uses(|_, seg| seg.geometric_eq(segment, &self.tolerance))
    }

    fn collect_face_uses<F>(&self, mut matches: F) -> Vec<FaceEdgeUse>
    where
        F: FnMut(CurveKey, &Segment) -> bool,
    {
        let mut uses = Vec::new();
        for &face_key in &self.face_order {
            let Some(face) = self.faces.get(face_key) else {
                continue;
            };
            for wire_key in face.loops() {
                let Some(wire) = self.wires.get(wire_key) else {
                    continue;
                };
                let hit = wire.curves.iter().any(|&ck| {
                    self.segment(ck).is_some_and(|seg| matches(ck, &seg))
                });
                if hit {
                    uses.push(FaceEdgeUse {
                        face: face_key,
                        wire: wire_key,
                        is_outer: face.outer_loop == Some(wire_key),
                    });
                }
            }
        }
        uses
    }

    /// Edges of the given faces, each reported once.
    pub fn all_edges_from_faces(&self, faces: &[FaceKey], outer_only: bool) -> Result<Vec<CurveKey>> {
        let mut seen = FxHashSet::default();
        let mut edges = Vec::new();
        for &face in faces {
            self.push_face_edges(face, outer_only, &mut seen, &mut edges)?;
        }
        Ok(edges)
    }

    /// Edges of every face, each reported once.
    pub fn all_edges(&self, outer_only: bool) -> Vec<CurveKey> {
        let mut seen = FxHashSet::default();
        let mut edges = Vec::new();
        for &face in &self.face_order {
            let pushed = self.push_face_edges(face, outer_only, &mut seen, &mut edges);
            debug_assert!(pushed.is_ok(), "face_order only holds live faces: {pushed:?}");
        }
        edges
    }

    /// Face edges followed by guidelines, each reported once.
    pub fn all_curves(&self, outer_only: bool) -> Vec<CurveKey> {
        let mut seen = FxHashSet::default();
        let mut curves = Vec::new();
        for &face in &self.face_order {
            let pushed = self.push_face_edges(face, outer_only, &mut seen, &mut curves);
            debug_assert!(pushed.is_ok(), "face_order only holds live faces: {pushed:?}");
        }
        for &ck in &self.guidelines {
            if self.curves.contains_key(ck) && seen.insert(ck) {
                curves.push(ck);
            }
        }
        curves
    }

    fn push_face_edges(
        &self,
        face: FaceKey,
        outer_only: bool,
        seen: &mut FxHashSet<CurveKey>,
        out: &mut Vec<CurveKey>,
    ) -> Result<()> {
        let face_data = self.faces.get(face).ok_or(Error::FaceNotFound(face))?;
        let loops: Vec<WireKey> = if outer_only {
            face_data.outer_loop.into_iter().collect()
        } else {
            face_data.loops().collect()
        };
        for wk in loops {
            let wire = self.wires.get(wk).ok_or(Error::WireNotFound(wk))?;
            for &ck in &wire.curves {
                if seen.insert(ck) {
                    out.push(ck);
                }
            }
        }
        Ok(())
    }

    /// Endpoints of the given faces' edges, each reported once.
    pub fn all_points_from_faces(&self, faces: &[FaceKey], outer_only: bool) -> Result<Vec<PointKey>> {
        let edges = self.all_edges_from_faces(faces, outer_only)?;
        Ok(self.endpoints_of(&edges))
    }

    /// Endpoints of every face edge and guideline, each reported once.
    pub fn all_points(&self, outer_only: bool) -> Vec<PointKey> {
        self.endpoints_of(&self.all_curves(outer_only))
    }

    fn endpoints_of(&self, curves: &[CurveKey]) -> Vec<PointKey> {
        let mut seen = FxHashSet::default();
        let mut points = Vec::new();
        for &ck in curves {
            if let Some((from, to)) = self.curves.get(ck).and_then(Curve::endpoint_keys) {
                for pk in [from, to] {
                    if seen.insert(pk) {
                        points.push(pk);
                    }
                }
            }
        }
        points
    }

    /// Snapping candidates for every face edge and guideline.
    ///
    /// Lines give their endpoints and midpoint. Arcs give their endpoints,
    /// center, and the axis quadrant points strictly inside their sweep.
    /// Circles give their center and four quadrant points. Endpoints shared
    /// by several curves are emitted once.
    pub fn reference_points(&self) -> Vec<ReferencePoint> {
        let tol = &self.tolerance;
        let mut seen_points = FxHashSet::default();
        let mut out = Vec::new();

        for ck in self.all_curves(false) {
            let (Some(curve), Some(segment)) = (self.curves.get(ck), self.segment(ck)) else {
                continue;
            };
            let mut push = |point: Point2<f64>, kind| {
                out.push(ReferencePoint {
                    point,
                    kind,
                    curve: ck,
                })
            };

            if let Some((from, to)) = curve.endpoint_keys() {
                for pk in [from, to] {
                    if seen_points.insert(pk) {
                        if let Some(p) = self.point_coords(pk) {
                            push(p, ReferencePointKind::Endpoint);
                        }
                    }
                }
            }

            match segment {
                Segment::Line { .. } => {
                    if let Some(mid) = segment.midpoint() {
                        push(mid, ReferencePointKind::Midpoint);
                    }
                }
                Segment::Arc { center, radius, .. } | Segment::Circle { center, radius, .. } => {
                    push(center, ReferencePointKind::Center);
                    for quadrant in 0..4 {
                        let angle = quadrant as f64 * FRAC_PI_2;
                        if segment.angle_strictly_inside_sweep(angle, tol) {
                            let p = center + Vector2::new(angle.cos(), angle.sin()) * radius;
                            push(p, ReferencePointKind::Quadrant);
                        }
                    }
                }
            }
        }

        out
    }

    /// Face edges and guidelines passing through any of `points`.
    pub fn edges_by_points(&self, points: &[Point2<f64>]) -> Vec<CurveKey> {
        self.all_curves(false)
            .into_iter()
            .filter(|&ck| {
                self.segment(ck)
                    .is_some_and(|seg| points.iter().any(|p| seg.contains_point(p, &self.tolerance)))
            })
            .collect()
    }

    /// Face edges and guidelines starting or ending at `point`.
    ///
    /// Circles have no endpoints and are skipped.
    pub fn connected_edges_by_point(&self, point: &Point2<f64>) -> Vec<CurveKey> {
        let mut edges = Vec::new();
        for ck in self.all_curves(false) {
            let Some(curve) = self.curves.get(ck) else {
                continue;
            };
            let Some((from, to)) = curve.endpoint_keys() else {
                tracing::warn!(
                    curve = ?ck,
                    kind = %curve.kind(),
                    "Skipping curve without endpoints in connectivity query"
                );
                continue;
            };
            let touches = [from, to].into_iter().any(|pk| {
                self.point_coords(pk)
                    .is_some_and(|p| self.tolerance.points_equal(&p, point))
            });
            if touches {
                edges.push(ck);
            }
        }
        edges
    }

    /// Copies a line edge onto two fresh points.
    pub fn clone_line_edge(&mut self, edge: CurveKey) -> Result<CurveKey> {
        let curve = *self.curves.get(edge).ok_or(Error::CurveNotFound(edge))?;
        let Curve::Line { from, to } = curve else {
            return Err(Error::NotApplicable {
                operation: "clone_line_edge",
                kind: curve.kind(),
            });
        };
        let a = self.point_coords(from).ok_or(Error::PointNotFound(from))?;
        let b = self.point_coords(to).ok_or(Error::PointNotFound(to))?;
        let from = self.add_point(a.x, a.y);
        let to = self.add_point(b.x, b.y);
        Ok(self.curves.insert(Curve::Line { from, to }))
    }

    /// Nearest boundary of a face in the four axis directions from `point`.
    pub fn face_dimensions(&self, face: FaceKey, point: &Point2<f64>) -> Result<DirectionalHits> {
        let polygon = self.face_loops(face)?;
        Ok(points_dimensions_inside_polygon(
            point,
            &polygon.outer,
            &polygon.holes,
            &self.tolerance,
        ))
    }
}

/// Nearest boundary hit in each axis direction from a point inside `outer`
/// and outside every hole.
///
/// On equal distances the first curve in traversal order (outer, then holes)
/// wins.
pub fn points_dimensions_inside_polygon(
    point: &Point2<f64>,
    outer: &[Segment],
    holes: &[Vec<Segment>],
    tol: &Tolerance,
) -> DirectionalHits {
    let nearest = |dir: Vector2<f64>| -> Option<RayHit> {
        let mut best: Option<RayHit> = None;
        for seg in outer.iter().chain(holes.iter().flatten()) {
            for t in seg.ray_intersections(point, &dir, tol) {
                if best.map_or(true, |b| t < b.distance) {
                    best = Some(RayHit {
                        point: point + dir * t,
                        distance: t,
                    });
                }
            }
        }
        best
    };

    DirectionalHits {
        left: nearest(Vector2::new(-1.0, 0.0)),
        right: nearest(Vector2::new(1.0, 0.0)),
        up: nearest(Vector2::new(0.0, 1.0)),
        down: nearest(Vector2::new(0.0, -1.0)),
    }
}

/// Center and radius of the arc through `start` and `end` bulging by
/// `sagitta` away from the center, with the center on the `direction` side
/// of the chord.
///
/// `radius = chord² / (8·sagitta) + sagitta / 2`.
pub fn circle_arc_center_by_sagitta(
    start: &Point2<f64>,
    end: &Point2<f64>,
    sagitta: f64,
    direction: &Vector2<f64>,
    tol: &Tolerance,
) -> Result<ArcCenter> {
    let chord = (end - start).norm();
    if chord <= tol.length {
        return Err(Error::DegenerateGeometry("zero-length chord".to_string()));
    }
    if sagitta.abs() <= tol.length {
        return Err(Error::DegenerateGeometry("zero sagitta".to_string()));
    }
    let dir_len = direction.norm();
    if dir_len <= tol.length {
        return Err(Error::DegenerateGeometry("zero direction".to_string()));
    }

    let mid = Point2::from((start.coords + end.coords) / 2.0);
    let radius = chord * chord / (8.0 * sagitta) + sagitta / 2.0;
    let center = mid + direction / dir_len * (radius - sagitta);
    Ok(ArcCenter { center, radius })
}
