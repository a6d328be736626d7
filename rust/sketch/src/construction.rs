// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Construction and structural editing of sketch entities.
//!
//! Every entity is created through the sketch, which checks that referenced
//! entities exist and keeps the wire→face back-reference consistent.

use nalgebra::Point2;

use crate::error::{Error, Result};
use crate::keys::*;
use crate::segment::{loop_gap, Segment};
use crate::sketch::*;

impl Sketch {
    // --- Points ---

    /// Adds a point at the given coordinates.
    pub fn add_point(&mut self, x: f64, y: f64) -> PointKey {
        self.points.insert(PointData { x, y })
    }

    /// Moves a point. Every curve using it follows.
    ///
    /// Arcs keep their center and radius, so the new position must stay on
    /// the circle of every arc ending at the point. Lines may not collapse to
    /// zero length. A rejected move leaves the point where it was.
    pub fn move_point(&mut self, key: PointKey, to: Point2<f64>) -> Result<()> {
        if !self.points.contains_key(key) {
            return Err(Error::PointNotFound(key));
        }
        for curve in self.curves.values() {
            match *curve {
                Curve::Line { from, to: end } if from == key || end == key => {
                    let other = if from == key { end } else { from };
                    let fixed = self.point_coords(other).ok_or(Error::PointNotFound(other))?;
                    if other != key && self.tolerance.points_equal(&fixed, &to) {
                        return Err(Error::DegenerateGeometry(
                            "move collapses a line to zero length".to_string(),
                        ));
                    }
                }
                Curve::Arc {
                    from,
                    to: end,
                    center,
                    radius,
                    ..
                } if from == key || end == key => {
                    if !self.tolerance.is_zero((to - center).norm() - radius) {
                        return Err(Error::DegenerateGeometry(
                            "move takes an arc endpoint off its circle".to_string(),
                        ));
                    }
                }
                _ => {}
            }
        }
        let point = &mut self.points[key];
        point.x = to.x;
        point.y = to.y;
        Ok(())
    }

    // --- Curves ---

    /// Creates a line between two existing points.
    pub fn add_line(&mut self, from: PointKey, to: PointKey) -> Result<CurveKey> {
        let a = self.point_coords(from).ok_or(Error::PointNotFound(from))?;
        let b = self.point_coords(to).ok_or(Error::PointNotFound(to))?;
        if self.tolerance.points_equal(&a, &b) {
            return Err(Error::DegenerateGeometry("zero-length line".to_string()));
        }
        Ok(self.curves.insert(Curve::Line { from, to }))
    }

    /// Creates an arc from `from` to `to` around `center`.
    ///
    /// Both endpoints must be equidistant from the center.
    pub fn add_arc(
        &mut self,
        from: PointKey,
        to: PointKey,
        center: Point2<f64>,
        clockwise: bool,
    ) -> Result<CurveKey> {
        let a = self.point_coords(from).ok_or(Error::PointNotFound(from))?;
        let b = self.point_coords(to).ok_or(Error::PointNotFound(to))?;
        let radius = (a - center).norm();
        if radius <= self.tolerance.length {
            return Err(Error::DegenerateGeometry("zero-radius arc".to_string()));
        }
        if !self.tolerance.is_zero((b - center).norm() - radius) {
            return Err(Error::DegenerateGeometry(
                "arc endpoints are not equidistant from the center".to_string(),
            ));
        }
        Ok(self.curves.insert(Curve::Arc {
            from,
            to,
            center,
            radius,
            clockwise,
        }))
    }

    /// Creates a full circle.
    pub fn add_circle(
        &mut self,
        center: Point2<f64>,
        radius: f64,
        clockwise: bool,
    ) -> Result<CurveKey> {
        if radius <= self.tolerance.length {
            return Err(Error::DegenerateGeometry("zero-radius circle".to_string()));
        }
        Ok(self.curves.insert(Curve::Circle {
            center,
            radius,
            clockwise,
        }))
    }

    // --- Wires ---

    /// Creates a wire from curves that form a closed loop.
    ///
    /// Curves may be listed in either direction; each curve's orientation is
    /// derived from its connection to the previous one. Fails if the list is
    /// empty or the loop does not close.
    pub fn add_wire(&mut self, curve_keys: &[CurveKey]) -> Result<WireKey> {
        if curve_keys.is_empty() {
            return Err(Error::EmptyWire);
        }

        let segments = curve_keys
            .iter()
            .map(|&ck| self.segment(ck).ok_or(Error::CurveNotFound(ck)))
            .collect::<Result<Vec<_>>>()?;
        let orientations = self.orient_loop(&segments)?;

        let oriented: Vec<Segment> = segments
            .iter()
            .zip(&orientations)
            .map(|(s, &fwd)| if fwd { *s } else { s.reversed() })
            .collect();
        if let Some((index, gap)) = loop_gap(&oriented, &self.tolerance) {
            return Err(Error::OpenWire { index, gap });
        }

        Ok(self.wires.insert(Wire {
            curves: curve_keys.to_vec(),
            orientations,
            face: None,
        }))
    }

    /// Determines the traversal direction of each curve in a loop.
    fn orient_loop(&self, segments: &[Segment]) -> Result<Vec<bool>> {
        let tol = &self.tolerance;
        let ends = |i: usize| -> Result<(Point2<f64>, Point2<f64>)> {
            match (segments[i].start(), segments[i].end()) {
                (Some(s), Some(e)) => Ok((s, e)),
                _ => Err(Error::OpenWire {
                    index: i,
                    gap: f64::INFINITY,
                }),
            }
        };

        if segments.len() == 1 {
            return Ok(vec![true]);
        }

        let mut orientations = Vec::with_capacity(segments.len());
        let (s0, e0) = ends(0)?;
        let (s1, e1) = ends(1)?;
        if tol.points_equal(&e0, &s1) || tol.points_equal(&e0, &e1) {
            orientations.push(true);
        } else if tol.points_equal(&s0, &s1) || tol.points_equal(&s0, &e1) {
            orientations.push(false);
        } else {
            return Err(Error::OpenWire {
                index: 0,
                gap: (e0 - s1).norm().min((e0 - e1).norm()),
            });
        }

        for i in 1..segments.len() {
            let (ps, pe) = ends(i - 1)?;
            let prev_end = if orientations[i - 1] { pe } else { ps };
            let (s, e) = ends(i)?;
            if tol.points_equal(&prev_end, &s) {
                orientations.push(true);
            } else if tol.points_equal(&prev_end, &e) {
                orientations.push(false);
            } else {
                return Err(Error::OpenWire {
                    index: i - 1,
                    gap: (prev_end - s).norm().min((prev_end - e).norm()),
                });
            }
        }

        Ok(orientations)
    }

    /// Creates points, lines and a wire for a closed polyline.
    pub fn add_polyline_loop(&mut self, corners: &[Point2<f64>]) -> Result<WireKey> {
        if corners.len() < 2 {
            return Err(Error::EmptyWire);
        }
        let keys: Vec<PointKey> = corners.iter().map(|p| self.add_point(p.x, p.y)).collect();
        let lines = (0..keys.len())
            .map(|i| self.add_line(keys[i], keys[(i + 1) % keys.len()]))
            .collect::<Result<Vec<_>>>()?;
        self.add_wire(&lines)
    }

    // --- Faces ---

    /// Creates an empty face with no loops.
    pub fn add_face(&mut self) -> FaceKey {
        let key = self.faces.insert(Face2d::default());
        self.face_order.push(key);
        key
    }

    /// Creates a face with an outer loop and hole loops.
    pub fn add_face_with_loops(&mut self, outer: WireKey, holes: &[WireKey]) -> Result<FaceKey> {
        for &w in std::iter::once(&outer).chain(holes) {
            if !self.wires.contains_key(w) {
                return Err(Error::WireNotFound(w));
            }
        }
        let face = self.add_face();
        self.set_outer_loop(face, outer)?;
        self.set_inner_loops(face, holes)?;
        Ok(face)
    }

    /// Assigns the outer loop of a face and points the wire back at it.
    ///
    /// The previous outer wire loses its back-reference unless the face still
    /// uses it as a hole.
    pub fn set_outer_loop(&mut self, face: FaceKey, wire: WireKey) -> Result<()> {
        if !self.wires.contains_key(wire) {
            return Err(Error::WireNotFound(wire));
        }
        let data = self.faces.get_mut(face).ok_or(Error::FaceNotFound(face))?;
        let previous = data.outer_loop.replace(wire);

        self.wires[wire].face = Some(face);
        if let Some(prev) = previous.filter(|&p| p != wire) {
            self.release_wire(prev, face);
        }
        Ok(())
    }

    /// Replaces the hole loops of a face and points each wire back at it.
    pub fn set_inner_loops(&mut self, face: FaceKey, wires: &[WireKey]) -> Result<()> {
        for &w in wires {
            if !self.wires.contains_key(w) {
                return Err(Error::WireNotFound(w));
            }
        }
        let data = self.faces.get_mut(face).ok_or(Error::FaceNotFound(face))?;
        let previous = std::mem::replace(&mut data.inner_loops, wires.to_vec());

        for &w in wires {
            self.wires[w].face = Some(face);
        }
        for prev in previous {
            self.release_wire(prev, face);
        }
        Ok(())
    }

    /// Points a wire back at `face`, which must already use it as a loop.
    ///
    /// Used when copying a sketch to carry over which face assigned a shared
    /// wire last.
    pub(crate) fn reassert_wire_face(&mut self, wire: WireKey, face: FaceKey) -> Result<()> {
        let uses = self
            .faces
            .get(face)
            .ok_or(Error::FaceNotFound(face))?
            .loops()
            .any(|w| w == wire);
        let data = self.wires.get_mut(wire).ok_or(Error::WireNotFound(wire))?;
        if uses {
            data.face = Some(face);
        }
        Ok(())
    }

    /// Clears a wire's back-reference if `face` no longer uses it.
    fn release_wire(&mut self, wire: WireKey, face: FaceKey) {
        let still_used = self
            .faces
            .get(face)
            .is_some_and(|f| f.loops().any(|w| w == wire));
        if still_used {
            return;
        }
        if let Some(w) = self.wires.get_mut(wire) {
            if w.face == Some(face) {
                w.face = None;
            }
        }
    }

    /// Removes a face and clears the back-reference of its wires.
    ///
    /// Wires, curves and points stay in the sketch.
    pub fn remove_face(&mut self, face: FaceKey) -> Result<Face2d> {
        let data = self.faces.remove(face).ok_or(Error::FaceNotFound(face))?;
        self.face_order.retain(|&f| f != face);
        for wire in data.loops() {
            if let Some(w) = self.wires.get_mut(wire) {
                if w.face == Some(face) {
                    w.face = None;
                }
            }
        }
        tracing::debug!(?face, "Removed face");
        Ok(data)
    }

    /// Removes every face.
    pub fn clear(&mut self) {
        for face in std::mem::take(&mut self.face_order) {
            if let Some(data) = self.faces.remove(face) {
                for wire in data.loops() {
                    if let Some(w) = self.wires.get_mut(wire) {
                        w.face = None;
                    }
                }
            }
        }
    }

    // --- Guidelines ---

    /// Registers an existing curve as a guideline.
    pub fn add_guideline(&mut self, curve: CurveKey) -> Result<()> {
        if !self.curves.contains_key(curve) {
            return Err(Error::CurveNotFound(curve));
        }
        if !self.guidelines.contains(&curve) {
            self.guidelines.push(curve);
        }
        Ok(())
    }

    /// Unregisters guideline curves. The curves stay in the sketch.
    pub fn remove_guidelines(&mut self, curves: &[CurveKey]) {
        self.guidelines.retain(|c| !curves.contains(c));
    }
}

/// Helper to build an axis-aligned rectangular face.
///
/// Creates 4 points, 4 lines, 1 wire and 1 face. Returns
/// `(face_key, wire_key, line_keys)`.
pub fn make_rectangle(
    sketch: &mut Sketch,
    min: Point2<f64>,
    max: Point2<f64>,
) -> Result<(FaceKey, WireKey, [CurveKey; 4])> {
    let p0 = sketch.add_point(min.x, min.y);
    let p1 = sketch.add_point(max.x, min.y);
    let p2 = sketch.add_point(max.x, max.y);
    let p3 = sketch.add_point(min.x, max.y);
    let l0 = sketch.add_line(p0, p1)?;
    let l1 = sketch.add_line(p1, p2)?;
    let l2 = sketch.add_line(p2, p3)?;
    let l3 = sketch.add_line(p3, p0)?;
    let wire = sketch.add_wire(&[l0, l1, l2, l3])?;
    let face = sketch.add_face_with_loops(wire, &[])?;
    Ok((face, wire, [l0, l1, l2, l3]))
}
