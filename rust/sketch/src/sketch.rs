// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Arena-based storage for sketch entities.
//!
//! The [`Sketch`] is the single owner of every point, curve, wire and face.
//! Entities reference each other through keys only:
//!
//! - curves reference their endpoint points (shared between adjacent curves),
//! - wires reference curves plus a per-curve traversal orientation, so one
//!   curve can bound two neighbouring faces in opposite directions,
//! - faces reference one outer wire and any number of hole wires,
//! - each wire holds a non-owning back-reference to the face that last
//!   assigned it. That back-reference is written only by
//!   [`Sketch::set_outer_loop`] and [`Sketch::set_inner_loops`], and carried
//!   over as-is by [`Sketch::clone_with_map`].

use nalgebra::Point2;
use slotmap::SlotMap;

use crate::background::Background;
use crate::config::Tolerance;
use crate::keys::*;
use crate::segment::Segment;

/// Coordinates of a point. Curves ending at the same point share one entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointData {
    pub x: f64,
    pub y: f64,
}

impl PointData {
    /// Coordinates as a nalgebra point.
    pub fn to_point(&self) -> Point2<f64> {
        Point2::new(self.x, self.y)
    }
}

/// Data stored for a curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Curve {
    /// Straight line between two points.
    Line { from: PointKey, to: PointKey },
    /// Circular arc between two points around `center`.
    Arc {
        from: PointKey,
        to: PointKey,
        center: Point2<f64>,
        radius: f64,
        clockwise: bool,
    },
    /// Full circle; has no endpoints.
    Circle {
        center: Point2<f64>,
        radius: f64,
        clockwise: bool,
    },
}

impl Curve {
    /// Line, arc or circle, without the geometry.
    pub fn kind(&self) -> CurveKind {
        match self {
            Curve::Line { .. } => CurveKind::Line,
            Curve::Arc { .. } => CurveKind::Arc,
            Curve::Circle { .. } => CurveKind::Circle,
        }
    }

    /// Start and end point keys, `None` for circles.
    pub fn endpoint_keys(&self) -> Option<(PointKey, PointKey)> {
        match self {
            Curve::Line { from, to } | Curve::Arc { from, to, .. } => Some((*from, *to)),
            Curve::Circle { .. } => None,
        }
    }
}

/// Data stored for a wire: a closed loop of oriented curves.
#[derive(Debug, Clone)]
pub struct Wire {
    pub(crate) curves: Vec<CurveKey>,
    /// `true` if `curves[i]` is traversed start→end.
    pub(crate) orientations: Vec<bool>,
    pub(crate) face: Option<FaceKey>,
}

impl Wire {
    /// Curves in loop order.
    pub fn curves(&self) -> &[CurveKey] {
        &self.curves
    }

    /// Traversal direction of each curve, parallel to [`Wire::curves`].
    pub fn orientations(&self) -> &[bool] {
        &self.orientations
    }

    /// The face that most recently assigned this wire as a loop.
    pub fn face(&self) -> Option<FaceKey> {
        self.face
    }

    /// Iterates `(curve, forward)` pairs in loop order.
    pub fn oriented_curves(&self) -> impl Iterator<Item = (CurveKey, bool)> + '_ {
        self.curves
            .iter()
            .copied()
            .zip(self.orientations.iter().copied())
    }
}

/// Data stored for a face: one outer wire and ordered hole wires.
#[derive(Debug, Clone, Default)]
pub struct Face2d {
    pub(crate) outer_loop: Option<WireKey>,
    pub(crate) inner_loops: Vec<WireKey>,
    pub(crate) topos: Vec<String>,
}

impl Face2d {
    /// Boundary wire, `None` until one is assigned.
    pub fn outer_loop(&self) -> Option<WireKey> {
        self.outer_loop
    }

    /// Hole wires in assignment order.
    pub fn inner_loops(&self) -> &[WireKey] {
        &self.inner_loops
    }

    /// Outer loop followed by the holes.
    pub fn loops(&self) -> impl Iterator<Item = WireKey> + '_ {
        self.outer_loop.into_iter().chain(self.inner_loops.iter().copied())
    }
}

/// A planar sketch: background regions, guideline curves and faces.
///
/// # Example
///
/// ```
/// use plan_lite_sketch::Sketch;
///
/// let mut sketch = Sketch::new();
/// let a = sketch.add_point(0.0, 0.0);
/// let b = sketch.add_point(2.0, 0.0);
/// let line = sketch.add_line(a, b).unwrap();
/// sketch.add_guideline(line).unwrap();
///
/// assert_eq!(sketch.reference_points().len(), 3);
/// ```
#[derive(Debug)]
pub struct Sketch {
    pub(crate) points: SlotMap<PointKey, PointData>,
    pub(crate) curves: SlotMap<CurveKey, Curve>,
    pub(crate) wires: SlotMap<WireKey, Wire>,
    pub(crate) faces: SlotMap<FaceKey, Face2d>,
    /// Faces in insertion order; all traversals follow it.
    pub(crate) face_order: Vec<FaceKey>,
    pub(crate) guidelines: Vec<CurveKey>,
    pub(crate) background: Background,
    pub(crate) tolerance: Tolerance,
}

impl Sketch {
    /// Creates an empty sketch with default tolerances.
    pub fn new() -> Self {
        Self::with_tolerance(Tolerance::default())
    }

    /// Creates an empty sketch that compares geometry with `tolerance`.
    pub fn with_tolerance(tolerance: Tolerance) -> Self {
        Self {
            points: SlotMap::with_key(),
            curves: SlotMap::with_key(),
            wires: SlotMap::with_key(),
            faces: SlotMap::with_key(),
            face_order: Vec::new(),
            guidelines: Vec::new(),
            background: Background::default(),
            tolerance,
        }
    }

    /// Tolerances used by every geometric comparison of this sketch.
    pub fn tolerance(&self) -> &Tolerance {
        &self.tolerance
    }

    // --- Point access ---

    /// Stored data of a point, `None` for a stale key.
    pub fn point(&self, key: PointKey) -> Option<&PointData> {
        self.points.get(key)
    }

    /// Coordinates of a point, `None` for a stale key.
    pub fn point_coords(&self, key: PointKey) -> Option<Point2<f64>> {
        self.points.get(key).map(PointData::to_point)
    }

    /// Number of live points.
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    // --- Curve access ---

    /// Stored data of a curve, `None` for a stale key.
    pub fn curve(&self, key: CurveKey) -> Option<&Curve> {
        self.curves.get(key)
    }

    /// Number of live curves, guidelines included.
    pub fn curve_count(&self) -> usize {
        self.curves.len()
    }

    /// Value geometry of a curve in its own direction.
    pub fn segment(&self, key: CurveKey) -> Option<Segment> {
        let curve = self.curves.get(key)?;
        Some(match *curve {
            Curve::Line { from, to } => {
                Segment::line(self.point_coords(from)?, self.point_coords(to)?)
            }
            Curve::Arc {
                from,
                to,
                center,
                radius,
                clockwise,
            } => Segment::Arc {
                start: self.point_coords(from)?,
                end: self.point_coords(to)?,
                center,
                radius,
                clockwise,
            },
            Curve::Circle {
                center,
                radius,
                clockwise,
            } => Segment::circle(center, radius, clockwise),
        })
    }

    /// Value geometry of a curve as traversed by a wire.
    pub fn oriented_segment(&self, key: CurveKey, forward: bool) -> Option<Segment> {
        let segment = self.segment(key)?;
        Some(if forward { segment } else { segment.reversed() })
    }

    // --- Wire access ---

    /// Stored data of a wire, `None` for a stale key.
    pub fn wire(&self, key: WireKey) -> Option<&Wire> {
        self.wires.get(key)
    }

    /// Number of live wires, owned or not.
    pub fn wire_count(&self) -> usize {
        self.wires.len()
    }

    /// The face that owns a wire, if any.
    pub fn wire_face(&self, key: WireKey) -> Option<FaceKey> {
        self.wires.get(key).and_then(|w| w.face)
    }

    // --- Face access ---

    /// Stored data of a face, `None` for a stale key.
    pub fn face(&self, key: FaceKey) -> Option<&Face2d> {
        self.faces.get(key)
    }

    /// Mutable face access. Loop assignment stays on [`Sketch`] so the wire
    /// back-reference cannot be bypassed.
    pub fn face_mut(&mut self, key: FaceKey) -> Option<&mut Face2d> {
        self.faces.get_mut(key)
    }

    /// Number of live faces.
    pub fn face_count(&self) -> usize {
        self.face_order.len()
    }

    /// Face keys in insertion order.
    pub fn faces(&self) -> &[FaceKey] {
        &self.face_order
    }

    // --- Guidelines and background ---

    /// Guideline curves in registration order.
    pub fn guidelines(&self) -> &[CurveKey] {
        &self.guidelines
    }

    /// Background regions drawn behind the faces.
    pub fn background(&self) -> &Background {
        &self.background
    }

    /// Mutable background, for edits that go through [`Background`] itself.
    pub fn background_mut(&mut self) -> &mut Background {
        &mut self.background
    }

    /// Replaces the background wholesale.
    pub fn set_background(&mut self, background: Background) {
        self.background = background;
    }

    /// Outer loop of the first background region (empty if none).
    pub fn background_outer(&self) -> &[Segment] {
        self.background.first_outer()
    }
}

impl Default for Sketch {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_sketch_is_empty() {
        let sketch = Sketch::new();
        assert_eq!(sketch.point_count(), 0);
        assert_eq!(sketch.curve_count(), 0);
        assert_eq!(sketch.wire_count(), 0);
        assert_eq!(sketch.face_count(), 0);
        assert!(sketch.guidelines().is_empty());
        assert!(sketch.background_outer().is_empty());
    }

    #[test]
    fn segment_follows_points() {
        let mut sketch = Sketch::new();
        let a = sketch.add_point(0.0, 0.0);
        let b = sketch.add_point(3.0, 4.0);
        let line = sketch.add_line(a, b).unwrap();

        let seg = sketch.segment(line).unwrap();
        assert_eq!(seg.length(), 5.0);

        let rev = sketch.oriented_segment(line, false).unwrap();
        assert_eq!(rev.start(), Some(Point2::new(3.0, 4.0)));
    }

    #[test]
    fn circle_has_no_endpoint_keys() {
        let c = Curve::Circle {
            center: Point2::origin(),
            radius: 1.0,
            clockwise: false,
        };
        assert_eq!(c.kind(), CurveKind::Circle);
        assert!(c.endpoint_keys().is_none());
    }
}
