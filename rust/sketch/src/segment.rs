// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value geometry for lines, arcs and circles.
//!
//! A [`Segment`] is a self-contained curve (coordinates, not keys). Faces and
//! background regions are converted to segments before any predicate runs,
//! so containment, ray casting, area and overlap tests never touch the arena.

use std::f64::consts::TAU;

use nalgebra::{Matrix3, Point2, Vector2};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::config::Tolerance;
use crate::keys::CurveKind;

/// Denominator below which a ray is considered parallel to a line.
const PARALLEL_EPS: f64 = 1e-12;

/// A 2D curve by value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Segment {
    Line {
        start: Point2<f64>,
        end: Point2<f64>,
    },
    Arc {
        start: Point2<f64>,
        end: Point2<f64>,
        center: Point2<f64>,
        radius: f64,
        clockwise: bool,
    },
    Circle {
        center: Point2<f64>,
        radius: f64,
        clockwise: bool,
    },
}

/// Normalizes an angle into `[0, TAU)`.
pub(crate) fn normalize_angle(angle: f64) -> f64 {
    let r = angle.rem_euclid(TAU);
    if r >= TAU {
        0.0
    } else {
        r
    }
}

fn angle_of(center: &Point2<f64>, p: &Point2<f64>) -> f64 {
    (p.y - center.y).atan2(p.x - center.x)
}

fn point_at(center: &Point2<f64>, radius: f64, angle: f64) -> Point2<f64> {
    Point2::new(center.x + radius * angle.cos(), center.y + radius * angle.sin())
}

fn cross(a: &Vector2<f64>, b: &Vector2<f64>) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Signed sweep of an arc, positive counterclockwise.
///
/// Coincident endpoints describe a full turn.
pub(crate) fn arc_sweep(
    start: &Point2<f64>,
    end: &Point2<f64>,
    center: &Point2<f64>,
    clockwise: bool,
) -> f64 {
    let a0 = angle_of(center, start);
    let a1 = angle_of(center, end);
    let raw = if clockwise {
        normalize_angle(a0 - a1)
    } else {
        normalize_angle(a1 - a0)
    };
    let magnitude = if raw <= f64::EPSILON { TAU } else { raw };
    if clockwise {
        -magnitude
    } else {
        magnitude
    }
}

impl Segment {
    /// Creates a line segment.
    pub fn line(start: Point2<f64>, end: Point2<f64>) -> Self {
        Segment::Line { start, end }
    }

    /// Creates an arc; the radius is the distance from `center` to `start`.
    pub fn arc(start: Point2<f64>, end: Point2<f64>, center: Point2<f64>, clockwise: bool) -> Self {
        Segment::Arc {
            start,
            end,
            center,
            radius: (start - center).norm(),
            clockwise,
        }
    }

    /// Creates a full circle.
    pub fn circle(center: Point2<f64>, radius: f64, clockwise: bool) -> Self {
        Segment::Circle {
            center,
            radius,
            clockwise,
        }
    }

    pub fn kind(&self) -> CurveKind {
        match self {
            Segment::Line { .. } => CurveKind::Line,
            Segment::Arc { .. } => CurveKind::Arc,
            Segment::Circle { .. } => CurveKind::Circle,
        }
    }

    /// Start point, `None` for circles.
    pub fn start(&self) -> Option<Point2<f64>> {
        match self {
            Segment::Line { start, .. } | Segment::Arc { start, .. } => Some(*start),
            Segment::Circle { .. } => None,
        }
    }

    /// End point, `None` for circles.
    pub fn end(&self) -> Option<Point2<f64>> {
        match self {
            Segment::Line { end, .. } | Segment::Arc { end, .. } => Some(*end),
            Segment::Circle { .. } => None,
        }
    }

    /// Center of an arc or circle.
    pub fn center(&self) -> Option<Point2<f64>> {
        match self {
            Segment::Line { .. } => None,
            Segment::Arc { center, .. } | Segment::Circle { center, .. } => Some(*center),
        }
    }

    /// The same curve traversed in the opposite direction.
    pub fn reversed(&self) -> Self {
        match *self {
            Segment::Line { start, end } => Segment::Line {
                start: end,
                end: start,
            },
            Segment::Arc {
                start,
                end,
                center,
                radius,
                clockwise,
            } => Segment::Arc {
                start: end,
                end: start,
                center,
                radius,
                clockwise: !clockwise,
            },
            Segment::Circle {
                center,
                radius,
                clockwise,
            } => Segment::Circle {
                center,
                radius,
                clockwise: !clockwise,
            },
        }
    }

    /// Angle of the start point around the center (0 for lines and circles).
    pub fn start_angle(&self) -> f64 {
        match self {
            Segment::Arc { start, center, .. } => angle_of(center, start),
            _ => 0.0,
        }
    }

    /// Signed angular sweep, positive counterclockwise (0 for lines).
    pub fn sweep(&self) -> f64 {
        match self {
            Segment::Line { .. } => 0.0,
            Segment::Arc {
                start,
                end,
                center,
                clockwise,
                ..
            } => arc_sweep(start, end, center, *clockwise),
            Segment::Circle { clockwise, .. } => {
                if *clockwise {
                    -TAU
                } else {
                    TAU
                }
            }
        }
    }

    /// Point halfway along the curve, `None` for circles.
    pub fn midpoint(&self) -> Option<Point2<f64>> {
        match self {
            Segment::Line { start, end } => Some(nalgebra::center(start, end)),
            Segment::Arc { center, radius, .. } => {
                Some(point_at(center, *radius, self.start_angle() + self.sweep() / 2.0))
            }
            Segment::Circle { .. } => None,
        }
    }

    /// Arc length of the curve.
    pub fn length(&self) -> f64 {
        match self {
            Segment::Line { start, end } => (end - start).norm(),
            Segment::Arc { radius, .. } | Segment::Circle { radius, .. } => {
                radius * self.sweep().abs()
            }
        }
    }

    /// Angular slack for a point on this curve, combining both tolerances.
    fn angular_tolerance(&self, tol: &Tolerance) -> f64 {
        match self {
            Segment::Arc { radius, .. } | Segment::Circle { radius, .. } if *radius > 0.0 => {
                tol.angle + tol.length / radius
            }
            _ => tol.angle,
        }
    }

    /// Offset of `angle` from the start, measured in the sweep direction.
    fn angular_offset(&self, angle: f64) -> f64 {
        let start = self.start_angle();
        if self.sweep() >= 0.0 {
            normalize_angle(angle - start)
        } else {
            normalize_angle(start - angle)
        }
    }

    /// Returns `true` if `angle` lies within the sweep (boundaries included).
    pub fn angle_in_sweep(&self, angle: f64, tol: &Tolerance) -> bool {
        match self {
            Segment::Line { .. } => false,
            Segment::Circle { .. } => true,
            Segment::Arc { .. } => {
                let slack = self.angular_tolerance(tol);
                let offset = self.angular_offset(angle);
                offset <= self.sweep().abs() + slack || offset >= TAU - slack
            }
        }
    }

    /// Returns `true` if `angle` lies strictly inside the sweep, away from both ends.
    pub fn angle_strictly_inside_sweep(&self, angle: f64, tol: &Tolerance) -> bool {
        match self {
            Segment::Line { .. } => false,
            Segment::Circle { .. } => true,
            Segment::Arc { .. } => {
                let slack = self.angular_tolerance(tol);
                let offset = self.angular_offset(angle);
                offset > slack && offset < self.sweep().abs() - slack
            }
        }
    }

    /// Returns `true` if `p` lies on the curve within the length tolerance.
    pub fn contains_point(&self, p: &Point2<f64>, tol: &Tolerance) -> bool {
        match self {
            Segment::Line { start, end } => {
                let d = end - start;
                let len_sq = d.norm_squared();
                if len_sq <= tol.length * tol.length {
                    return tol.points_equal(start, p);
                }
                let t = ((p - start).dot(&d) / len_sq).clamp(0.0, 1.0);
                let closest = start + d * t;
                (p - closest).norm() <= tol.length
            }
            Segment::Arc { center, radius, .. } | Segment::Circle { center, radius, .. } => {
                if ((p - center).norm() - radius).abs() > tol.length {
                    return false;
                }
                self.angle_in_sweep(angle_of(center, p), tol)
            }
        }
    }

    /// Position of `p` along the curve, as a distance from the start.
    ///
    /// `p` is assumed to lie on the curve; used to order pieces of a split edge.
    pub fn param_of(&self, p: &Point2<f64>) -> f64 {
        match self {
            Segment::Line { start, end } => {
                let d = end - start;
                let len = d.norm();
                if len == 0.0 {
                    0.0
                } else {
                    (p - start).dot(&d) / len
                }
            }
            Segment::Arc { center, radius, .. } | Segment::Circle { center, radius, .. } => {
                self.angular_offset(angle_of(center, p)) * radius
            }
        }
    }

    /// Contribution of this curve to the signed area of a closed loop
    /// (Green's theorem, `1/2 ∮ x dy - y dx`). Positive loops are counterclockwise.
    pub fn signed_area_term(&self) -> f64 {
        match self {
            Segment::Line { start, end } => 0.5 * (start.x * end.y - end.x * start.y),
            Segment::Arc { center, radius, .. } => {
                let a0 = self.start_angle();
                let sweep = self.sweep();
                let a1 = a0 + sweep;
                0.5 * (radius * center.x * (a1.sin() - a0.sin())
                    - radius * center.y * (a1.cos() - a0.cos())
                    + radius * radius * sweep)
            }
            Segment::Circle { radius, .. } => 0.5 * radius * radius * self.sweep(),
        }
    }

    /// Ray parameters `t > 0` where `origin + t * dir` meets the curve.
    ///
    /// `dir` need not be normalized; `t` is in units of `dir`.
    pub fn ray_intersections(
        &self,
        origin: &Point2<f64>,
        dir: &Vector2<f64>,
        tol: &Tolerance,
    ) -> SmallVec<[f64; 2]> {
        let mut hits = SmallVec::new();
        let dir_len = dir.norm();
        if dir_len == 0.0 {
            return hits;
        }
        let min_t = tol.length / dir_len;

        match self {
            Segment::Line { start, end } => {
                let e = end - start;
                let denom = cross(dir, &e);
                if denom.abs() < PARALLEL_EPS {
                    return hits;
                }
                let w = start - origin;
                let t = cross(&w, &e) / denom;
                let s = cross(&w, dir) / denom;
                let s_slack = tol.length / e.norm().max(tol.length);
                if t > min_t && s >= -s_slack && s <= 1.0 + s_slack {
                    hits.push(t);
                }
            }
            Segment::Arc { center, radius, .. } | Segment::Circle { center, radius, .. } => {
                let oc = origin - center;
                let a = dir.norm_squared();
                let b = dir.dot(&oc);
                let c = oc.norm_squared() - radius * radius;
                let disc = b * b - a * c;
                if disc < 0.0 {
                    return hits;
                }
                let root = disc.sqrt();
                for t in [(-b - root) / a, (-b + root) / a] {
                    if t <= min_t {
                        continue;
                    }
                    let p = origin + dir * t;
                    if self.angle_in_sweep(angle_of(center, &p), tol) {
                        hits.push(t);
                    }
                }
            }
        }

        hits
    }

    /// The curve moved by `offset`.
    pub fn translated(&self, offset: &Vector2<f64>) -> Self {
        match *self {
            Segment::Line { start, end } => Segment::Line {
                start: start + offset,
                end: end + offset,
            },
            Segment::Arc {
                start,
                end,
                center,
                radius,
                clockwise,
            } => Segment::Arc {
                start: start + offset,
                end: end + offset,
                center: center + offset,
                radius,
                clockwise,
            },
            Segment::Circle {
                center,
                radius,
                clockwise,
            } => Segment::Circle {
                center: center + offset,
                radius,
                clockwise,
            },
        }
    }

    /// The curve under a similarity transform.
    ///
    /// `scale` is the uniform scale factor of `matrix`; `flipped` toggles the
    /// arc direction for mirroring matrices.
    pub(crate) fn transformed(&self, matrix: &Matrix3<f64>, scale: f64, flipped: bool) -> Self {
        match *self {
            Segment::Line { start, end } => Segment::Line {
                start: matrix.transform_point(&start),
                end: matrix.transform_point(&end),
            },
            Segment::Arc {
                start,
                end,
                center,
                radius,
                clockwise,
            } => Segment::Arc {
                start: matrix.transform_point(&start),
                end: matrix.transform_point(&end),
                center: matrix.transform_point(&center),
                radius: radius * scale,
                clockwise: clockwise != flipped,
            },
            Segment::Circle {
                center,
                radius,
                clockwise,
            } => Segment::Circle {
                center: matrix.transform_point(&center),
                radius: radius * scale,
                clockwise: clockwise != flipped,
            },
        }
    }

    /// Structural equality within tolerance, ignoring traversal direction.
    pub fn geometric_eq(&self, other: &Segment, tol: &Tolerance) -> bool {
        match (self, other) {
            (Segment::Line { start: a0, end: a1 }, Segment::Line { start: b0, end: b1 }) => {
                (tol.points_equal(a0, b0) && tol.points_equal(a1, b1))
                    || (tol.points_equal(a0, b1) && tol.points_equal(a1, b0))
            }
            (
                Segment::Arc {
                    start: a0,
                    end: a1,
                    center: ac,
                    radius: ar,
                    clockwise: acw,
                },
                Segment::Arc {
                    start: b0,
                    end: b1,
                    center: bc,
                    radius: br,
                    clockwise: bcw,
                },
            ) => {
                if !tol.points_equal(ac, bc) || !tol.is_zero(ar - br) {
                    return false;
                }
                (acw == bcw && tol.points_equal(a0, b0) && tol.points_equal(a1, b1))
                    || (acw != bcw && tol.points_equal(a0, b1) && tol.points_equal(a1, b0))
            }
            (
                Segment::Circle {
                    center: ac,
                    radius: ar,
                    ..
                },
                Segment::Circle {
                    center: bc,
                    radius: br,
                    ..
                },
            ) => tol.points_equal(ac, bc) && tol.is_zero(ar - br),
            _ => false,
        }
    }

    /// Returns `true` if every point of `self` lies on `other`.
    pub fn lies_on(&self, other: &Segment, tol: &Tolerance) -> bool {
        match (self, other) {
            (Segment::Circle { .. }, _) => self.geometric_eq(other, tol),
            (Segment::Line { .. }, Segment::Line { .. })
            | (Segment::Arc { .. }, Segment::Arc { .. })
            | (Segment::Arc { .. }, Segment::Circle { .. }) => [self.start(), self.midpoint(), self.end()]
                .iter()
                .flatten()
                .all(|p| other.contains_point(p, tol)),
            _ => false,
        }
    }

    /// Points that bound the curve: endpoints plus the axis extremes the sweep crosses.
    pub fn extreme_points(&self, tol: &Tolerance) -> SmallVec<[Point2<f64>; 6]> {
        let mut points = SmallVec::new();
        if let (Some(s), Some(e)) = (self.start(), self.end()) {
            points.push(s);
            points.push(e);
        }
        if let Segment::Arc { center, radius, .. } | Segment::Circle { center, radius, .. } = self {
            for q in 0..4 {
                let angle = q as f64 * std::f64::consts::FRAC_PI_2;
                if self.angle_in_sweep(angle, tol) {
                    points.push(point_at(center, *radius, angle));
                }
            }
        }
        points
    }

    /// Polyline vertices from the start up to (excluding) the end.
    pub fn discretize(&self, segments_per_turn: usize) -> Vec<Point2<f64>> {
        match self {
            Segment::Line { start, .. } => vec![*start],
            Segment::Arc { center, radius, .. } | Segment::Circle { center, radius, .. } => {
                let sweep = self.sweep();
                let start = self.start_angle();
                let n = ((sweep.abs() / TAU) * segments_per_turn.max(4) as f64)
                    .ceil()
                    .max(1.0) as usize;
                (0..n)
                    .map(|i| point_at(center, *radius, start + sweep * i as f64 / n as f64))
                    .collect()
            }
        }
    }
}

/// Signed area of a closed loop, positive when counterclockwise.
pub fn loop_signed_area(segments: &[Segment]) -> f64 {
    segments.iter().map(Segment::signed_area_term).sum()
}

/// The loop traversed in the opposite direction.
pub fn reverse_loop(segments: &[Segment]) -> Vec<Segment> {
    segments.iter().rev().map(Segment::reversed).collect()
}

/// First break in a loop as `(index, gap)`: curve `index` does not end where
/// its successor starts. `None` if the loop is closed.
pub fn loop_gap(segments: &[Segment], tol: &Tolerance) -> Option<(usize, f64)> {
    if segments.is_empty() {
        return Some((0, f64::INFINITY));
    }
    if segments.len() == 1 {
        if let Segment::Circle { .. } = segments[0] {
            return None;
        }
    }

    let n = segments.len();
    for i in 0..n {
        let next = &segments[(i + 1) % n];
        match (segments[i].end(), next.start()) {
            (Some(end), Some(start)) => {
                let gap = (end - start).norm();
                if gap > tol.length {
                    return Some((i, gap));
                }
            }
            _ => return Some((i, f64::INFINITY)),
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn p(x: f64, y: f64) -> Point2<f64> {
        Point2::new(x, y)
    }

    fn square() -> Vec<Segment> {
        vec![
            Segment::line(p(0.0, 0.0), p(1.0, 0.0)),
            Segment::line(p(1.0, 0.0), p(1.0, 1.0)),
            Segment::line(p(1.0, 1.0), p(0.0, 1.0)),
            Segment::line(p(0.0, 1.0), p(0.0, 0.0)),
        ]
    }

    #[test]
    fn arc_sweep_direction() {
        let ccw = Segment::arc(p(1.0, 0.0), p(0.0, 1.0), p(0.0, 0.0), false);
        assert_relative_eq!(ccw.sweep(), PI / 2.0, epsilon = 1e-12);

        let cw = Segment::arc(p(1.0, 0.0), p(0.0, 1.0), p(0.0, 0.0), true);
        assert_relative_eq!(cw.sweep(), -3.0 * PI / 2.0, epsilon = 1e-12);
    }

    #[test]
    fn square_area_sign() {
        assert_relative_eq!(loop_signed_area(&square()), 1.0, epsilon = 1e-12);
        assert_relative_eq!(loop_signed_area(&reverse_loop(&square())), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn half_disc_area() {
        // Upper half disc: diameter along x, arc back over the top.
        let loop_ = vec![
            Segment::line(p(-1.0, 0.0), p(1.0, 0.0)),
            Segment::arc(p(1.0, 0.0), p(-1.0, 0.0), p(0.0, 0.0), false),
        ];
        assert_relative_eq!(loop_signed_area(&loop_), PI / 2.0, epsilon = 1e-9);
    }

    #[test]
    fn circle_area() {
        let c = Segment::circle(p(3.0, 4.0), 2.0, false);
        assert_relative_eq!(c.signed_area_term(), 4.0 * PI, epsilon = 1e-9);
        assert_relative_eq!(c.reversed().signed_area_term(), -4.0 * PI, epsilon = 1e-9);
    }

    #[test]
    fn line_contains_point() {
        let tol = Tolerance::default();
        let l = Segment::line(p(0.0, 0.0), p(2.0, 0.0));
        assert!(l.contains_point(&p(1.0, 0.0), &tol));
        assert!(l.contains_point(&p(2.0, 0.0), &tol));
        assert!(!l.contains_point(&p(2.1, 0.0), &tol));
        assert!(!l.contains_point(&p(1.0, 0.1), &tol));
    }

    #[test]
    fn arc_contains_point_respects_sweep() {
        let tol = Tolerance::default();
        let arc = Segment::arc(p(1.0, 0.0), p(0.0, 1.0), p(0.0, 0.0), false);
        let on = p((PI / 4.0).cos(), (PI / 4.0).sin());
        assert!(arc.contains_point(&on, &tol));
        assert!(!arc.contains_point(&p(-1.0, 0.0), &tol));
        assert!(arc.contains_point(&p(0.0, 1.0), &tol));
    }

    #[test]
    fn reversed_arc_keeps_geometry() {
        let tol = Tolerance::default();
        let arc = Segment::arc(p(1.0, 0.0), p(0.0, 1.0), p(0.0, 0.0), false);
        let rev = arc.reversed();
        assert_relative_eq!(rev.sweep(), -arc.sweep(), epsilon = 1e-12);
        assert!(arc.geometric_eq(&rev, &tol));
        let mid = arc.midpoint().unwrap();
        assert!(tol.points_equal(&mid, &rev.midpoint().unwrap()));
    }

    #[test]
    fn ray_hits_line_in_front_only() {
        let tol = Tolerance::default();
        let wall = Segment::line(p(5.0, -1.0), p(5.0, 1.0));
        let right = wall.ray_intersections(&p(0.0, 0.0), &Vector2::new(1.0, 0.0), &tol);
        assert_eq!(right.as_slice(), &[5.0]);
        let left = wall.ray_intersections(&p(0.0, 0.0), &Vector2::new(-1.0, 0.0), &tol);
        assert!(left.is_empty());
    }

    #[test]
    fn ray_hits_arc_within_sweep() {
        let tol = Tolerance::default();
        // Right half of a unit circle around (3, 0).
        let arc = Segment::arc(p(3.0, -1.0), p(3.0, 1.0), p(3.0, 0.0), false);
        let hits = arc.ray_intersections(&p(0.0, 0.0), &Vector2::new(1.0, 0.0), &tol);
        assert_eq!(hits.len(), 1);
        assert_relative_eq!(hits[0], 4.0, epsilon = 1e-12);
    }

    #[test]
    fn loop_gap_detects_open_loop() {
        let tol = Tolerance::default();
        assert!(loop_gap(&square(), &tol).is_none());
        let mut open = square();
        open.pop();
        let (index, gap) = loop_gap(&open, &tol).unwrap();
        assert_eq!(index, 2);
        assert_relative_eq!(gap, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn extreme_points_of_quarter_arc() {
        let tol = Tolerance::default();
        let arc = Segment::arc(p(1.0, 0.0), p(0.0, 1.0), p(0.0, 0.0), false);
        // Endpoints plus the two quadrant points they coincide with.
        assert_eq!(arc.extreme_points(&tol).len(), 4);
    }

    #[test]
    fn discretize_quarter_arc() {
        let arc = Segment::arc(p(1.0, 0.0), p(0.0, 1.0), p(0.0, 0.0), false);
        let pts = arc.discretize(32);
        assert_eq!(pts.len(), 8);
        assert_relative_eq!(pts[0].x, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn serializes_with_type_tag() {
        let json = serde_json::to_string(&Segment::line(p(0.0, 0.0), p(1.0, 0.0))).unwrap();
        assert!(json.contains("\"type\":\"line\""));
        let back: Segment = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Segment::line(p(0.0, 0.0), p(1.0, 0.0)));
    }
}
