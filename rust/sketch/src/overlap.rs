// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Curve-curve overlap classification.
//!
//! Two curves overlap when they share a stretch of positive length: collinear
//! lines whose parameter ranges intersect, or arcs/circles on the same circle
//! whose angular ranges intersect. Touching at a single point is not overlap.

use std::f64::consts::TAU;

use nalgebra::Vector2;

use crate::config::Tolerance;
use crate::segment::{normalize_angle, Segment};

/// Result of comparing two curves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CurveOverlap {
    /// No shared stretch.
    None,
    /// The curves share a stretch, but not their full extent.
    Overlap,
    /// The curves cover exactly the same stretch.
    TotallyOverlap,
}

impl CurveOverlap {
    /// Returns `true` for `Overlap` and `TotallyOverlap`.
    pub fn is_overlapping(&self) -> bool {
        !matches!(self, CurveOverlap::None)
    }
}

/// Classifies how two curves overlap.
pub fn classify_overlap(a: &Segment, b: &Segment, tol: &Tolerance) -> CurveOverlap {
    match (a, b) {
        (Segment::Line { start: a0, end: a1 }, Segment::Line { start: b0, end: b1 }) => {
            let d = a1 - a0;
            let len = d.norm();
            if len <= tol.length {
                return CurveOverlap::None;
            }
            let u = d / len;
            let n = Vector2::new(-u.y, u.x);
            if (b0 - a0).dot(&n).abs() > tol.length || (b1 - a0).dot(&n).abs() > tol.length {
                return CurveOverlap::None;
            }
            let t0 = (b0 - a0).dot(&u);
            let t1 = (b1 - a0).dot(&u);
            let (lo, hi) = if t0 <= t1 { (t0, t1) } else { (t1, t0) };
            classify_ranges((0.0, len), (lo, hi), tol.length)
        }
        (Segment::Line { .. }, _) | (_, Segment::Line { .. }) => CurveOverlap::None,
        _ => {
            let (Some(ac), Some(bc)) = (a.center(), b.center()) else {
                return CurveOverlap::None;
            };
            let (ar, br) = (radius_of(a), radius_of(b));
            if !tol.points_equal(&ac, &bc) || !tol.is_zero(ar - br) || ar <= tol.length {
                return CurveOverlap::None;
            }
            let ia = ccw_interval(a);
            let ib = ccw_interval(b);
            let shared = circular_overlap(ia, ib) * ar;
            if shared <= tol.length {
                return CurveOverlap::None;
            }
            let (la, lb) = (ia.1 * ar, ib.1 * ar);
            if tol.is_zero(la - lb) && shared >= la - tol.length {
                CurveOverlap::TotallyOverlap
            } else {
                CurveOverlap::Overlap
            }
        }
    }
}

/// Returns `true` if any curve of `a` overlaps any curve of `b`.
pub fn paths_overlap(a: &[Segment], b: &[Segment], tol: &Tolerance) -> bool {
    a.iter()
        .any(|ca| b.iter().any(|cb| classify_overlap(ca, cb, tol).is_overlapping()))
}

fn classify_ranges(a: (f64, f64), b: (f64, f64), eps: f64) -> CurveOverlap {
    let shared = a.1.min(b.1) - a.0.max(b.0);
    if shared <= eps {
        CurveOverlap::None
    } else if (a.0 - b.0).abs() <= eps && (a.1 - b.1).abs() <= eps {
        CurveOverlap::TotallyOverlap
    } else {
        CurveOverlap::Overlap
    }
}

fn radius_of(s: &Segment) -> f64 {
    match s {
        Segment::Arc { radius, .. } | Segment::Circle { radius, .. } => *radius,
        Segment::Line { .. } => 0.0,
    }
}

/// Counterclockwise `(start_angle, extent)` covered by an arc or circle.
fn ccw_interval(s: &Segment) -> (f64, f64) {
    match s {
        Segment::Circle { .. } => (0.0, TAU),
        _ => {
            let sweep = s.sweep();
            if sweep >= 0.0 {
                (normalize_angle(s.start_angle()), sweep)
            } else {
                (normalize_angle(s.start_angle() + sweep), -sweep)
            }
        }
    }
}

/// Largest angular stretch shared by two counterclockwise intervals.
fn circular_overlap(a: (f64, f64), b: (f64, f64)) -> f64 {
    [-TAU, 0.0, TAU]
        .iter()
        .map(|shift| {
            let bs = b.0 + shift;
            (a.0 + a.1).min(bs + b.1) - a.0.max(bs)
        })
        .fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point2;

    fn p(x: f64, y: f64) -> Point2<f64> {
        Point2::new(x, y)
    }

    #[test]
    fn collinear_lines_overlap() {
        let tol = Tolerance::default();
        let a = Segment::line(p(0.0, 0.0), p(4.0, 0.0));
        let b = Segment::line(p(2.0, 0.0), p(6.0, 0.0));
        assert_eq!(classify_overlap(&a, &b, &tol), CurveOverlap::Overlap);
    }

    #[test]
    fn identical_lines_totally_overlap_in_either_direction() {
        let tol = Tolerance::default();
        let a = Segment::line(p(0.0, 0.0), p(4.0, 0.0));
        assert_eq!(classify_overlap(&a, &a.reversed(), &tol), CurveOverlap::TotallyOverlap);
    }

    #[test]
    fn touching_lines_do_not_overlap() {
        let tol = Tolerance::default();
        let a = Segment::line(p(0.0, 0.0), p(4.0, 0.0));
        let b = Segment::line(p(4.0, 0.0), p(6.0, 0.0));
        assert_eq!(classify_overlap(&a, &b, &tol), CurveOverlap::None);
    }

    #[test]
    fn parallel_offset_lines_do_not_overlap() {
        let tol = Tolerance::default();
        let a = Segment::line(p(0.0, 0.0), p(4.0, 0.0));
        let b = Segment::line(p(0.0, 0.2), p(4.0, 0.2));
        assert_eq!(classify_overlap(&a, &b, &tol), CurveOverlap::None);
    }

    #[test]
    fn concentric_arcs_overlap_across_zero_angle() {
        let tol = Tolerance::default();
        let c = p(0.0, 0.0);
        // -45°..45° and 0°..90°.
        let s = std::f64::consts::FRAC_1_SQRT_2;
        let a = Segment::arc(p(s, -s), p(s, s), c, false);
        let b = Segment::arc(p(1.0, 0.0), p(0.0, 1.0), c, false);
        assert_eq!(classify_overlap(&a, &b, &tol), CurveOverlap::Overlap);
        assert_eq!(classify_overlap(&b, &a.reversed(), &tol), CurveOverlap::Overlap);
    }

    #[test]
    fn arc_and_its_reverse_totally_overlap() {
        let tol = Tolerance::default();
        let a = Segment::arc(p(1.0, 0.0), p(0.0, 1.0), p(0.0, 0.0), false);
        assert_eq!(classify_overlap(&a, &a.reversed(), &tol), CurveOverlap::TotallyOverlap);
    }

    #[test]
    fn line_and_arc_never_overlap() {
        let tol = Tolerance::default();
        let a = Segment::arc(p(1.0, 0.0), p(0.0, 1.0), p(0.0, 0.0), false);
        let b = Segment::line(p(1.0, 0.0), p(0.0, 1.0));
        assert_eq!(classify_overlap(&a, &b, &tol), CurveOverlap::None);
    }

    #[test]
    fn paths_overlap_any_pair() {
        let tol = Tolerance::default();
        let a = vec![
            Segment::line(p(0.0, 0.0), p(1.0, 0.0)),
            Segment::line(p(1.0, 0.0), p(1.0, 1.0)),
        ];
        let b = vec![Segment::line(p(1.0, 0.5), p(1.0, 3.0))];
        assert!(paths_overlap(&a, &b, &tol));
        assert!(!paths_overlap(&a[..1], &b, &tol));
    }
}
