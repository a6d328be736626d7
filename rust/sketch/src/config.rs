// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Numeric tolerances used by sketch predicates and queries.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

const DEFAULT_LENGTH_TOL: f64 = 1e-6;
const DEFAULT_ANGLE_TOL: f64 = 1e-9;
const DEFAULT_ARC_SEGMENTS: usize = 32;

/// Tolerance configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Tolerance {
    /// Distance below which two points are equal and a point lies on a curve.
    pub length: f64,
    /// Angular slack (radians) for arc sweep-range tests.
    pub angle: f64,
    /// Polyline segments per full turn when discretising arcs.
    pub arc_segments: usize,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            length: DEFAULT_LENGTH_TOL,
            angle: DEFAULT_ANGLE_TOL,
            arc_segments: DEFAULT_ARC_SEGMENTS,
        }
    }
}

impl Tolerance {
    /// Load tolerances from environment variables, falling back to defaults.
    ///
    /// Reads `PLAN_SKETCH_LENGTH_TOL`, `PLAN_SKETCH_ANGLE_TOL` and
    /// `PLAN_SKETCH_ARC_SEGMENTS`.
    pub fn from_env() -> Self {
        Self {
            length: std::env::var("PLAN_SKETCH_LENGTH_TOL")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|v: &f64| *v > 0.0)
                .unwrap_or(DEFAULT_LENGTH_TOL),
            angle: std::env::var("PLAN_SKETCH_ANGLE_TOL")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|v: &f64| *v >= 0.0)
                .unwrap_or(DEFAULT_ANGLE_TOL),
            arc_segments: std::env::var("PLAN_SKETCH_ARC_SEGMENTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|v: &usize| *v >= 4)
                .unwrap_or(DEFAULT_ARC_SEGMENTS),
        }
    }

    /// Returns `true` if two points are within the length tolerance.
    #[inline]
    pub fn points_equal(&self, a: &Point2<f64>, b: &Point2<f64>) -> bool {
        (a - b).norm() <= self.length
    }

    /// Returns `true` if `value` is within the length tolerance of zero.
    #[inline]
    pub fn is_zero(&self, value: f64) -> bool {
        value.abs() <= self.length
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let tol = Tolerance::default();
        assert_eq!(tol.length, 1e-6);
        assert_eq!(tol.arc_segments, 32);
    }

    #[test]
    fn points_equal_within_tolerance() {
        let tol = Tolerance::default();
        assert!(tol.points_equal(&Point2::new(1.0, 1.0), &Point2::new(1.0, 1.0 + 1e-8)));
        assert!(!tol.points_equal(&Point2::new(1.0, 1.0), &Point2::new(1.0, 1.01)));
    }

    #[test]
    fn deserialize_fills_missing_fields() {
        let tol: Tolerance = serde_json::from_str(r#"{"length": 0.001}"#).unwrap();
        assert_eq!(tol.length, 0.001);
        assert_eq!(tol.angle, DEFAULT_ANGLE_TOL);
        assert_eq!(tol.arc_segments, DEFAULT_ARC_SEGMENTS);
    }
}
