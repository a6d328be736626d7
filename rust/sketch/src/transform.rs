// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Affine transformation of a whole sketch.
//!
//! Points are moved in place. Curves reference points through keys, so lines
//! and arc endpoints follow automatically; arc and circle centers and radii
//! are updated on the curves themselves.

use nalgebra::{Matrix2, Matrix3};

use crate::error::{Error, Result};
use crate::sketch::{Curve, Sketch};

/// Relative tolerance for recognising a similarity (rotation + uniform scale).
const SIMILARITY_EPS: f64 = 1e-9;

/// Uniform scale factor of a 2×2 linear part, `None` for shear or
/// non-uniform scale.
fn similarity_scale(linear: &Matrix2<f64>) -> Option<f64> {
    let c0 = linear.column(0);
    let c1 = linear.column(1);
    let (n0, n1) = (c0.norm(), c1.norm());
    if n0 == 0.0 || n1 == 0.0 {
        return None;
    }
    let scale = n0.max(n1);
    let uniform = (n0 - n1).abs() <= SIMILARITY_EPS * scale;
    let orthogonal = c0.dot(&c1).abs() <= SIMILARITY_EPS * scale * scale;
    (uniform && orthogonal).then_some(n0)
}

impl Sketch {
    /// Applies an affine 2D transform (homogeneous, last row `0 0 1`).
    ///
    /// Each point is transformed exactly once. Mirroring matrices toggle arc
    /// direction and reverse every wire so outer loops keep their winding.
    /// Sketches with arcs or circles (including background regions) only
    /// accept similarity transforms; anything else fails with
    /// [`Error::NonUniformArcTransform`] before the sketch is touched.
    pub fn transform(&mut self, matrix: &Matrix3<f64>) -> Result<()> {
        let linear = matrix.fixed_view::<2, 2>(0, 0).into_owned();
        let det = linear.determinant();
        if det.abs() <= f64::EPSILON {
            return Err(Error::DegenerateGeometry("singular transform".to_string()));
        }
        let flipped = det < 0.0;

        let has_round = self
            .curves
            .values()
            .any(|c| !matches!(c, Curve::Line { .. }))
            || self.background.curves().any(|s| s.center().is_some());
        let scale = match similarity_scale(&linear) {
            Some(s) => s,
            None if has_round => return Err(Error::NonUniformArcTransform),
            None => det.abs().sqrt(),
        };

        for point in self.points.values_mut() {
            let p = matrix.transform_point(&point.to_point());
            point.x = p.x;
            point.y = p.y;
        }

        for curve in self.curves.values_mut() {
            match curve {
                Curve::Line { .. } => {}
                Curve::Arc {
                    center,
                    radius,
                    clockwise,
                    ..
                }
                | Curve::Circle {
                    center,
                    radius,
                    clockwise,
                } => {
                    *center = matrix.transform_point(center);
                    *radius *= scale;
                    *clockwise ^= flipped;
                }
            }
        }

        if flipped {
            for wire in self.wires.values_mut() {
                wire.curves.reverse();
                wire.orientations.reverse();
                for forward in &mut wire.orientations {
                    *forward = !*forward;
                }
            }
        }

        self.background = self.background.transformed(matrix, scale, flipped);

        tracing::debug!(
            points = self.points.len(),
            curves = self.curves.len(),
            scale,
            flipped,
            "Transformed sketch"
        );
        Ok(())
    }
}
