// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for sketch operations.

use crate::keys::{CurveKey, CurveKind, FaceKey, PointKey, WireKey};

/// Result type alias for sketch operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during sketch operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Point key not found in the sketch.
    #[error("point not found: {0:?}")]
    PointNotFound(PointKey),

    /// Curve key not found in the sketch.
    #[error("curve not found: {0:?}")]
    CurveNotFound(CurveKey),

    /// Wire key not found in the sketch.
    #[error("wire not found: {0:?}")]
    WireNotFound(WireKey),

    /// Face key not found in the sketch.
    #[error("face not found: {0:?}")]
    FaceNotFound(FaceKey),

    /// A wire must have at least one curve.
    #[error("wire must have at least one curve")]
    EmptyWire,

    /// Curves in a wire do not form a closed loop.
    #[error("wire is not closed: curve {index} does not meet its successor (gap {gap})")]
    OpenWire { index: usize, gap: f64 },

    /// A face was used before an outer loop was assigned.
    #[error("face has no outer loop: {0:?}")]
    MissingOuterLoop(FaceKey),

    /// A topology name string does not match `"{faceId}_{name}"` or `"background"`.
    #[error("malformed topology name: {0:?}")]
    MalformedTopoName(String),

    /// The operation does not support the given curve kind.
    #[error("{operation} is not applicable to {kind} curves")]
    NotApplicable {
        operation: &'static str,
        kind: CurveKind,
    },

    /// Zero-length chord, zero sagitta, zero radius and similar input.
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),

    /// A background loop could not be closed after edge replacement.
    #[error("background region {region} is not closed after edge replacement: gap {gap} after curve {index}")]
    UnclosedBackgroundLoop {
        region: usize,
        index: usize,
        gap: f64,
    },

    /// Arcs and circles cannot be sheared or scaled non-uniformly.
    #[error("non-uniform scale or shear cannot be applied to arcs or circles")]
    NonUniformArcTransform,
}
