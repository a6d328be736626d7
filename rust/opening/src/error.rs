// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for opening model construction.

use crate::model::FaceId;

/// Result type alias for opening operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building an opening model.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A face id was referenced that the opening does not contain.
    #[error("opening face not found: {0}")]
    FaceNotFound(FaceId),

    /// A face id was added twice to the same opening or wall.
    #[error("duplicate face id: {0}")]
    DuplicateFace(FaceId),

    /// A face cannot be its own brother.
    #[error("face {0} cannot be paired with itself")]
    SelfBrother(FaceId),

    /// A face already has a different brother.
    #[error("face {face} is already paired with {brother}")]
    AlreadyPaired { face: FaceId, brother: FaceId },

    /// Error raised by the sketch kernel.
    #[error(transparent)]
    Sketch(#[from] plan_lite_sketch::Error),
}
