// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Plan-Lite Opening
//!
//! Host wall and opening model plus A/B side classification of an opening's
//! split faces.
//!
//! An opening cut through a wall is split along seams into faces; the faces
//! on either side of a seam are brothers. [`OpeningFaceClassifier`] decides
//! which face of each pair lies on the room-bearing (A) side of the host
//! [`Wall`] and which on the other (B) side.
//!
//! ## Example
//!
//! ```
//! use nalgebra::Point2;
//! use plan_lite_opening::{OpeningFace, OpeningFaceClassifier, ParametricOpening, Wall, WallFace};
//! use plan_lite_sketch::{Polygon, Segment, Tolerance};
//!
//! let square = |x0: f64, y0: f64, x1: f64, y1: f64| {
//!     let c = [
//!         Point2::new(x0, y0),
//!         Point2::new(x1, y0),
//!         Point2::new(x1, y1),
//!         Point2::new(x0, y1),
//!     ];
//!     Polygon::new((0..4).map(|i| Segment::line(c[i], c[(i + 1) % 4])).collect(), vec![])
//! };
//!
//! let mut wall = Wall::new(1);
//! wall.add_left_face(WallFace::new(10, square(0.0, 1.0, 10.0, 2.0)).with_room("kitchen")).unwrap();
//! wall.add_right_face(WallFace::new(20, square(0.0, -2.0, 10.0, -1.0))).unwrap();
//!
//! let mut door = ParametricOpening::new(5, wall);
//! door.add_face(OpeningFace::new(1, square(3.0, 1.0, 5.0, 2.0))).unwrap();
//! door.add_face(OpeningFace::new(2, square(3.0, -2.0, 5.0, -1.0))).unwrap();
//! door.add_split_pair(1, 2).unwrap();
//!
//! let split = OpeningFaceClassifier::new(&door, Tolerance::default()).split_ab_face_pairs();
//! assert_eq!(split.a_faces[0].id, 1);
//! assert_eq!(split.b_faces[0].id, 2);
//! ```

pub mod classifier;
pub mod error;
pub mod model;

pub use classifier::{AbWallFaces, OpeningFaceClassifier, SplitAbFaces};
pub use error::{Error, Result};
pub use model::{FaceId, OpeningFace, ParametricOpening, Wall, WallFace};
