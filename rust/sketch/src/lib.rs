// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Plan-Lite Sketch
//!
//! 2D planar sketch kernel for floor-plan editing.
//!
//! A [`Sketch`] owns points, curves, wires and faces in slot-map arenas and
//! addresses them through generational keys. Faces are rooms, wall-profile
//! regions or opening cut-outs: one closed outer [`Wire`] plus any number of
//! hole wires. Adjacent faces share curves and points, so every traversal
//! de-duplicates by key.
//!
//! The crate covers:
//!
//! - construction and loop assignment with a consistent wire→face
//!   back-reference ([`Sketch::set_outer_loop`], [`Sketch::set_inner_loops`]),
//! - orientation-normalized export ([`Sketch::to_math_polygon`],
//!   [`Sketch::to_builder_region`], [`Sketch::to_polygon`]),
//! - topology names ([`TopologyName`]),
//! - deep cloning ([`clone_sketch_data`], [`Sketch::copy_face`]),
//! - snapping and dimensioning queries ([`Sketch::reference_points`],
//!   [`points_dimensions_inside_polygon`], [`circle_arc_center_by_sagitta`]),
//! - background edge replacement ([`Sketch::change_background_by_edges`]),
//! - curve overlap classification ([`classify_overlap`]).
//!
//! ## Example
//!
//! ```
//! use nalgebra::Point2;
//! use plan_lite_sketch::{make_rectangle, Sketch};
//!
//! let mut sketch = Sketch::new();
//! let (face, _, _) = make_rectangle(&mut sketch, Point2::new(0.0, 0.0), Point2::new(4.0, 3.0)).unwrap();
//! sketch.face_mut(face).unwrap().add_topo("1_kitchen");
//!
//! let region = sketch.to_builder_region(face).unwrap();
//! assert_eq!(region.topo_name.as_deref(), Some("1_kitchen"));
//! assert_eq!(sketch.face_area(face).unwrap(), 12.0);
//! ```

pub mod background;
pub mod clone;
pub mod config;
pub mod construction;
pub mod error;
pub mod face;
pub mod keys;
pub mod overlap;
pub mod polygon;
pub mod query;
pub mod segment;
pub mod sketch;
pub mod topo_name;
pub mod transform;

pub use background::Background;
pub use clone::{clone_sketch_data, SketchKeyMap};
pub use config::Tolerance;
pub use construction::make_rectangle;
pub use error::{Error, Result};
pub use keys::{CurveKey, CurveKind, FaceKey, PointKey, WireKey};
pub use overlap::{classify_overlap, paths_overlap, CurveOverlap};
pub use polygon::{BuilderRegion, Polygon, Profile2D};
pub use query::{
    circle_arc_center_by_sagitta, points_dimensions_inside_polygon, ArcCenter, DirectionalHits,
    FaceEdgeUse, RayHit, ReferencePoint, ReferencePointKind,
};
pub use segment::{loop_gap, loop_signed_area, reverse_loop, Segment};
pub use sketch::{Curve, Face2d, PointData, Sketch, Wire};
pub use topo_name::{TopologyName, BACKGROUND_FACE_ID, BACKGROUND_TOPO_NAME};
