// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Orientation-normalized polygon forms handed to the builder pipeline.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::segment::{loop_signed_area, reverse_loop, Segment};

/// A region bounded by an outer loop and zero or more hole loops of curves.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    pub outer: Vec<Segment>,
    pub holes: Vec<Vec<Segment>>,
}

impl Polygon {
    pub fn new(outer: Vec<Segment>, holes: Vec<Vec<Segment>>) -> Self {
        Self { outer, holes }
    }

    /// Returns the polygon with the outer loop counterclockwise and every
    /// hole clockwise. Already-normalized loops are returned unchanged.
    pub fn normalized(&self) -> Self {
        let outer = if loop_signed_area(&self.outer) < 0.0 {
            reverse_loop(&self.outer)
        } else {
            self.outer.clone()
        };
        let holes = self
            .holes
            .iter()
            .map(|hole| {
                if loop_signed_area(hole) > 0.0 {
                    reverse_loop(hole)
                } else {
                    hole.clone()
                }
            })
            .collect();
        Self { outer, holes }
    }

    /// Returns `true` if the outer loop is counterclockwise and all holes clockwise.
    pub fn is_normalized(&self) -> bool {
        loop_signed_area(&self.outer) >= 0.0
            && self.holes.iter().all(|h| loop_signed_area(h) <= 0.0)
    }

    /// Enclosed area (outer minus holes).
    pub fn area(&self) -> f64 {
        let holes: f64 = self.holes.iter().map(|h| loop_signed_area(h).abs()).sum();
        loop_signed_area(&self.outer).abs() - holes
    }

    /// All curves, outer loop first.
    pub fn curves(&self) -> impl Iterator<Item = &Segment> {
        self.outer.iter().chain(self.holes.iter().flatten())
    }
}

/// Input record for the 3D builder: normalized loops plus the topology id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuilderRegion {
    pub outer: Vec<Segment>,
    pub holes: Vec<Vec<Segment>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topo_name: Option<String>,
}

/// 2D point profile with optional holes, arcs flattened to polylines.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile2D {
    /// Outer boundary (counter-clockwise)
    pub outer: Vec<Point2<f64>>,
    /// Holes (clockwise)
    pub holes: Vec<Vec<Point2<f64>>>,
}

impl Profile2D {
    pub(crate) fn from_polygon(polygon: &Polygon, segments_per_turn: usize) -> Self {
        let flatten = |loop_: &[Segment]| -> Vec<Point2<f64>> {
            loop_
                .iter()
                .flat_map(|s| s.discretize(segments_per_turn))
                .collect()
        };
        Self {
            outer: flatten(polygon.outer.as_slice()),
            holes: polygon.holes.iter().map(|h| flatten(h.as_slice())).collect(),
        }
    }
}
