// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Background regions and edge replacement.
//!
//! The background is the set of regions a sketch is drawn on (for a floor
//! plan, the wall-enclosed area). When walls are split or merged, the
//! background's boundary edges are swapped for the new ones in place with
//! [`Background::replace_edges`].

use nalgebra::{Matrix3, Point2};
use serde::{Deserialize, Serialize};

use crate::config::Tolerance;
use crate::error::{Error, Result};
use crate::polygon::Polygon;
use crate::segment::{loop_gap, Segment};
use crate::sketch::Sketch;

/// Background region set of a sketch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Background {
    pub regions: Vec<Polygon>,
}

impl Background {
    pub fn new(regions: Vec<Polygon>) -> Self {
        Self { regions }
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Outer loop of the first region (empty if there are none).
    pub fn first_outer(&self) -> &[Segment] {
        self.regions
            .first()
            .map(|r| r.outer.as_slice())
            .unwrap_or(&[])
    }

    /// All curves of all regions, outer loops first within each region.
    pub fn curves(&self) -> impl Iterator<Item = &Segment> {
        self.regions.iter().flat_map(|r| r.curves())
    }

    /// Substitutes `original` edges with `replacement` edges in every region loop.
    ///
    /// Loop edges that match an original edge (same geometry, either
    /// direction) are grouped into spans of consecutive edges. Each span is
    /// replaced by:
    ///
    /// - the replacement edges lying on it (a split or a regrouped chain),
    ///   ordered and oriented along the span;
    /// - otherwise, for each of its edges, a replacement containing it (a
    ///   merge), spliced in once per run it covers.
    ///
    /// Unmatched edges pass through unchanged. All loops are rebuilt first and
    /// checked for closure; if any loop fails to close, nothing is modified
    /// and [`Error::UnclosedBackgroundLoop`] is returned.
    ///
    /// Returns the number of loop edges that were substituted.
    pub fn replace_edges(
        &mut self,
        original: &[Segment],
        replacement: &[Segment],
        tol: &Tolerance,
    ) -> Result<usize> {
        let mut substituted = 0;
        let mut rebuilt = Vec::with_capacity(self.regions.len());

        for (region_index, region) in self.regions.iter().enumerate() {
            let mut splice = |loop_: &[Segment]| -> Result<Vec<Segment>> {
                let (new_loop, count) = splice_loop(loop_, original, replacement, tol);
                if count > 0 {
                    if let Some((index, gap)) = loop_gap(&new_loop, tol) {
                        return Err(Error::UnclosedBackgroundLoop {
                            region: region_index,
                            index,
                            gap,
                        });
                    }
                }
                substituted += count;
                Ok(new_loop)
            };
            let outer = splice(region.outer.as_slice())?;
            let holes = region
                .holes
                .iter()
                .map(|h| splice(h.as_slice()))
                .collect::<Result<Vec<_>>>()?;
            rebuilt.push(Polygon::new(outer, holes));
        }

        tracing::debug!(
            regions = rebuilt.len(),
            substituted,
            originals = original.len(),
            replacements = replacement.len(),
            "Replaced background edges"
        );
        self.regions = rebuilt;
        Ok(substituted)
    }

    /// The background under a similarity transform.
    pub(crate) fn transformed(&self, matrix: &Matrix3<f64>, scale: f64, flipped: bool) -> Self {
        let map_loop = |loop_: &[Segment]| -> Vec<Segment> {
            let mapped = loop_.iter().map(|s| s.transformed(matrix, scale, flipped));
            if flipped {
                mapped.rev().map(|s| s.reversed()).collect()
            } else {
                mapped.collect()
            }
        };
        Self {
            regions: self
                .regions
                .iter()
                .map(|r| {
                    Polygon::new(
                        map_loop(r.outer.as_slice()),
                        r.holes.iter().map(|h| map_loop(h.as_slice())).collect(),
                    )
                })
                .collect(),
        }
    }
}

/// Rebuilds one loop, returning it with the number of substituted edges.
///
/// Consecutive loop edges that match originals form one span; the span is
/// replaced as a whole, so replacement pieces may straddle the original
/// split points.
fn splice_loop(
    loop_: &[Segment],
    original: &[Segment],
    replacement: &[Segment],
    tol: &Tolerance,
) -> (Vec<Segment>, usize) {
    let n = loop_.len();
    let matched: Vec<bool> = loop_
        .iter()
        .map(|edge| original.iter().any(|o| o.geometric_eq(edge, tol)))
        .collect();
    let substituted = matched.iter().filter(|&&m| m).count();
    if substituted == 0 {
        return (loop_.to_vec(), 0);
    }

    // Start at the head of a span that wraps around the loop's seam.
    let mut start = 0;
    if substituted < n && matched[0] && matched[n - 1] {
        start = n - 1;
        while matched[start - 1] {
            start -= 1;
        }
    }

    let mut out = Vec::with_capacity(n + replacement.len());
    let mut i = 0;
    while i < n {
        let idx = (start + i) % n;
        if !matched[idx] {
            out.push(loop_[idx]);
            i += 1;
            continue;
        }
        let mut span = Vec::new();
        while i < n && matched[(start + i) % n] {
            span.push(loop_[(start + i) % n]);
            i += 1;
        }
        out.extend(splice_span(&span, replacement, tol));
    }

    (out, substituted)
}

/// Replacement chain for a span of connected original edges.
///
/// Pieces lying on the span are ordered and oriented along it. If none do,
/// each span edge is covered by a longer replacement that contains it.
fn splice_span(span: &[Segment], replacement: &[Segment], tol: &Tolerance) -> Vec<Segment> {
    let mut offsets = Vec::with_capacity(span.len());
    let mut total = 0.0;
    for edge in span {
        offsets.push(total);
        total += edge.length();
    }
    let locate = |p: &Point2<f64>| -> Option<f64> {
        span.iter()
            .zip(&offsets)
            .find(|(edge, _)| edge.contains_point(p, tol))
            .map(|(edge, offset)| offset + position_on(edge, p, tol))
    };

    let mut pieces: Vec<(f64, Segment)> = Vec::new();
    for r in replacement {
        if pieces.iter().any(|(_, placed)| placed.geometric_eq(r, tol)) {
            continue;
        }
        let (Some(s), Some(m), Some(e)) = (r.start(), r.midpoint(), r.end()) else {
            continue;
        };
        let (Some(at_start), Some(at_mid), Some(at_end)) = (locate(&s), locate(&m), locate(&e))
        else {
            continue;
        };
        let piece = if at_start > at_end { r.reversed() } else { *r };
        pieces.push((at_mid, piece));
    }

    if !pieces.is_empty() {
        pieces.sort_by(|a, b| a.0.total_cmp(&b.0));
        return pieces.into_iter().map(|(_, s)| s).collect();
    }

    let mut out: Vec<Segment> = Vec::new();
    for edge in span {
        if let Some(cover) = replacement.iter().find(|r| edge.lies_on(r, tol)) {
            let oriented = orient_along_cover(cover, edge, tol);
            if !out.last().is_some_and(|last| last.geometric_eq(&oriented, tol)) {
                out.push(oriented);
            }
        }
        // An original with no replacement is dropped; the closure check reports it.
    }
    out
}

/// Position of `p` along `curve`, pinned at the endpoints so an arc's start
/// never wraps around to a full turn.
fn position_on(curve: &Segment, p: &Point2<f64>, tol: &Tolerance) -> f64 {
    if curve.start().is_some_and(|s| tol.points_equal(&s, p)) {
        0.0
    } else if curve.end().is_some_and(|e| tol.points_equal(&e, p)) {
        curve.length()
    } else {
        curve.param_of(p)
    }
}

/// `cover` (containing `edge`) oriented in the direction of `edge`.
fn orient_along_cover(cover: &Segment, edge: &Segment, tol: &Tolerance) -> Segment {
    match (edge.start(), edge.end()) {
        (Some(s), Some(e)) if position_on(cover, &s, tol) > position_on(cover, &e, tol) => {
            cover.reversed()
        }
        _ => *cover,
    }
}

impl Sketch {
    /// Substitutes background edges in place; see [`Background::replace_edges`].
    pub fn change_background_by_edges(
        &mut self,
        original: &[Segment],
        replacement: &[Segment],
    ) -> Result<usize> {
        let tol = self.tolerance;
        self.background.replace_edges(original, replacement, &tol)
    }
}
