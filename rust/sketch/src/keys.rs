// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Key types for arena-based sketch storage.
//!
//! Every point, curve, wire and face in a [`Sketch`](crate::Sketch) is
//! addressed by a generational `slotmap` key. Keys are the identity used for
//! all de-duplication: two curves reachable through different faces are the
//! same curve exactly when their keys are equal.

use slotmap::new_key_type;

new_key_type! {
    /// Key for a sketch point (shared endpoint of lines and arcs).
    pub struct PointKey;

    /// Key for a curve (line, arc or circle).
    pub struct CurveKey;

    /// Key for a wire (closed loop of oriented curves).
    pub struct WireKey;

    /// Key for a face (outer wire plus hole wires).
    pub struct FaceKey;
}

/// Discriminant for curve kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CurveKind {
    Line = 0,
    Arc = 1,
    Circle = 2,
}

impl CurveKind {
    /// Returns the kind name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            CurveKind::Line => "Line",
            CurveKind::Arc => "Arc",
            CurveKind::Circle => "Circle",
        }
    }

    /// Returns `true` for kinds with a well-defined start and end point.
    pub fn has_endpoints(&self) -> bool {
        matches!(self, CurveKind::Line | CurveKind::Arc)
    }
}

impl std::fmt::Display for CurveKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curve_kind_names() {
        assert_eq!(CurveKind::Line.as_str(), "Line");
        assert_eq!(CurveKind::Arc.to_string(), "Arc");
        assert_eq!(CurveKind::Circle.to_string(), "Circle");
    }

    #[test]
    fn only_open_kinds_have_endpoints() {
        assert!(CurveKind::Line.has_endpoints());
        assert!(CurveKind::Arc.has_endpoints());
        assert!(!CurveKind::Circle.has_endpoints());
    }
}
