// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Face topology names and polygon conversions.

use nalgebra::Point2;

use crate::error::{Error, Result};
use crate::keys::*;
use crate::polygon::{BuilderRegion, Polygon, Profile2D};
use crate::segment::Segment;
use crate::sketch::{Face2d, Sketch};
use crate::topo_name::TopologyName;

/// Separator used to join topology names into one id string.
const TOPO_SEPARATOR: &str = ":";

impl Face2d {
    /// Topology names in first-occurrence order, without duplicates.
    pub fn topos(&self) -> &[String] {
        &self.topos
    }

    /// All topology names joined with `:`, `None` if there are none.
    pub fn topo_name(&self) -> Option<String> {
        if self.topos.is_empty() {
            None
        } else {
            Some(self.topos.join(TOPO_SEPARATOR))
        }
    }

    /// Appends a topology name unless it is already present.
    pub fn add_topo(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.topos.contains(&name) {
            self.topos.push(name);
        }
    }

    /// Replaces all topology names, dropping repeats.
    pub fn set_topos<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.topos.clear();
        for name in names {
            self.add_topo(name);
        }
    }

    /// Replaces every exact match of `old` with `new`, then removes duplicates
    /// keeping the first occurrence.
    pub fn replace_topo_name(&mut self, old: &str, new: &str) {
        let replaced = std::mem::take(&mut self.topos)
            .into_iter()
            .map(|t| if t == old { new.to_string() } else { t });
        self.set_topos(replaced);
    }

    /// Parses a topology name string.
    pub fn decode_topo_name(s: &str) -> Result<TopologyName> {
        TopologyName::decode(s)
    }

    /// Parses every topology name of this face.
    pub fn decoded_topos(&self) -> Result<Vec<TopologyName>> {
        self.topos.iter().map(|t| TopologyName::decode(t)).collect()
    }
}

impl Sketch {
    /// Oriented value geometry of a wire, in loop order.
    pub fn wire_segments(&self, key: WireKey) -> Result<Vec<Segment>> {
        let wire = self.wires.get(key).ok_or(Error::WireNotFound(key))?;
        wire.oriented_curves()
            .map(|(ck, fwd)| self.oriented_segment(ck, fwd).ok_or(Error::CurveNotFound(ck)))
            .collect()
    }

    /// Face loops exactly as stored, without orientation changes.
    pub fn face_loops(&self, key: FaceKey) -> Result<Polygon> {
        let face = self.faces.get(key).ok_or(Error::FaceNotFound(key))?;
        let outer = face.outer_loop.ok_or(Error::MissingOuterLoop(key))?;
        let holes = face
            .inner_loops
            .iter()
            .map(|&w| self.wire_segments(w))
            .collect::<Result<Vec<_>>>()?;
        Ok(Polygon::new(self.wire_segments(outer)?, holes))
    }

    /// Face as a polygon with the outer loop counterclockwise and holes clockwise.
    ///
    /// The stored wires are not modified, so repeated calls agree.
    pub fn to_math_polygon(&self, key: FaceKey) -> Result<Polygon> {
        Ok(self.face_loops(key)?.normalized())
    }

    /// Builder input for a face: normalized loops plus its topology id.
    pub fn to_builder_region(&self, key: FaceKey) -> Result<BuilderRegion> {
        let polygon = self.to_math_polygon(key)?;
        let topo_name = self.faces.get(key).and_then(Face2d::topo_name);
        Ok(BuilderRegion {
            outer: polygon.outer,
            holes: polygon.holes,
            topo_name,
        })
    }

    /// Face as a point profile, arcs flattened per [`Tolerance::arc_segments`](crate::Tolerance).
    pub fn to_polygon(&self, key: FaceKey) -> Result<Profile2D> {
        let polygon = self.to_math_polygon(key)?;
        Ok(Profile2D::from_polygon(&polygon, self.tolerance.arc_segments))
    }

    /// Enclosed area of a face (outer minus holes).
    pub fn face_area(&self, key: FaceKey) -> Result<f64> {
        Ok(self.face_loops(key)?.area())
    }

    /// Axis-aligned bounds of a face's outer loop as `(min, max)`.
    pub fn face_bounds(&self, key: FaceKey) -> Result<(Point2<f64>, Point2<f64>)> {
        let polygon = self.face_loops(key)?;
        let mut min = Point2::new(f64::INFINITY, f64::INFINITY);
        let mut max = Point2::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
        for segment in &polygon.outer {
            for p in segment.extreme_points(&self.tolerance) {
                min = min.inf(&p);
                max = max.sup(&p);
            }
        }
        if min.x > max.x {
            return Err(Error::DegenerateGeometry("face has no extent".to_string()));
        }
        Ok((min, max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::construction::make_rectangle;
    use crate::segment::loop_signed_area;
    use approx::assert_relative_eq;

    fn face_with_topos(topos: &[&str]) -> Face2d {
        let mut face = Face2d::default();
        face.set_topos(topos.iter().copied());
        face
    }

    #[test]
    fn topo_name_joins_with_colon() {
        assert_eq!(face_with_topos(&[]).topo_name(), None);
        assert_eq!(
            face_with_topos(&["1_a", "2_b"]).topo_name().as_deref(),
            Some("1_a:2_b")
        );
    }

    #[test]
    fn set_topos_dedups() {
        let face = face_with_topos(&["1_a", "2_b", "1_a"]);
        assert_eq!(face.topos(), &["1_a", "2_b"]);
    }

    #[test]
    fn replace_topo_name_dedups_in_first_occurrence_order() {
        let mut face = face_with_topos(&["1_a", "2_b", "3_c", "4_d"]);
        face.replace_topo_name("3_c", "1_a");
        assert_eq!(face.topos(), &["1_a", "2_b", "4_d"]);

        face.replace_topo_name("1_a", "4_d");
        assert_eq!(face.topos(), &["4_d", "2_b"]);
    }

    #[test]
    fn replace_missing_name_is_noop() {
        let mut face = face_with_topos(&["1_a", "2_b"]);
        face.replace_topo_name("9_z", "1_a");
        assert_eq!(face.topos(), &["1_a", "2_b"]);
    }

    #[test]
    fn decoded_topos_reports_bad_entry() {
        let face = face_with_topos(&["1_a", "junk"]);
        assert!(matches!(face.decoded_topos(), Err(Error::MalformedTopoName(_))));
    }

    #[test]
    fn math_polygon_normalizes_clockwise_outer() {
        let mut sketch = Sketch::new();
        let corners = [
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 4.0),
            Point2::new(4.0, 4.0),
            Point2::new(4.0, 0.0),
        ];
        let outer = sketch.add_polyline_loop(&corners).unwrap();
        let hole = sketch
            .add_polyline_loop(&[
                Point2::new(1.0, 1.0),
                Point2::new(2.0, 1.0),
                Point2::new(2.0, 2.0),
                Point2::new(1.0, 2.0),
            ])
            .unwrap();
        let face = sketch.add_face_with_loops(outer, &[hole]).unwrap();

        let raw = sketch.face_loops(face).unwrap();
        assert!(loop_signed_area(&raw.outer) < 0.0);

        let first = sketch.to_math_polygon(face).unwrap();
        assert!(loop_signed_area(&first.outer) > 0.0);
        assert!(loop_signed_area(&first.holes[0]) < 0.0);
        assert_eq!(sketch.to_math_polygon(face).unwrap(), first);

        assert_relative_eq!(sketch.face_area(face).unwrap(), 15.0, epsilon = 1e-9);
    }

    #[test]
    fn builder_region_carries_topo_name() {
        let mut sketch = Sketch::new();
        let (face, _, _) =
            make_rectangle(&mut sketch, Point2::new(0.0, 0.0), Point2::new(2.0, 1.0)).unwrap();
        sketch.face_mut(face).unwrap().set_topos(["3_floor", "4_wall"]);

        let region = sketch.to_builder_region(face).unwrap();
        assert_eq!(region.outer.len(), 4);
        assert_eq!(region.topo_name.as_deref(), Some("3_floor:4_wall"));

        let json = serde_json::to_value(&region).unwrap();
        assert_eq!(json["topoName"], "3_floor:4_wall");
    }

    #[test]
    fn face_without_outer_loop_is_an_error() {
        let mut sketch = Sketch::new();
        let face = sketch.add_face();
        assert!(matches!(
            sketch.to_math_polygon(face),
            Err(Error::MissingOuterLoop(_))
        ));
    }

    #[test]
    fn bounds_include_arc_bulge() {
        let mut sketch = Sketch::new();
        let a = sketch.add_point(-1.0, 0.0);
        let b = sketch.add_point(1.0, 0.0);
        let base = sketch.add_line(a, b).unwrap();
        let dome = sketch.add_arc(b, a, Point2::origin(), false).unwrap();
        let wire = sketch.add_wire(&[base, dome]).unwrap();
        let face = sketch.add_face_with_loops(wire, &[]).unwrap();

        let (min, max) = sketch.face_bounds(face).unwrap();
        assert_relative_eq!(min.y, 0.0, epsilon = 1e-12);
        assert_relative_eq!(max.y, 1.0, epsilon = 1e-12);

        let profile = sketch.to_polygon(face).unwrap();
        // One vertex for the line plus 16 for the half turn.
        assert_eq!(profile.outer.len(), 17);
    }
}
