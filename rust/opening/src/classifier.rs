// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! A/B side classification of an opening's split faces.
//!
//! The host wall's faces are sorted into an A side (left faces bounding a
//! room) and a B side (everything else). An opening face is A when its raw
//! path overlaps an A wall face; across a split seam the brother of an A face
//! is B.

use plan_lite_sketch::{paths_overlap, Polygon, Tolerance};
use rustc_hash::FxHashSet;

use crate::model::{FaceId, OpeningFace, ParametricOpening, WallFace};

/// Host wall faces split by side.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AbWallFaces<'a> {
    pub a: Vec<&'a WallFace>,
    pub b: Vec<&'a WallFace>,
}

/// Classified split faces of an opening.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SplitAbFaces<'a> {
    pub a_faces: Vec<&'a OpeningFace>,
    pub b_faces: Vec<&'a OpeningFace>,
    pub a_wall_faces: Vec<&'a WallFace>,
    pub b_wall_faces: Vec<&'a WallFace>,
    /// Seam pairs where neither face touches the A side.
    pub unclassified: Vec<(&'a OpeningFace, &'a OpeningFace)>,
}

/// Stateless classifier over one opening and its host wall.
#[derive(Debug, Clone, Copy)]
pub struct OpeningFaceClassifier<'a> {
    opening: &'a ParametricOpening,
    tolerance: Tolerance,
}

impl<'a> OpeningFaceClassifier<'a> {
    pub fn new(opening: &'a ParametricOpening, tolerance: Tolerance) -> Self {
        Self { opening, tolerance }
    }

    /// Left faces with room information are A; all other faces are B.
    pub fn ab_wall_faces(&self) -> AbWallFaces<'a> {
        let host = &self.opening.host;
        let mut faces = AbWallFaces::default();
        for face in host.left_faces.values() {
            if face.has_room_info() {
                faces.a.push(face);
            } else {
                faces.b.push(face);
            }
        }
        faces.b.extend(host.right_faces.values());
        faces
    }

    /// One `(face, brother)` pair per split seam, in split order.
    ///
    /// Split faces without a brother are skipped.
    pub fn unordered_ab_face_pairs(&self) -> Vec<(&'a OpeningFace, &'a OpeningFace)> {
        let opening = self.opening;
        let mut visited: FxHashSet<FaceId> = FxHashSet::default();
        let mut pairs = Vec::new();

        for &id in opening.split_face_list() {
            if !visited.insert(id) {
                continue;
            }
            let (Some(face), Some(brother)) = (opening.face(id), opening.brother_face(id)) else {
                tracing::warn!(opening = opening.id, face = id, "Split face has no brother");
                continue;
            };
            visited.insert(brother.id);
            pairs.push((face, brother));
        }
        pairs
    }

    /// Returns `true` if any outer curves of the two paths overlap.
    pub fn is_overlap(&self, path_a: &Polygon, path_b: &Polygon) -> bool {
        paths_overlap(&path_a.outer, &path_b.outer, &self.tolerance)
    }

    fn touches_any(&self, face: &OpeningFace, wall_faces: &[&WallFace]) -> bool {
        wall_faces
            .iter()
            .any(|wf| self.is_overlap(&face.raw_path, &wf.path))
    }

    /// Opening faces whose raw path overlaps an A wall face.
    pub fn a_faces(&self) -> Vec<&'a OpeningFace> {
        let a_wall = self.ab_wall_faces().a;
        self.opening
            .face_list()
            .iter()
            .filter(|f| self.touches_any(f, &a_wall))
            .collect()
    }

    /// Splits every seam pair into its A and B face.
    ///
    /// The face overlapping an A wall face is A and its brother is B. Pairs
    /// where neither side matches end up in
    /// [`SplitAbFaces::unclassified`].
    pub fn split_ab_face_pairs(&self) -> SplitAbFaces<'a> {
        let AbWallFaces { a, b } = self.ab_wall_faces();
        let mut result = SplitAbFaces::default();

        for (face, brother) in self.unordered_ab_face_pairs() {
            if self.touches_any(face, &a) {
                result.a_faces.push(face);
                result.b_faces.push(brother);
            } else if self.touches_any(brother, &a) {
                result.a_faces.push(brother);
                result.b_faces.push(face);
            } else {
                tracing::warn!(
                    opening = self.opening.id,
                    face = face.id,
                    brother = brother.id,
                    "Seam pair does not touch the A side"
                );
                result.unclassified.push((face, brother));
            }
        }

        result.a_wall_faces = a;
        result.b_wall_faces = b;
        tracing::debug!(
            opening = self.opening.id,
            a = result.a_faces.len(),
            b = result.b_faces.len(),
            unclassified = result.unclassified.len(),
            "Classified opening faces"
        );
        result
    }
}
