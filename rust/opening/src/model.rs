// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host wall and parametric opening model.
//!
//! Faces are identified by [`FaceId`]. Maps are ordered so every traversal
//! (and therefore every classification result) is stable across calls.

use std::collections::BTreeMap;

use plan_lite_sketch::{Polygon, Sketch};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Identifier of a wall or opening face.
pub type FaceId = u32;

/// One face of a wall, with the rooms it bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WallFace {
    pub id: FaceId,
    pub path: Polygon,
    /// Ids or names of the rooms this face bounds; empty on exterior faces.
    #[serde(default)]
    pub room_info: Vec<String>,
}

impl WallFace {
    pub fn new(id: FaceId, path: Polygon) -> Self {
        Self {
            id,
            path,
            room_info: Vec::new(),
        }
    }

    pub fn with_room(mut self, room: impl Into<String>) -> Self {
        self.room_info.push(room.into());
        self
    }

    pub fn has_room_info(&self) -> bool {
        !self.room_info.is_empty()
    }
}

/// A wall with faces on its left and right sides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wall {
    pub id: u32,
    pub left_faces: BTreeMap<FaceId, WallFace>,
    pub right_faces: BTreeMap<FaceId, WallFace>,
}

impl Wall {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    pub fn add_left_face(&mut self, face: WallFace) -> Result<()> {
        self.check_new(face.id)?;
        self.left_faces.insert(face.id, face);
        Ok(())
    }

    pub fn add_right_face(&mut self, face: WallFace) -> Result<()> {
        self.check_new(face.id)?;
        self.right_faces.insert(face.id, face);
        Ok(())
    }

    fn check_new(&self, id: FaceId) -> Result<()> {
        if self.left_faces.contains_key(&id) || self.right_faces.contains_key(&id) {
            return Err(Error::DuplicateFace(id));
        }
        Ok(())
    }
}

/// A face of an opening before it is trimmed against the wall.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpeningFace {
    pub id: FaceId,
    pub raw_path: Polygon,
}

impl OpeningFace {
    pub fn new(id: FaceId, raw_path: Polygon) -> Self {
        Self { id, raw_path }
    }

    /// Builds an opening face from a sketch face (orientation-normalized).
    pub fn from_sketch_face(id: FaceId, sketch: &Sketch, face: plan_lite_sketch::FaceKey) -> Result<Self> {
        Ok(Self::new(id, sketch.to_math_polygon(face)?))
    }
}

/// An opening (door, window, hole) cut through its host wall.
///
/// Faces on either side of a split seam are "brothers". The relation is
/// symmetric and each face has at most one brother.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParametricOpening {
    pub id: u32,
    pub host: Wall,
    face_list: Vec<OpeningFace>,
    split_face_list: Vec<FaceId>,
    brothers: BTreeMap<FaceId, FaceId>,
}

impl ParametricOpening {
    pub fn new(id: u32, host: Wall) -> Self {
        Self {
            id,
            host,
            face_list: Vec::new(),
            split_face_list: Vec::new(),
            brothers: BTreeMap::new(),
        }
    }

    pub fn add_face(&mut self, face: OpeningFace) -> Result<()> {
        if self.face(face.id).is_some() {
            return Err(Error::DuplicateFace(face.id));
        }
        self.face_list.push(face);
        Ok(())
    }

    /// Records `a` and `b` as the two sides of one split seam.
    pub fn add_split_pair(&mut self, a: FaceId, b: FaceId) -> Result<()> {
        if a == b {
            return Err(Error::SelfBrother(a));
        }
        for id in [a, b] {
            if self.face(id).is_none() {
                return Err(Error::FaceNotFound(id));
            }
        }
        for (face, other) in [(a, b), (b, a)] {
            if let Some(&brother) = self.brothers.get(&face) {
                if brother != other {
                    return Err(Error::AlreadyPaired { face, brother });
                }
            }
        }

        for id in [a, b] {
            if !self.split_face_list.contains(&id) {
                self.split_face_list.push(id);
            }
        }
        self.brothers.insert(a, b);
        self.brothers.insert(b, a);
        Ok(())
    }

    pub fn face_list(&self) -> &[OpeningFace] {
        &self.face_list
    }

    /// Ids of split faces, in split order.
    pub fn split_face_list(&self) -> &[FaceId] {
        &self.split_face_list
    }

    pub fn face(&self, id: FaceId) -> Option<&OpeningFace> {
        self.face_list.iter().find(|f| f.id == id)
    }

    /// The face on the other side of `id`'s split seam.
    pub fn brother_face(&self, id: FaceId) -> Option<&OpeningFace> {
        self.brothers.get(&id).and_then(|&b| self.face(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opening_with_faces(ids: &[FaceId]) -> ParametricOpening {
        let mut opening = ParametricOpening::new(1, Wall::new(7));
        for &id in ids {
            opening.add_face(OpeningFace::new(id, Polygon::default())).unwrap();
        }
        opening
    }

    #[test]
    fn brothers_are_symmetric() {
        let mut opening = opening_with_faces(&[1, 2, 3]);
        opening.add_split_pair(1, 2).unwrap();

        assert_eq!(opening.brother_face(1).map(|f| f.id), Some(2));
        assert_eq!(opening.brother_face(2).map(|f| f.id), Some(1));
        assert!(opening.brother_face(3).is_none());
        assert_eq!(opening.split_face_list(), &[1, 2]);

        // Re-adding the same pair is a no-op.
        opening.add_split_pair(2, 1).unwrap();
        assert_eq!(opening.split_face_list(), &[1, 2]);
    }

    #[test]
    fn pairing_is_validated() {
        let mut opening = opening_with_faces(&[1, 2, 3]);
        assert!(matches!(opening.add_split_pair(1, 1), Err(Error::SelfBrother(1))));
        assert!(matches!(opening.add_split_pair(1, 9), Err(Error::FaceNotFound(9))));
        opening.add_split_pair(1, 2).unwrap();
        assert!(matches!(
            opening.add_split_pair(1, 3),
            Err(Error::AlreadyPaired { face: 1, brother: 2 })
        ));
        assert!(matches!(
            opening.add_face(OpeningFace::new(2, Polygon::default())),
            Err(Error::DuplicateFace(2))
        ));
    }

    #[test]
    fn wall_face_ids_are_unique_across_sides() {
        let mut wall = Wall::new(1);
        wall.add_left_face(WallFace::new(10, Polygon::default()).with_room("kitchen"))
            .unwrap();
        assert!(matches!(
            wall.add_right_face(WallFace::new(10, Polygon::default())),
            Err(Error::DuplicateFace(10))
        ));
        assert!(wall.left_faces[&10].has_room_info());
    }
}
