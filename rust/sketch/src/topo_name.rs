// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Topology names correlating sketch faces with the downstream 3D builder.
//!
//! Internally a name is the structured pair `{ face_id, name }`. The string
//! form `"{faceId}_{name}"` (or the literal `"background"`) only exists at the
//! serialization boundary, so names containing `_` stay unambiguous.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

/// Encoded form of the background face.
pub const BACKGROUND_TOPO_NAME: &str = "background";

/// Face id used by the background face.
pub const BACKGROUND_FACE_ID: i64 = -1;

/// Name part that decodes to "no name".
const NULL_NAME: &str = "null";

/// Structured topology name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TopologyName {
    pub face_id: i64,
    pub name: Option<String>,
}

impl TopologyName {
    pub fn new(face_id: i64, name: impl Into<String>) -> Self {
        Self {
            face_id,
            name: Some(name.into()),
        }
    }

    /// The name of the background face.
    pub fn background() -> Self {
        Self {
            face_id: BACKGROUND_FACE_ID,
            name: None,
        }
    }

    pub fn is_background(&self) -> bool {
        self.face_id == BACKGROUND_FACE_ID && self.name.is_none()
    }

    /// Parses `"{faceId}_{name}"` or `"background"`.
    ///
    /// The face id may carry an alphabetic prefix (`"R1_kitchen"` has face
    /// id 1) and may be negative (`"-5_x"`). Everything after the first `_` is the name; `"null"` means no
    /// name. Any other shape is an error.
    pub fn decode(s: &str) -> Result<Self> {
        if s == BACKGROUND_TOPO_NAME {
            return Ok(Self::background());
        }

        let malformed = || Error::MalformedTopoName(s.to_string());
        let (id_part, name_part) = s.split_once('_').ok_or_else(malformed)?;

        let signed = id_part.trim_start_matches(|c: char| c.is_ascii_alphabetic());
        let digits = signed.strip_prefix('-').unwrap_or(signed);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        let face_id: i64 = signed.parse().map_err(|_| malformed())?;

        if name_part.is_empty() {
            return Err(malformed());
        }
        let name = (name_part != NULL_NAME).then(|| name_part.to_string());

        Ok(Self { face_id, name })
    }

    /// Encodes back to the string form.
    pub fn encode(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TopologyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_background() {
            return f.write_str(BACKGROUND_TOPO_NAME);
        }
        write!(
            f,
            "{}_{}",
            self.face_id,
            self.name.as_deref().unwrap_or(NULL_NAME)
        )
    }
}

impl FromStr for TopologyName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::decode(s)
    }
}

impl Serialize for TopologyName {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TopologyName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::decode(&s).map_err(serde::de::Error::custom)
    }
}
