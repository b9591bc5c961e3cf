//! YouTube video identifier.

use schemars::gen::SchemaGenerator;
use schemars::schema::Schema;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Length of every YouTube video identifier, in characters.
pub const VIDEO_ID_LEN: usize = 11;

/// Characters that terminate an identifier inside a URL.
const ID_TERMINATORS: [char; 3] = ['#', '&', '?'];

/// The 11-character token YouTube uses to address a video.
///
/// Only produced by URL extraction or by validated deserialization, so a
/// `VideoId` in hand always has the right length.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VideoId(String);

/// Error returned when a string is not a usable video identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid video id {value:?}: expected 11 characters without '#', '&' or '?'")]
pub struct InvalidVideoId {
    pub value: String,
}

impl VideoId {
    /// Validate and wrap an identifier.
    pub fn parse(s: impl Into<String>) -> Result<Self, InvalidVideoId> {
        let value = s.into();
        let well_formed = value.chars().count() == VIDEO_ID_LEN
            && !value.contains(ID_TERMINATORS.as_slice());

        if well_formed {
            Ok(Self(value))
        } else {
            Err(InvalidVideoId { value })
        }
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Canonical watch URL for this video.
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.0)
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for VideoId {
    type Error = InvalidVideoId;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl From<VideoId> for String {
    fn from(id: VideoId) -> Self {
        id.0
    }
}

impl AsRef<str> for VideoId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl JsonSchema for VideoId {
    fn schema_name() -> String {
        "VideoId".to_string()
    }

    fn json_schema(gen: &mut SchemaGenerator) -> Schema {
        String::json_schema(gen)
    }
}
