//! Lookup records kept in history.

use chrono::{DateTime, SubsecRound, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::thumbnail::ThumbnailSet;
use crate::video::VideoId;

/// Result of one successful URL-to-thumbnail-set resolution.
///
/// Serialized in camelCase with an epoch-millisecond timestamp, the layout
/// history files have always used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct VideoLookupRecord {
    /// Extracted video identifier
    pub id: VideoId,

    /// URL exactly as the user entered it
    pub original_url: String,

    /// Thumbnail variants, best first
    pub thumbnails: ThumbnailSet,

    /// When the lookup completed
    #[serde(with = "chrono::serde::ts_milliseconds")]
    #[schemars(with = "i64")]
    pub timestamp: DateTime<Utc>,
}

impl VideoLookupRecord {
    /// Create a record stamped with the current time.
    pub fn new(id: VideoId, original_url: impl Into<String>, thumbnails: ThumbnailSet) -> Self {
        Self::with_timestamp(id, original_url, thumbnails, Utc::now())
    }

    /// Create a record with an explicit timestamp.
    ///
    /// The timestamp is truncated to whole milliseconds, the precision it is
    /// stored with, so a record equals itself after a save and reload.
    pub fn with_timestamp(
        id: VideoId,
        original_url: impl Into<String>,
        thumbnails: ThumbnailSet,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            original_url: original_url.into(),
            thumbnails,
            timestamp: timestamp.trunc_subsecs(3),
        }
    }
}
