//! Thumbnail variants and the deterministic thumbnail set builder.
//!
//! Thumbnail URLs are guessed from YouTube's CDN path conventions. Nothing
//! here touches the network: a variant may point at an image that does not
//! exist (most often `maxresdefault`, which YouTube only renders for some
//! uploads). Availability is discovered when the image is fetched.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::video::VideoId;

/// Default thumbnail CDN host.
pub const DEFAULT_CDN_BASE: &str = "https://img.youtube.com";

/// Stable key identifying a variant's position in a thumbnail set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum VariantKey {
    /// 1280x720, only present for some uploads
    MaxRes,
    /// 640x480
    Sd,
    /// 480x360
    Hq,
    /// 320x180
    Mq,
    /// 640x480 served as WebP
    Webp,
}

impl VariantKey {
    /// All keys in set order. Position 0 is the best variant.
    pub const ALL: [VariantKey; 5] = [
        VariantKey::MaxRes,
        VariantKey::Sd,
        VariantKey::Hq,
        VariantKey::Mq,
        VariantKey::Webp,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VariantKey::MaxRes => "maxres",
            VariantKey::Sd => "sd",
            VariantKey::Hq => "hq",
            VariantKey::Mq => "mq",
            VariantKey::Webp => "webp",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            VariantKey::MaxRes => "Maximum Resolution (HD/4K)",
            VariantKey::Sd => "Standard Quality",
            VariantKey::Hq => "High Quality",
            VariantKey::Mq => "Medium Quality",
            VariantKey::Webp => "WebP Format",
        }
    }

    /// Nominal resolution of the rendition.
    pub fn resolution(&self) -> &'static str {
        match self {
            VariantKey::MaxRes => "1280 x 720",
            VariantKey::Sd => "640 x 480",
            VariantKey::Hq => "480 x 360",
            VariantKey::Mq => "320 x 180",
            VariantKey::Webp => "640 x 480 (WebP)",
        }
    }

    /// CDN path below the host, e.g. `vi/{id}/hqdefault.jpg`.
    fn cdn_path(&self, id: &VideoId) -> String {
        match self {
            VariantKey::MaxRes => format!("vi/{id}/maxresdefault.jpg"),
            VariantKey::Sd => format!("vi/{id}/sddefault.jpg"),
            VariantKey::Hq => format!("vi/{id}/hqdefault.jpg"),
            VariantKey::Mq => format!("vi/{id}/mqdefault.jpg"),
            VariantKey::Webp => format!("vi_webp/{id}/sddefault.webp"),
        }
    }
}

impl fmt::Display for VariantKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned for an unknown variant key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown thumbnail variant '{0}' (expected one of: maxres, sd, hq, mq, webp)")]
pub struct ParseVariantKeyError(pub String);

impl FromStr for VariantKey {
    type Err = ParseVariantKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        VariantKey::ALL
            .into_iter()
            .find(|key| key.as_str() == wanted)
            .ok_or_else(|| ParseVariantKeyError(s.to_string()))
    }
}

/// One resolution/format rendition of a video's thumbnail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ThumbnailVariant {
    /// Display label
    pub label: String,
    /// Nominal resolution, e.g. "1280 x 720"
    pub resolution: String,
    /// Source image URL on the CDN
    pub url: String,
    /// Stable key, unique within a set
    pub key: VariantKey,
    /// Set only on the maximum-resolution variant
    #[serde(default)]
    pub is_best: bool,
}

/// Ordered, fixed-length list of thumbnail variants for one video.
///
/// Consumers rely on positions: 0 is the best variant and 4 is the preview
/// used for history entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct ThumbnailSet(Vec<ThumbnailVariant>);

impl ThumbnailSet {
    /// Number of variants in a well-formed set.
    pub const LEN: usize = 5;

    /// Position of the variant shown next to history entries.
    pub const HISTORY_PREVIEW_INDEX: usize = 4;

    /// The maximum-resolution variant.
    pub fn best(&self) -> Option<&ThumbnailVariant> {
        self.0.first()
    }

    /// Small variant used to represent a history entry.
    pub fn history_preview(&self) -> Option<&ThumbnailVariant> {
        self.0.get(Self::HISTORY_PREVIEW_INDEX)
    }

    pub fn by_key(&self, key: VariantKey) -> Option<&ThumbnailVariant> {
        self.0.iter().find(|v| v.key == key)
    }

    pub fn get(&self, index: usize) -> Option<&ThumbnailVariant> {
        self.0.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ThumbnailVariant> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check the set invariants: canonical key order, and only position 0
    /// flagged as best.
    pub fn is_well_formed(&self) -> bool {
        self.0.len() == Self::LEN
            && self
                .0
                .iter()
                .zip(VariantKey::ALL)
                .enumerate()
                .all(|(i, (variant, key))| variant.key == key && variant.is_best == (i == 0))
    }
}

impl<'a> IntoIterator for &'a ThumbnailSet {
    type Item = &'a ThumbnailVariant;
    type IntoIter = std::slice::Iter<'a, ThumbnailVariant>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Builds thumbnail sets against a CDN base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbnailSetBuilder {
    cdn_base: String,
}

impl Default for ThumbnailSetBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_CDN_BASE)
    }
}

impl ThumbnailSetBuilder {
    /// Create a builder for the given CDN base (trailing slashes ignored).
    pub fn new(cdn_base: impl Into<String>) -> Self {
        let cdn_base = cdn_base.into().trim_end_matches('/').to_string();
        Self { cdn_base }
    }

    pub fn cdn_base(&self) -> &str {
        &self.cdn_base
    }

    /// URL of a single variant.
    pub fn variant_url(&self, id: &VideoId, key: VariantKey) -> String {
        format!("{}/{}", self.cdn_base, key.cdn_path(id))
    }

    /// Build the full set. Pure: the same id always yields the same set.
    pub fn build(&self, id: &VideoId) -> ThumbnailSet {
        let variants = VariantKey::ALL
            .into_iter()
            .map(|key| ThumbnailVariant {
                label: key.label().to_string(),
                resolution: key.resolution().to_string(),
                url: self.variant_url(id, key),
                key,
                is_best: key == VariantKey::MaxRes,
            })
            .collect();

        ThumbnailSet(variants)
    }
}

/// Build the thumbnail set against the default YouTube CDN.
pub fn build_thumbnail_set(id: &VideoId) -> ThumbnailSet {
    ThumbnailSetBuilder::default().build(id)
}
