//! Shared data models for TubeThumb.
//!
//! This crate provides Serde-serializable types for:
//! - YouTube video identifiers and URL extraction
//! - Thumbnail variants and the deterministic thumbnail set builder
//! - Lookup records persisted in history
//! - AI analysis results
//! - Output image formats
//! - Lookup status and the cosmetic progress state machine

pub mod analysis;
pub mod extract;
pub mod format;
pub mod progress;
pub mod record;
pub mod status;
pub mod thumbnail;
pub mod video;

// Re-export common types
pub use analysis::{AnalysisResult, InlineImage, ScoreBand};
pub use extract::{extract_video_id, extract_video_id_checked, ExtractError, ExtractResult};
pub use format::{ImageFormat, ParseFormatError};
pub use progress::{LookupPhase, ProgressTracker};
pub use record::VideoLookupRecord;
pub use status::AppState;
pub use thumbnail::{
    build_thumbnail_set, ParseVariantKeyError, ThumbnailSet, ThumbnailSetBuilder, ThumbnailVariant,
    VariantKey, DEFAULT_CDN_BASE,
};
pub use video::{InvalidVideoId, VideoId};
