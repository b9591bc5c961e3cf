//! Thumbnail fetching, format conversion and delivery.
//!
//! This crate provides:
//! - HTTP image fetching with per-variant availability probing
//! - Source format detection and re-encoding (PNG, WebP, JPEG)
//! - Delivery sinks (output directory, in-memory)
//! - The fetch-convert-deliver pipeline with its open-externally fallback

pub mod convert;
pub mod delivery;
pub mod error;
pub mod fetch;
pub mod metrics;
pub mod pipeline;

pub use convert::{convert_image, detect_format, ConvertedImage};
pub use delivery::{DeliverySink, DirectorySink, MemorySink};
pub use error::{MediaError, MediaResult};
pub use fetch::{FetchedImage, FetcherConfig, ImageFetcher, VariantAvailability};
pub use pipeline::{thumbnail_filename, DeliveryOutcome, ImageFetchConverter};
