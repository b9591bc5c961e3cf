//! Fetch, convert and deliver a single thumbnail.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, warn};
use tubethumb_models::{ImageFormat, ThumbnailVariant, VariantKey};

use crate::convert::{convert_image, ConvertedImage};
use crate::delivery::DeliverySink;
use crate::error::{MediaError, MediaResult};
use crate::fetch::ImageFetcher;
use crate::metrics;

/// What happened to a download request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// Bytes were written by the sink
    Saved {
        path: PathBuf,
        format: ImageFormat,
        converted: bool,
    },
    /// Fetching, converting or saving failed, so the source URL was handed
    /// to the external opener instead
    OpenedExternally {
        url: String,
        reason: String,
        /// Whether the opener itself succeeded
        opened: bool,
    },
}

impl DeliveryOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, DeliveryOutcome::Saved { .. })
    }
}

/// Delivery file name: `thumbnail-{key}.{ext}`.
///
/// For `Original` the extension is taken from the source URL, falling back
/// to `jpg`.
pub fn thumbnail_filename(key: VariantKey, url: &str, format: ImageFormat) -> String {
    let ext = format.extension().unwrap_or_else(|| native_extension(url));
    format!("thumbnail-{}.{}", key, ext)
}

fn native_extension(url: &str) -> &'static str {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    match path.rsplit('.').next().map(str::to_ascii_lowercase).as_deref() {
        Some("webp") => "webp",
        Some("png") => "png",
        _ => "jpg",
    }
}

/// Downloads thumbnails, converting them on the way when asked.
#[derive(Clone)]
pub struct ImageFetchConverter {
    fetcher: ImageFetcher,
    sink: Arc<dyn DeliverySink>,
}

impl ImageFetchConverter {
    pub fn new(fetcher: ImageFetcher, sink: Arc<dyn DeliverySink>) -> Self {
        Self { fetcher, sink }
    }

    pub fn fetcher(&self) -> &ImageFetcher {
        &self.fetcher
    }

    /// Fetch `url` and produce bytes in `format`.
    pub async fn fetch_converted(&self, url: &str, format: ImageFormat) -> MediaResult<ConvertedImage> {
        let fetched = self.fetcher.fetch(url).await?;

        tokio::task::spawn_blocking(move || convert_image(fetched.bytes, format))
            .await
            .map_err(|e| MediaError::encode(format!("conversion task failed: {}", e)))?
    }

    /// Fetch, convert and save. Never fails: any error falls back to
    /// opening `url` externally.
    pub async fn fetch_and_deliver(&self, url: &str, filename: &str, format: ImageFormat) -> DeliveryOutcome {
        match self.try_deliver(url, filename, format).await {
            Ok(outcome) => outcome,
            Err(e) => self.fall_back(url, e).await,
        }
    }

    /// Deliver one variant of a thumbnail set.
    pub async fn deliver_variant(&self, variant: &ThumbnailVariant, format: ImageFormat) -> DeliveryOutcome {
        let filename = thumbnail_filename(variant.key, &variant.url, format);
        self.fetch_and_deliver(&variant.url, &filename, format).await
    }

    async fn try_deliver(&self, url: &str, filename: &str, format: ImageFormat) -> MediaResult<DeliveryOutcome> {
        let image = self.fetch_converted(url, format).await?;
        let path = self.sink.save(filename, &image.bytes).await?;

        info!(
            url = %url,
            path = %path.display(),
            format = %image.format,
            converted = image.converted,
            "Thumbnail delivered"
        );

        Ok(DeliveryOutcome::Saved {
            path,
            format: image.format,
            converted: image.converted,
        })
    }

    async fn fall_back(&self, url: &str, error: MediaError) -> DeliveryOutcome {
        warn!(url = %url, error = %error, "Download failed, opening source instead");
        metrics::record_fallback();

        let opened = match self.sink.open_external(url).await {
            Ok(()) => true,
            Err(e) => {
                warn!(url = %url, error = %e, "Could not open source externally");
                false
            }
        };

        DeliveryOutcome::OpenedExternally {
            url: url.to_string(),
            reason: error.to_string(),
            opened,
        }
    }
}
