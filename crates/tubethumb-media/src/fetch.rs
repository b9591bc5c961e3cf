//! HTTP image fetching.

use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::Client;
use tracing::{debug, warn};
use tubethumb_models::InlineImage;

use crate::error::{MediaError, MediaResult};
use crate::metrics;

/// MIME type assumed when the CDN does not send one.
const FALLBACK_MIME: &str = "image/jpeg";

/// Configuration for the image fetcher.
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// Request timeout
    pub timeout: Duration,
    /// User agent sent with every request
    pub user_agent: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: format!("tubethumb/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl FetcherConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            timeout: std::env::var("TUBETHUMB_FETCH_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            user_agent: defaults.user_agent,
        }
    }
}

/// Raw image bytes as served by the CDN.
#[derive(Debug, Clone)]
pub struct FetchedImage {
    pub bytes: Vec<u8>,
    /// Content-Type header, if the server sent one
    pub content_type: Option<String>,
}

/// Whether a thumbnail variant actually exists on the CDN.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantAvailability {
    Available,
    /// Server answered with a non-success status
    Unavailable(u16),
    /// Request did not complete
    Unreachable,
}

impl VariantAvailability {
    pub fn is_available(&self) -> bool {
        matches!(self, VariantAvailability::Available)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VariantAvailability::Available => "available",
            VariantAvailability::Unavailable(_) => "not available",
            VariantAvailability::Unreachable => "unreachable",
        }
    }
}

/// Fetches thumbnail images over HTTP. One attempt per call, no caching.
#[derive(Debug, Clone)]
pub struct ImageFetcher {
    http: Client,
}

impl ImageFetcher {
    pub fn new(config: FetcherConfig) -> MediaResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent)
            .build()
            .map_err(MediaError::Network)?;

        Ok(Self { http })
    }

    /// Download the image at `url`. Non-2xx statuses are `Unavailable`.
    pub async fn fetch(&self, url: &str) -> MediaResult<FetchedImage> {
        debug!(url = %url, "Fetching image");

        let response = match self.http.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                metrics::record_fetch("error");
                return Err(MediaError::Network(e));
            }
        };

        let status = response.status();
        if !status.is_success() {
            metrics::record_fetch("unavailable");
            warn!(url = %url, status = status.as_u16(), "Image unavailable");
            return Err(MediaError::Unavailable(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let bytes = response.bytes().await.inspect_err(|_| metrics::record_fetch("error"))?;
        metrics::record_fetch("ok");

        debug!(url = %url, size = bytes.len(), "Fetched image");
        Ok(FetchedImage {
            bytes: bytes.to_vec(),
            content_type,
        })
    }

    /// Check whether a variant exists without downloading it.
    ///
    /// Never fails: transport errors map to `Unreachable`.
    pub async fn probe(&self, url: &str) -> VariantAvailability {
        match self.http.head(url).send().await {
            Ok(response) if response.status().is_success() => VariantAvailability::Available,
            Ok(response) => VariantAvailability::Unavailable(response.status().as_u16()),
            Err(e) => {
                debug!(url = %url, error = %e, "Probe failed");
                VariantAvailability::Unreachable
            }
        }
    }

    /// Fetch an image and base64-encode it for an AI request.
    pub async fn fetch_inline(&self, url: &str) -> MediaResult<InlineImage> {
        let image = self.fetch(url).await?;
        let mime_type = image
            .content_type
            .as_deref()
            .map(|ct| ct.split(';').next().unwrap_or_default().trim())
            .filter(|ct| ct.starts_with("image/"))
            .unwrap_or(FALLBACK_MIME)
            .to_string();

        Ok(InlineImage {
            mime_type,
            data: BASE64.encode(&image.bytes),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FetcherConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.user_agent.starts_with("tubethumb/"));
    }

    #[test]
    fn test_availability_labels() {
        assert!(VariantAvailability::Available.is_available());
        assert!(!VariantAvailability::Unavailable(404).is_available());
        assert_eq!(VariantAvailability::Unavailable(404).as_str(), "not available");
    }
}
