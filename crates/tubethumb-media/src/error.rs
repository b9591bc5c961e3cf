//! Error types for media operations.

use thiserror::Error;
use tubethumb_models::ImageFormat;

/// Result type for media operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// Errors that can occur while fetching, converting or delivering images.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Image unavailable (HTTP {0})")]
    Unavailable(u16),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Unrecognised image encoding")]
    UnknownEncoding,

    #[error("Image decode failed: {0}")]
    Decode(String),

    #[error("Image encode failed: {0}")]
    Encode(String),

    #[error("Cannot encode to '{0}'")]
    UnsupportedTarget(ImageFormat),

    #[error("Delivery failed: {0}")]
    DeliveryFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MediaError {
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    pub fn delivery_failed(msg: impl Into<String>) -> Self {
        Self::DeliveryFailed(msg.into())
    }

    /// Whether the error means the CDN has no image at that URL.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, MediaError::Unavailable(_))
    }
}
