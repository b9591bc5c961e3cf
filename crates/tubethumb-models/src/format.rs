//! Output image formats for thumbnail downloads.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Format requested for a downloaded thumbnail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// Keep whatever the CDN served
    #[default]
    Original,
    Png,
    Webp,
    Jpg,
}

impl ImageFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageFormat::Original => "original",
            ImageFormat::Png => "png",
            ImageFormat::Webp => "webp",
            ImageFormat::Jpg => "jpg",
        }
    }

    /// File extension, or `None` for `Original` (depends on the source).
    pub fn extension(&self) -> Option<&'static str> {
        match self {
            ImageFormat::Original => None,
            ImageFormat::Png => Some("png"),
            ImageFormat::Webp => Some("webp"),
            ImageFormat::Jpg => Some("jpg"),
        }
    }

    /// MIME type, or `None` for `Original`.
    pub fn mime_type(&self) -> Option<&'static str> {
        match self {
            ImageFormat::Original => None,
            ImageFormat::Png => Some("image/png"),
            ImageFormat::Webp => Some("image/webp"),
            ImageFormat::Jpg => Some("image/jpeg"),
        }
    }

    /// Concrete format for a MIME type (parameters ignored).
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        match essence.to_ascii_lowercase().as_str() {
            "image/png" => Some(ImageFormat::Png),
            "image/webp" => Some(ImageFormat::Webp),
            "image/jpeg" | "image/jpg" => Some(ImageFormat::Jpg),
            _ => None,
        }
    }

    /// Whether re-encoding is needed to turn `source` into `self`.
    pub fn needs_conversion_from(&self, source: ImageFormat) -> bool {
        !matches!(self, ImageFormat::Original) && *self != source
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned for an unknown format name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown image format '{0}' (expected one of: original, png, webp, jpg)")]
pub struct ParseFormatError(pub String);

impl FromStr for ImageFormat {
    type Err = ParseFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "original" => Ok(ImageFormat::Original),
            "png" => Ok(ImageFormat::Png),
            "webp" => Ok(ImageFormat::Webp),
            "jpg" | "jpeg" => Ok(ImageFormat::Jpg),
            _ => Err(ParseFormatError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!("PNG".parse::<ImageFormat>().unwrap(), ImageFormat::Png);
        assert_eq!("jpeg".parse::<ImageFormat>().unwrap(), ImageFormat::Jpg);
        assert_eq!("original".parse::<ImageFormat>().unwrap(), ImageFormat::Original);
        assert!("gif".parse::<ImageFormat>().is_err());
    }

    #[test]
    fn test_from_mime() {
        assert_eq!(ImageFormat::from_mime("image/jpeg"), Some(ImageFormat::Jpg));
        assert_eq!(ImageFormat::from_mime("image/webp; q=1"), Some(ImageFormat::Webp));
        assert_eq!(ImageFormat::from_mime("text/html"), None);
    }

    #[test]
    fn test_needs_conversion() {
        assert!(!ImageFormat::Original.needs_conversion_from(ImageFormat::Jpg));
        assert!(!ImageFormat::Jpg.needs_conversion_from(ImageFormat::Jpg));
        assert!(ImageFormat::Png.needs_conversion_from(ImageFormat::Jpg));
        assert!(ImageFormat::Jpg.needs_conversion_from(ImageFormat::Webp));
    }

    #[test]
    fn test_extension_and_mime() {
        assert_eq!(ImageFormat::Original.extension(), None);
        assert_eq!(ImageFormat::Jpg.extension(), Some("jpg"));
        assert_eq!(ImageFormat::Jpg.mime_type(), Some("image/jpeg"));
    }
}
