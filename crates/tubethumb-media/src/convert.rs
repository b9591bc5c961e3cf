//! Source format detection and re-encoding.
//!
//! Conversions always use the highest quality each codec offers: PNG,
//! lossless WebP and JPEG at quality 100. JPEG has no alpha channel, so
//! transparent sources are flattened to RGB first.

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::{ColorType, DynamicImage, ImageEncoder};
use tracing::debug;
use tubethumb_models::ImageFormat;

use crate::error::{MediaError, MediaResult};
use crate::metrics;

/// JPEG quality used for conversions.
const JPEG_QUALITY: u8 = 100;

/// Bytes ready for delivery.
#[derive(Debug, Clone)]
pub struct ConvertedImage {
    pub bytes: Vec<u8>,
    /// Concrete encoding of `bytes` (never `Original`)
    pub format: ImageFormat,
    /// Whether the bytes were re-encoded
    pub converted: bool,
}

/// Detect the encoding from the leading magic bytes.
///
/// Returns `None` for anything other than PNG, WebP or JPEG.
pub fn detect_format(bytes: &[u8]) -> Option<ImageFormat> {
    match image::guess_format(bytes).ok()? {
        image::ImageFormat::Png => Some(ImageFormat::Png),
        image::ImageFormat::WebP => Some(ImageFormat::Webp),
        image::ImageFormat::Jpeg => Some(ImageFormat::Jpg),
        _ => None,
    }
}

/// Turn fetched bytes into the requested format.
///
/// `Original`, or a target matching the source encoding, passes the bytes
/// through untouched. Anything else is decoded and re-encoded.
pub fn convert_image(bytes: Vec<u8>, target: ImageFormat) -> MediaResult<ConvertedImage> {
    let source = detect_format(&bytes).ok_or(MediaError::UnknownEncoding)?;

    if !target.needs_conversion_from(source) {
        return Ok(ConvertedImage {
            bytes,
            format: source,
            converted: false,
        });
    }

    let decoded = image::load_from_memory(&bytes).map_err(|e| MediaError::decode(e.to_string()))?;
    let encoded = encode(&decoded, target)?;

    debug!(
        source = %source,
        target = %target,
        input_size = bytes.len(),
        output_size = encoded.len(),
        "Converted image"
    );
    metrics::record_conversion(target.as_str());

    Ok(ConvertedImage {
        bytes: encoded,
        format: target,
        converted: true,
    })
}

fn encode(image: &DynamicImage, target: ImageFormat) -> MediaResult<Vec<u8>> {
    let (width, height) = (image.width(), image.height());
    let mut out = Vec::new();

    match target {
        ImageFormat::Png => {
            let rgba = image.to_rgba8();
            PngEncoder::new(&mut out)
                .write_image(rgba.as_raw(), width, height, ColorType::Rgba8)
                .map_err(|e| MediaError::encode(e.to_string()))?;
        }
        ImageFormat::Webp => {
            let rgba = image.to_rgba8();
            WebPEncoder::new_lossless(&mut out)
                .encode(rgba.as_raw(), width, height, ColorType::Rgba8)
                .map_err(|e| MediaError::encode(e.to_string()))?;
        }
        ImageFormat::Jpg => {
            let rgb = image.to_rgb8();
            let mut encoder = JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY);
            encoder
                .encode(rgb.as_raw(), width, height, ColorType::Rgb8)
                .map_err(|e| MediaError::encode(e.to_string()))?;
        }
        ImageFormat::Original => return Err(MediaError::UnsupportedTarget(target)),
    }

    Ok(out)
}
