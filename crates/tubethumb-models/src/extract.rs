//! YouTube video ID extraction from free-form URLs.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::video::{VideoId, VIDEO_ID_LEN};

/// Errors that can occur during video ID extraction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    /// None of the recognised URL markers appear in the input
    #[error("URL does not contain a recognised YouTube video marker")]
    NoMarker,

    /// A marker was found but the token after it is not 11 characters
    #[error("Video ID has invalid length {0} (expected 11)")]
    InvalidLength(usize),
}

/// Result type for video ID extraction.
pub type ExtractResult<T> = Result<T, ExtractError>;

/// Single pattern covering every supported URL shape.
///
/// The greedy prefix makes the last marker win. After the marker an optional
/// `?`, `v` and `=` are skipped, and the token runs until `#`, `&`, `?` or the
/// end of the input.
static VIDEO_ID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^.*(?:youtu\.be/|v/|/u/\w/|embed/|watch\?)\??v?=?([^#&?]*)").unwrap()
});

/// Extract the YouTube video ID from a URL.
///
/// Supported forms:
/// - https://www.youtube.com/watch?v=VIDEO_ID
/// - https://youtu.be/VIDEO_ID
/// - https://www.youtube.com/v/VIDEO_ID
/// - https://www.youtube.com/embed/VIDEO_ID
/// - https://www.youtube.com/user/NAME#p/u/1/VIDEO_ID
///
/// Query parameters and fragments after the ID are ignored. A bare ID with no
/// marker is rejected.
pub fn extract_video_id_checked(raw_url: &str) -> ExtractResult<VideoId> {
    let captures = VIDEO_ID_PATTERN
        .captures(raw_url.trim())
        .ok_or(ExtractError::NoMarker)?;

    let token = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
    let len = token.chars().count();
    if len != VIDEO_ID_LEN {
        return Err(ExtractError::InvalidLength(len));
    }

    VideoId::parse(token).map_err(|_| ExtractError::InvalidLength(len))
}

/// Extract the video ID, or `None` for anything that is not a usable URL.
pub fn extract_video_id(raw_url: &str) -> Option<VideoId> {
    extract_video_id_checked(raw_url).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(url: &str) -> Option<String> {
        extract_video_id(url).map(String::from)
    }

    #[test]
    fn test_extract_success_cases() {
        // Standard watch URL
        assert_eq!(
            id("https://www.youtube.com/watch?v=dQw4w9WgXcQ").as_deref(),
            Some("dQw4w9WgXcQ")
        );

        // Without www
        assert_eq!(
            id("https://youtube.com/watch?v=dQw4w9WgXcQ").as_deref(),
            Some("dQw4w9WgXcQ")
        );

        // youtu.be short link
        assert_eq!(id("https://youtu.be/dQw4w9WgXcQ").as_deref(), Some("dQw4w9WgXcQ"));

        // Embed
        assert_eq!(
            id("https://www.youtube.com/embed/dQw4w9WgXcQ").as_deref(),
            Some("dQw4w9WgXcQ")
        );

        // /v/
        assert_eq!(
            id("https://www.youtube.com/v/dQw4w9WgXcQ").as_deref(),
            Some("dQw4w9WgXcQ")
        );

        // Legacy channel page link
        assert_eq!(
            id("https://www.youtube.com/user/Someone#p/u/1/dQw4w9WgXcQ").as_deref(),
            Some("dQw4w9WgXcQ")
        );

        // No scheme
        assert_eq!(id("youtu.be/dQw4w9WgXcQ").as_deref(), Some("dQw4w9WgXcQ"));
    }

    #[test]
    fn test_trailing_query_and_fragment_are_dropped() {
        assert_eq!(
            id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&list=PLrAXtmRdnEQy4qtr").as_deref(),
            Some("dQw4w9WgXcQ")
        );
        assert_eq!(
            id("https://youtu.be/dQw4w9WgXcQ?t=30").as_deref(),
            Some("dQw4w9WgXcQ")
        );
        assert_eq!(
            id("https://www.youtube.com/watch?v=dQw4w9WgXcQ#t=42").as_deref(),
            Some("dQw4w9WgXcQ")
        );
        assert_eq!(
            id("https://www.youtube.com/embed/dQw4w9WgXcQ?autoplay=1&mute=1").as_deref(),
            Some("dQw4w9WgXcQ")
        );
    }

    #[test]
    fn test_ids_with_dash_and_underscore() {
        assert_eq!(
            id("https://www.youtube.com/watch?v=a-b_c-d_e-f").as_deref(),
            Some("a-b_c-d_e-f")
        );
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        assert_eq!(
            id("  https://youtu.be/dQw4w9WgXcQ \n").as_deref(),
            Some("dQw4w9WgXcQ")
        );
    }

    #[test]
    fn test_extract_failure_cases() {
        assert_eq!(extract_video_id_checked("not a url"), Err(ExtractError::NoMarker));
        assert_eq!(extract_video_id_checked(""), Err(ExtractError::NoMarker));
        assert_eq!(
            extract_video_id_checked("https://example.com/page"),
            Err(ExtractError::NoMarker)
        );

        // Too short / too long
        assert_eq!(
            extract_video_id_checked("https://www.youtube.com/watch?v=abc123"),
            Err(ExtractError::InvalidLength(6))
        );
        assert_eq!(
            extract_video_id_checked("https://youtu.be/abc123def456789"),
            Err(ExtractError::InvalidLength(15))
        );

        // Marker with nothing after it
        assert_eq!(
            extract_video_id_checked("https://www.youtube.com/watch?v="),
            Err(ExtractError::InvalidLength(0))
        );
    }

    #[test]
    fn test_bare_id_requires_marker() {
        assert_eq!(extract_video_id("dQw4w9WgXcQ"), None);
    }

    #[test]
    fn test_path_after_id_breaks_length() {
        // Only '#', '&' and '?' end the token, so a trailing slash is kept
        // and the token is no longer 11 characters long.
        assert_eq!(
            extract_video_id_checked("https://youtu.be/dQw4w9WgXcQ/"),
            Err(ExtractError::InvalidLength(12))
        );
    }

    #[test]
    fn test_round_trip_from_watch_url() {
        for raw in ["dQw4w9WgXcQ", "9bZkp7q19f0", "___________", "-----------", "M7lc1UVf-VE"] {
            let video = VideoId::parse(raw).unwrap();
            assert_eq!(extract_video_id(&video.watch_url()), Some(video));
        }
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            ExtractError::InvalidLength(3).to_string(),
            "Video ID has invalid length 3 (expected 11)"
        );
    }
}
