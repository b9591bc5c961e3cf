//! Media pipeline metrics.
//!
//! Recorded through the `metrics` facade; nothing is exported unless the
//! host process installs a recorder.

use metrics::counter;

/// Metric name constants for consistency.
pub mod names {
    /// Image fetches by outcome.
    pub const FETCHES_TOTAL: &str = "tubethumb_image_fetches_total";

    /// Re-encodes by target format.
    pub const CONVERSIONS_TOTAL: &str = "tubethumb_image_conversions_total";

    /// Downloads that fell back to opening the source URL.
    pub const FALLBACKS_TOTAL: &str = "tubethumb_download_fallbacks_total";
}

/// Record an image fetch. `outcome` is "ok", "unavailable" or "error".
pub fn record_fetch(outcome: &'static str) {
    counter!(names::FETCHES_TOTAL, "outcome" => outcome).increment(1);
}

pub fn record_conversion(target: &'static str) {
    counter!(names::CONVERSIONS_TOTAL, "target" => target).increment(1);
}

pub fn record_fallback() {
    counter!(names::FALLBACKS_TOTAL).increment(1);
}
