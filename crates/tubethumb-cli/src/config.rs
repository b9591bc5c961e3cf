//! Application configuration.

use std::path::PathBuf;
use std::time::Duration;

use tubethumb_history::DEFAULT_CAPACITY;
use tubethumb_media::FetcherConfig;
use tubethumb_models::DEFAULT_CDN_BASE;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Directory holding persisted state (history)
    pub data_dir: PathBuf,
    /// Directory downloads are written to
    pub output_dir: PathBuf,
    /// Maximum number of history records kept
    pub history_capacity: usize,
    /// Thumbnail CDN host
    pub cdn_base: String,
    /// Synthetic lookup delay
    pub lookup_delay: Duration,
    /// Progress report interval during a lookup
    pub progress_tick: Duration,
    pub fetcher: FetcherConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".tubethumb"),
            output_dir: PathBuf::from("."),
            history_capacity: DEFAULT_CAPACITY,
            cdn_base: DEFAULT_CDN_BASE.to_string(),
            lookup_delay: Duration::from_millis(1500),
            progress_tick: Duration::from_millis(200),
            fetcher: FetcherConfig::default(),
        }
    }
}

impl AppConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            data_dir: std::env::var("TUBETHUMB_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            output_dir: std::env::var("TUBETHUMB_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            history_capacity: std::env::var("TUBETHUMB_HISTORY_CAPACITY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.history_capacity),
            cdn_base: std::env::var("TUBETHUMB_CDN_BASE").unwrap_or(defaults.cdn_base),
            lookup_delay: Duration::from_millis(
                std::env::var("TUBETHUMB_LOOKUP_DELAY_MS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(1500),
            ),
            progress_tick: Duration::from_millis(
                std::env::var("TUBETHUMB_PROGRESS_TICK_MS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(200),
            ),
            fetcher: FetcherConfig::from_env(),
        }
    }

    /// Same config without the synthetic delay.
    pub fn without_delay(mut self) -> Self {
        self.lookup_delay = Duration::ZERO;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.history_capacity, 9);
        assert_eq!(config.lookup_delay, Duration::from_millis(1500));
        assert_eq!(config.progress_tick, Duration::from_millis(200));
        assert_eq!(config.cdn_base, "https://img.youtube.com");
    }
}
