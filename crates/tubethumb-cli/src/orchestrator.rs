//! Application state machine.
//!
//! Owns the current lookup, the history store and the collaborators, and
//! moves between [`AppState`]s in response to user commands. Operations are
//! awaited one at a time through `&mut self`.

use std::sync::Arc;
use std::time::Instant;

use tokio::time::{interval, sleep, MissedTickBehavior};
use tracing::{debug, info, warn};
use tubethumb_ai::AnalysisClient;
use tubethumb_history::{FileKvStore, HistoryStore};
use tubethumb_media::{
    DeliveryOutcome, DirectorySink, ImageFetchConverter, ImageFetcher, VariantAvailability,
};
use tubethumb_models::{
    extract_video_id_checked, AnalysisResult, AppState, ImageFormat, ProgressTracker,
    ThumbnailSetBuilder, VariantKey, VideoLookupRecord,
};

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};

/// Message shown when the input is not a usable YouTube URL.
pub const INVALID_URL_MESSAGE: &str = "Invalid YouTube URL. Please check and try again.";

/// Result of an analysis request.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    Completed(AnalysisResult),
    /// No API key is configured
    Disabled,
}

pub struct Orchestrator {
    config: AppConfig,
    builder: ThumbnailSetBuilder,
    media: ImageFetchConverter,
    analysis: Option<AnalysisClient>,
    history: HistoryStore,
    status: AppState,
    error_message: Option<String>,
    current: Option<VideoLookupRecord>,
    progress: ProgressTracker,
}

impl Orchestrator {
    pub fn new(
        config: AppConfig,
        media: ImageFetchConverter,
        analysis: Option<AnalysisClient>,
        history: HistoryStore,
    ) -> Self {
        Self {
            builder: ThumbnailSetBuilder::new(config.cdn_base.clone()),
            progress: ProgressTracker::new(config.lookup_delay),
            config,
            media,
            analysis,
            history,
            status: AppState::Idle,
            error_message: None,
            current: None,
        }
    }

    /// Build the production wiring: file-backed history, downloads into the
    /// output directory, analysis only when a key is configured.
    pub async fn from_config(config: AppConfig, analysis: Option<AnalysisClient>) -> AppResult<Self> {
        let fetcher = ImageFetcher::new(config.fetcher.clone())?;
        let sink = Arc::new(DirectorySink::new(config.output_dir.clone()));
        let media = ImageFetchConverter::new(fetcher, sink);

        let store = Arc::new(FileKvStore::new(config.data_dir.clone()));
        let history = HistoryStore::load(store, config.history_capacity).await;

        Ok(Self::new(config, media, analysis, history))
    }

    pub fn status(&self) -> AppState {
        self.status
    }

    /// User-facing message for the last rejected input.
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn current(&self) -> Option<&VideoLookupRecord> {
        self.current.as_ref()
    }

    pub fn analysis_enabled(&self) -> bool {
        self.analysis.is_some()
    }

    /// Resolve `raw_url` into a thumbnail set.
    ///
    /// Invalid input only sets the error message; status, the current
    /// record and history are untouched. Valid input waits out the synthetic delay while
    /// reporting progress through `on_progress`, then records the lookup.
    pub async fn lookup<F>(&mut self, raw_url: &str, mut on_progress: F) -> AppResult<&VideoLookupRecord>
    where
        F: FnMut(f32),
    {
        let id = match extract_video_id_checked(raw_url) {
            Ok(id) => id,
            Err(e) => {
                debug!(input = %raw_url, reason = %e, "Rejected lookup input");
                self.error_message = Some(INVALID_URL_MESSAGE.to_string());
                return Err(AppError::invalid_url(INVALID_URL_MESSAGE));
            }
        };

        info!(video_id = %id, "Lookup started");
        self.status = AppState::Analyzing;
        self.error_message = None;
        self.progress.start(Instant::now());
        on_progress(self.progress.progress_at(Instant::now()));

        self.wait_with_progress(&mut on_progress).await;

        self.progress.settle();
        on_progress(self.progress.progress_at(Instant::now()));

        let thumbnails = self.builder.build(&id);
        let record = VideoLookupRecord::new(id, raw_url.trim(), thumbnails);

        if let Err(e) = self.history.append(record.clone()).await {
            warn!(error = %e, "Failed to persist history");
        }

        info!(video_id = %record.id, "Lookup complete");
        self.status = AppState::Ready;
        Ok(&*self.current.insert(record))
    }

    async fn wait_with_progress<F>(&self, on_progress: &mut F)
    where
        F: FnMut(f32),
    {
        if self.config.lookup_delay.is_zero() {
            return;
        }

        let delay = sleep(self.config.lookup_delay);
        tokio::pin!(delay);

        let mut ticker = interval(self.config.progress_tick.max(std::time::Duration::from_millis(1)));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first tick completes immediately.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = &mut delay => break,
                _ = ticker.tick() => on_progress(self.progress.progress_at(Instant::now())),
            }
        }
    }

    /// Download one variant of the current record.
    pub async fn download(&self, key: VariantKey, format: ImageFormat) -> AppResult<DeliveryOutcome> {
        let record = self.current.as_ref().ok_or(AppError::NoCurrentRecord)?;
        let variant = record
            .thumbnails
            .by_key(key)
            .ok_or_else(|| AppError::MissingVariant(key.to_string()))?;

        Ok(self.media.deliver_variant(variant, format).await)
    }

    /// Critique the current record's best variant.
    pub async fn analyze(&self) -> AppResult<AnalysisOutcome> {
        let record = self.current.as_ref().ok_or(AppError::NoCurrentRecord)?;
        let Some(client) = &self.analysis else {
            info!("Analysis requested without an API key");
            return Ok(AnalysisOutcome::Disabled);
        };

        let best = record
            .thumbnails
            .best()
            .ok_or_else(|| AppError::MissingVariant(VariantKey::MaxRes.to_string()))?;

        let image = self.media.fetcher().fetch_inline(&best.url).await?;
        let result = client.analyze(image).await?;

        Ok(AnalysisOutcome::Completed(result))
    }

    /// Availability of every variant of the current record, in set order.
    pub async fn probe_variants(&self) -> AppResult<Vec<(VariantKey, VariantAvailability)>> {
        let record = self.current.as_ref().ok_or(AppError::NoCurrentRecord)?;

        let mut results = Vec::with_capacity(record.thumbnails.len());
        for variant in &record.thumbnails {
            let availability = self.media.fetcher().probe(&variant.url).await;
            results.push((variant.key, availability));
        }
        Ok(results)
    }

    pub fn history(&self) -> &[VideoLookupRecord] {
        self.history.all()
    }

    /// Forget all history. A failed delete is logged and the in-memory list
    /// is still emptied.
    pub async fn clear_history(&mut self) {
        if let Err(e) = self.history.clear().await {
            warn!(error = %e, "Failed to clear stored history");
        }
    }

    /// Re-run the lookup for a past record.
    pub async fn reselect<F>(&mut self, index: usize, on_progress: F) -> AppResult<&VideoLookupRecord>
    where
        F: FnMut(f32),
    {
        let url = self
            .history
            .get(index)
            .map(|r| r.original_url.clone())
            .ok_or(AppError::HistoryIndex(index))?;

        self.lookup(&url, on_progress).await
    }

    /// Back to `Idle` with no current record.
    pub fn reset(&mut self) {
        self.status = AppState::Idle;
        self.error_message = None;
        self.current = None;
        self.progress.reset();
    }
}
