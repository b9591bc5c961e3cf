//! Bounded, most-recent-first lookup history.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info, warn};
use tubethumb_models::VideoLookupRecord;

use crate::error::HistoryResult;
use crate::kv::KeyValueStore;

/// Key the history array is stored under.
pub const HISTORY_KEY: &str = "thumb_history";

/// Records kept unless configured otherwise.
pub const DEFAULT_CAPACITY: usize = 9;

/// Lookup history backed by a key-value store.
///
/// The in-memory list is the source of truth for the session; every change
/// is written through to the store.
pub struct HistoryStore {
    store: Arc<dyn KeyValueStore>,
    capacity: usize,
    records: Vec<VideoLookupRecord>,
}

impl HistoryStore {
    /// Load history from `store`, keeping at most `capacity` records.
    ///
    /// Missing or unreadable data yields an empty history. Corruption is
    /// logged, never returned.
    pub async fn load(store: Arc<dyn KeyValueStore>, capacity: usize) -> Self {
        let records = match store.get(HISTORY_KEY).await {
            Ok(Some(raw)) => parse_history(&raw, capacity),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "Failed to read history, starting empty");
                Vec::new()
            }
        };

        debug!(count = records.len(), capacity, "Loaded history");
        Self {
            store,
            capacity,
            records,
        }
    }

    /// Add `record` at the front, replacing any earlier entry for the same
    /// video, then persist.
    ///
    /// The in-memory list is updated even if the write fails.
    pub async fn append(&mut self, record: VideoLookupRecord) -> HistoryResult<()> {
        self.records.retain(|r| r.id != record.id);
        self.records.insert(0, record);
        self.records.truncate(self.capacity);

        self.persist().await
    }

    /// Forget every record.
    pub async fn clear(&mut self) -> HistoryResult<()> {
        self.records.clear();
        self.store.remove(HISTORY_KEY).await?;

        info!("History cleared");
        Ok(())
    }

    /// All records, newest first.
    pub fn all(&self) -> &[VideoLookupRecord] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&VideoLookupRecord> {
        self.records.get(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    async fn persist(&self) -> HistoryResult<()> {
        let json = serde_json::to_string(&self.records)?;
        self.store.set(HISTORY_KEY, &json).await
    }
}

/// Parse the stored array, dropping entries that break the history
/// invariants instead of rejecting the whole list.
fn parse_history(raw: &str, capacity: usize) -> Vec<VideoLookupRecord> {
    let parsed: Vec<VideoLookupRecord> = match serde_json::from_str(raw) {
        Ok(records) => records,
        Err(e) => {
            warn!(error = %e, "Stored history is corrupt, starting empty");
            return Vec::new();
        }
    };

    let total = parsed.len();
    let mut seen = HashSet::new();
    let mut records: Vec<VideoLookupRecord> = parsed
        .into_iter()
        .filter(|r| r.thumbnails.is_well_formed())
        .filter(|r| seen.insert(r.id.clone()))
        .collect();

    if records.len() != total {
        warn!(dropped = total - records.len(), "Dropped malformed or duplicate history entries");
    }

    records.truncate(capacity);
    records
}
