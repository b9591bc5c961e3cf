//! Persistent lookup history.
//!
//! Records live as one JSON array under a fixed key in a [`KeyValueStore`].
//! Newest first, unique by video id, bounded by a configurable capacity.

pub mod error;
pub mod kv;
pub mod store;

pub use error::{HistoryError, HistoryResult};
pub use kv::{FileKvStore, KeyValueStore, MemoryKvStore};
pub use store::{HistoryStore, DEFAULT_CAPACITY, HISTORY_KEY};
