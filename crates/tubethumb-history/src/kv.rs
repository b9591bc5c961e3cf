//! Key-value backends for the history store.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::debug;

use crate::error::{HistoryError, HistoryResult};

/// Durable string key-value storage.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Value under `key`, or `None` if nothing was stored.
    async fn get(&self, key: &str) -> HistoryResult<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> HistoryResult<()>;

    /// Remove `key`. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> HistoryResult<()>;
}

/// One `{key}.json` file per key inside a data directory.
///
/// Writes go to a sibling temp file that is renamed over the target, so a
/// crash mid-write never leaves a half-written value behind.
#[derive(Debug, Clone)]
pub struct FileKvStore {
    dir: PathBuf,
}

impl FileKvStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing `key`.
    pub fn path_for(&self, key: &str) -> HistoryResult<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

/// Keys become file names: letters, digits, `_` and `-` only.
fn validate_key(key: &str) -> HistoryResult<()> {
    if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
        return Err(HistoryError::invalid_key(key));
    }
    Ok(())
}

#[async_trait]
impl KeyValueStore for FileKvStore {
    async fn get(&self, key: &str) -> HistoryResult<Option<String>> {
        let path = self.path_for(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: &str) -> HistoryResult<()> {
        let path = self.path_for(key)?;
        let tmp = self.dir.join(format!(".{}.json.tmp", key));

        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(&tmp, value).await?;
        if let Err(e) = tokio::fs::rename(&tmp, &path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(HistoryError::write_failed(format!(
                "failed to replace {}: {}",
                path.display(),
                e
            )));
        }

        debug!(path = %path.display(), size = value.len(), "Wrote store value");
        Ok(())
    }

    async fn remove(&self, key: &str) -> HistoryResult<()> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-process store for tests.
#[derive(Debug, Default)]
pub struct MemoryKvStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with one value.
    pub fn with_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        let store = Self::default();
        if let Ok(mut values) = store.values.lock() {
            values.insert(key.into(), value.into());
        }
        store
    }

    fn lock(&self) -> HistoryResult<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.values
            .lock()
            .map_err(|_| HistoryError::write_failed("memory store poisoned"))
    }
}

#[async_trait]
impl KeyValueStore for MemoryKvStore {
    async fn get(&self, key: &str) -> HistoryResult<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> HistoryResult<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> HistoryResult<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_file_store_set_get_remove() {
        let temp = TempDir::new().unwrap();
        let store = FileKvStore::new(temp.path().join("data"));

        assert_eq!(store.get("thumb_history").await.unwrap(), None);

        store.set("thumb_history", "[]").await.unwrap();
        assert_eq!(store.get("thumb_history").await.unwrap().as_deref(), Some("[]"));
        assert!(temp.path().join("data/thumb_history.json").exists());
        assert!(!temp.path().join("data/.thumb_history.json.tmp").exists());

        store.set("thumb_history", "[1]").await.unwrap();
        assert_eq!(store.get("thumb_history").await.unwrap().as_deref(), Some("[1]"));

        store.remove("thumb_history").await.unwrap();
        assert_eq!(store.get("thumb_history").await.unwrap(), None);

        // Second remove is a no-op
        store.remove("thumb_history").await.unwrap();
    }

    #[tokio::test]
    async fn test_file_store_rejects_path_keys() {
        let temp = TempDir::new().unwrap();
        let store = FileKvStore::new(temp.path());

        assert!(matches!(store.set("../escape", "x").await, Err(HistoryError::InvalidKey(_))));
        assert!(matches!(store.get("").await, Err(HistoryError::InvalidKey(_))));
    }

    #[tokio::test]
    async fn test_memory_store() {
        let store = MemoryKvStore::with_value("k", "v");
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));

        store.remove("k").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);
    }
}
