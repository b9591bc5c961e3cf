//! Delivery sinks for downloaded thumbnails.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::error::{MediaError, MediaResult};

/// Where downloaded thumbnails end up.
#[async_trait]
pub trait DeliverySink: Send + Sync {
    /// Persist `bytes` under `filename` and return where they went.
    async fn save(&self, filename: &str, bytes: &[u8]) -> MediaResult<PathBuf>;

    /// Hand `url` to something outside the process (a browser, a viewer).
    async fn open_external(&self, url: &str) -> MediaResult<()>;
}

/// Writes files into an output directory and opens URLs with the
/// platform's default handler.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl DeliverySink for DirectorySink {
    async fn save(&self, filename: &str, bytes: &[u8]) -> MediaResult<PathBuf> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(filename);
        tokio::fs::write(&path, bytes).await?;

        info!(path = %path.display(), size = bytes.len(), "Saved thumbnail");
        Ok(path)
    }

    async fn open_external(&self, url: &str) -> MediaResult<()> {
        let mut command = opener_command(url);
        let status = command
            .status()
            .await
            .map_err(|e| MediaError::delivery_failed(format!("failed to launch opener: {}", e)))?;

        if !status.success() {
            warn!(url = %url, status = %status, "Opener exited unsuccessfully");
            return Err(MediaError::delivery_failed(format!("opener exited with {}", status)));
        }

        Ok(())
    }
}

fn opener_command(url: &str) -> tokio::process::Command {
    let (program, args) = opener_invocation(url);
    let mut cmd = tokio::process::Command::new(program);
    cmd.args(args);
    cmd
}

#[cfg(target_os = "macos")]
fn opener_invocation(url: &str) -> (&'static str, Vec<String>) {
    ("open", vec![url.to_string()])
}

/// `explorer` exits nonzero even when it opened the URL, so go through
/// `start`. The empty argument is the window title `start` expects first.
#[cfg(target_os = "windows")]
fn opener_invocation(url: &str) -> (&'static str, Vec<String>) {
    (
        "cmd",
        vec!["/C".to_string(), "start".to_string(), String::new(), url.to_string()],
    )
}

#[cfg(all(unix, not(target_os = "macos")))]
fn opener_invocation(url: &str) -> (&'static str, Vec<String>) {
    ("xdg-open", vec![url.to_string()])
}

/// Keeps everything in memory. Used by tests and dry runs.
#[derive(Debug, Default)]
pub struct MemorySink {
    saved: Mutex<Vec<(String, Vec<u8>)>>,
    opened: Mutex<Vec<String>>,
    fail_saves: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink whose `save` always fails.
    pub fn failing() -> Self {
        Self {
            fail_saves: true,
            ..Self::default()
        }
    }

    pub fn saved(&self) -> Vec<(String, Vec<u8>)> {
        self.saved.lock().map(|s| s.clone()).unwrap_or_default()
    }

    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().map(|o| o.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl DeliverySink for MemorySink {
    async fn save(&self, filename: &str, bytes: &[u8]) -> MediaResult<PathBuf> {
        if self.fail_saves {
            return Err(MediaError::delivery_failed("memory sink rejects saves"));
        }

        self.saved
            .lock()
            .map_err(|_| MediaError::delivery_failed("memory sink poisoned"))?
            .push((filename.to_string(), bytes.to_vec()));
        Ok(PathBuf::from(filename))
    }

    async fn open_external(&self, url: &str) -> MediaResult<()> {
        self.opened
            .lock()
            .map_err(|_| MediaError::delivery_failed("memory sink poisoned"))?
            .push(url.to_string());
        Ok(())
    }
}
