//! Save sinks: where downloaded documents end up.
//!
//! A [`SaveSink`] is the host's "save this blob as that name" primitive. The
//! downloader only initiates the save; the sink owns any temporary resources it
//! needs and must release them whether or not the save succeeds.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use super::error::DownloadError;
use super::filename::resolve_unique_path;

/// Host primitive that stores a downloaded document under a filename.
#[async_trait]
pub trait SaveSink: Send + Sync + std::fmt::Debug {
    /// Stores `bytes` as `filename` and returns where it was saved.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::Save`] if the document cannot be stored.
    async fn save(&self, bytes: &[u8], filename: &str) -> Result<PathBuf, DownloadError>;
}

/// Writes documents into a directory, never overwriting existing files.
///
/// Bytes are first written to a hidden `.part` staging file next to the
/// destination and then renamed into place; the staging file is removed on
/// every failure path. Saves through one sink (and its clones) are
/// serialized, so concurrent downloads never claim the same name.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
    save_lock: Arc<Mutex<()>>,
}

impl DirectorySink {
    /// Creates a sink for `dir`. The directory must already exist.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            save_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Target directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl SaveSink for DirectorySink {
    #[tracing::instrument(level = "debug", skip(self, bytes), fields(bytes = bytes.len()))]
    async fn save(&self, bytes: &[u8], filename: &str) -> Result<PathBuf, DownloadError> {
        let _guard = self.save_lock.lock().await;
        let final_path = resolve_unique_path(&self.dir, filename);
        let staging = StagingFile::for_destination(&final_path);

        tokio::fs::write(staging.path(), bytes)
            .await
            .map_err(|e| DownloadError::save(staging.path(), e))?;
        tokio::fs::rename(staging.path(), &final_path)
            .await
            .map_err(|e| DownloadError::save(&final_path, e))?;
        staging.release();

        debug!(path = %final_path.display(), "document saved");
        Ok(final_path)
    }
}

/// Staging file handle; removes the file on drop unless released after a
/// successful rename.
struct StagingFile {
    path: PathBuf,
    released: bool,
}

impl StagingFile {
    fn for_destination(destination: &Path) -> Self {
        let name = destination
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            path: destination.with_file_name(format!(".{name}.part")),
            released: false,
        }
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn release(mut self) {
        self.released = true;
    }
}

impl Drop for StagingFile {
    fn drop(&mut self) {
        if !self.released && self.path.exists() {
            debug!(path = %self.path.display(), "removing staging file");
            let _ = std::fs::remove_file(&self.path);
        }
    }
}
