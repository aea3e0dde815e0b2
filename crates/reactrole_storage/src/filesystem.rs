//! JSON file state backend.

use crate::backend::{StateBackend, decode, encode};
use reactrole_core::PersistedState;
use reactrole_error::{StorageError, StorageErrorKind};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

/// Stores the state as a pretty-printed JSON file.
///
/// Writes go to a hidden sibling temp file which is flushed and then renamed
/// over the target, so a concurrent reader sees either the old or the new
/// document, never a torn one.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    /// Create a backend for the file at `path`. Nothing is touched until the
    /// first load or save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the state file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "state".to_string());
        self.path.with_file_name(format!(".{name}.tmp"))
    }
}

#[async_trait::async_trait]
impl StateBackend for JsonFileBackend {
    #[tracing::instrument(skip(self), fields(path = %self.path.display()))]
    async fn load(&self) -> Result<Option<PersistedState>, StorageError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("State file not found");
                return Ok(None);
            }
            Err(e) => {
                return Err(StorageError::new(StorageErrorKind::FileRead(format!(
                    "{}: {}",
                    self.path.display(),
                    e
                ))));
            }
        };

        let state = decode(&raw)?;
        tracing::debug!(bytes = raw.len(), present = state.is_some(), "Read state file");
        Ok(state)
    }

    #[tracing::instrument(skip(self, state), fields(path = %self.path.display()))]
    async fn save(&self, state: &PersistedState) -> Result<(), StorageError> {
        let encoded = encode(state)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                    "{}: {}",
                    parent.display(),
                    e
                )))
            })?;
        }

        // Write to temp file first, then rename for atomicity
        let temp_path = self.temp_path();
        if let Err(e) = write_synced(&temp_path, encoded.as_bytes()).await {
            discard(&temp_path).await;
            return Err(StorageError::new(StorageErrorKind::FileWrite(format!(
                "{}: {}",
                temp_path.display(),
                e
            ))));
        }

        if let Err(e) = tokio::fs::rename(&temp_path, &self.path).await {
            discard(&temp_path).await;
            return Err(StorageError::new(StorageErrorKind::Rename(format!(
                "{} to {}: {}",
                temp_path.display(),
                self.path.display(),
                e
            ))));
        }

        tracing::debug!(bytes = encoded.len(), "Wrote state file");
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

async fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = tokio::fs::File::create(path).await?;
    file.write_all(bytes).await?;
    file.sync_all().await
}

/// Best-effort removal of a temp file left by a failed save.
async fn discard(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await
        && e.kind() != std::io::ErrorKind::NotFound
    {
        tracing::warn!(path = %path.display(), error = %e, "Failed to remove temp state file");
    }
}
