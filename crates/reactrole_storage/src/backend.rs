//! Persistence backends for the role state.

use reactrole_core::PersistedState;
use reactrole_error::{StorageError, StorageErrorKind};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;

/// Trait for pluggable state persistence.
///
/// A backend stores exactly one [`PersistedState`] document. Loading an
/// absent or empty document yields `None`; a document that exists but cannot
/// be parsed yields a [`StorageErrorKind::Corrupt`] error so the caller can
/// apply its corruption policy.
#[async_trait::async_trait]
pub trait StateBackend: Send + Sync {
    /// Load the persisted state.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The document cannot be read
    /// - The document exists but is not valid state (`Corrupt`)
    async fn load(&self) -> Result<Option<PersistedState>, StorageError>;

    /// Replace the persisted state with `state`.
    ///
    /// Readers never observe a partially written document.
    async fn save(&self, state: &PersistedState) -> Result<(), StorageError>;

    /// Human readable location, used in logs.
    fn describe(&self) -> String;
}

/// Parse a raw document. Blank documents count as absent.
pub(crate) fn decode(raw: &str) -> Result<Option<PersistedState>, StorageError> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    serde_json::from_str(raw)
        .map(Some)
        .map_err(|e| StorageError::new(StorageErrorKind::Corrupt(e.to_string())))
}

/// Render the state the way it is written to disk.
pub(crate) fn encode(state: &PersistedState) -> Result<String, StorageError> {
    serde_json::to_string_pretty(state)
        .map_err(|e| StorageError::new(StorageErrorKind::Serialize(e.to_string())))
}

/// In-memory backend.
///
/// Used for dry runs and tests. It stores the encoded document, so a backend
/// seeded with invalid text behaves like a corrupt state file.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    document: Mutex<Option<String>>,
    saves: Mutex<usize>,
    reject_saves: AtomicBool,
}

impl MemoryBackend {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend whose document is `raw`.
    pub fn with_document(raw: impl Into<String>) -> Self {
        Self {
            document: Mutex::new(Some(raw.into())),
            ..Self::default()
        }
    }

    /// Make every following save fail (or succeed again) without touching
    /// the stored document.
    pub fn reject_saves(&self, reject: bool) {
        self.reject_saves.store(reject, Ordering::SeqCst);
    }

    /// The currently stored document.
    pub async fn document(&self) -> Option<String> {
        self.document.lock().await.clone()
    }

    /// Number of completed saves.
    pub async fn save_count(&self) -> usize {
        *self.saves.lock().await
    }
}

#[async_trait::async_trait]
impl StateBackend for MemoryBackend {
    async fn load(&self) -> Result<Option<PersistedState>, StorageError> {
        match self.document.lock().await.as_deref() {
            Some(raw) => decode(raw),
            None => Ok(None),
        }
    }

    async fn save(&self, state: &PersistedState) -> Result<(), StorageError> {
        if self.reject_saves.load(Ordering::SeqCst) {
            return Err(StorageError::new(StorageErrorKind::FileWrite(
                "memory backend is rejecting writes".to_string(),
            )));
        }
        let encoded = encode(state)?;
        *self.document.lock().await = Some(encoded);
        *self.saves.lock().await += 1;
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
