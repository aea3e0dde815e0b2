//! Persisted emoji-to-role mapping store for reactrole.
//!
//! The store keeps the whole [`PersistedState`](reactrole_core::PersistedState)
//! in memory and rewrites it through a [`StateBackend`] after every mutation.
//!
//! # Features
//!
//! - **Whole-state persistence**: one document, loaded at start, rewritten on change
//! - **Atomic writes**: the file backend writes a temp file and renames it into place
//! - **Per-server locking**: callers serialise read-modify-persist sequences per server
//! - **Corruption policy**: an unparsable file either resets to empty or refuses to load
//!
//! # Example
//!
//! ```rust
//! use reactrole_core::{Emoji, RoleName, ServerId};
//! use reactrole_storage::{CorruptStatePolicy, JsonFileBackend, MappingStore};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = Arc::new(JsonFileBackend::new("/tmp/role_data.json"));
//! let store = MappingStore::open(backend, CorruptStatePolicy::Reset).await?;
//!
//! let server = ServerId::new(42);
//! store.set(server, Emoji::unicode("✅"), RoleName::new("Verified")).await?;
//! assert_eq!(store.get(server).await.len(), 1);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod filesystem;
mod store;

pub use backend::{MemoryBackend, StateBackend};
pub use filesystem::JsonFileBackend;
pub use reactrole_error::{StorageError, StorageErrorKind};
pub use store::{CorruptStatePolicy, MappingStore, ServerGuard};
