//! The mapping store.

use crate::StateBackend;
use reactrole_core::{Emoji, PersistedState, RoleMapping, RoleMessage, RoleName, ServerId};
use reactrole_error::ReactroleResult;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, info, instrument, warn};

/// What to do when the persisted state exists but cannot be parsed.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CorruptStatePolicy {
    /// Log a warning and start from an empty state. Previous mappings are lost.
    #[default]
    Reset,
    /// Fail to open so an operator can repair the file.
    Refuse,
}

/// Exclusive access to one server's mapping sequence.
///
/// Held by command handlers across read-modify-persist-reconcile and by the
/// reaction pipeline across its lookups. Dropping the guard releases it.
#[derive(Debug)]
pub struct ServerGuard {
    server: ServerId,
    _guard: OwnedMutexGuard<()>,
}

impl ServerGuard {
    /// Server this guard locks.
    pub fn server(&self) -> ServerId {
        self.server
    }
}

/// Owner of the emoji-to-role mappings and role-message pointers.
///
/// Reads never fail. Every mutation rewrites the whole state through the
/// backend while the state lock is held, so documents are written in the
/// order the mutations happened. A failed write is reported to the caller;
/// the in-memory change stays and goes out with the next successful write.
pub struct MappingStore {
    state: Mutex<PersistedState>,
    backend: Arc<dyn StateBackend>,
    server_locks: Mutex<HashMap<ServerId, Arc<Mutex<()>>>>,
}

impl std::fmt::Debug for MappingStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MappingStore")
            .field("backend", &self.backend.describe())
            .finish_non_exhaustive()
    }
}

impl MappingStore {
    /// Load the state from `backend`.
    ///
    /// An absent or empty document starts an empty state. An unparsable one
    /// is handled according to `policy`.
    ///
    /// # Errors
    ///
    /// Returns error if the document cannot be read, or is corrupt and the
    /// policy is [`CorruptStatePolicy::Refuse`].
    #[instrument(skip(backend), fields(backend = %backend.describe()))]
    pub async fn open(
        backend: Arc<dyn StateBackend>,
        policy: CorruptStatePolicy,
    ) -> ReactroleResult<Self> {
        let state = match backend.load().await {
            Ok(Some(state)) => {
                info!(
                    servers = state.role_emoji_map.len(),
                    role_messages = state.role_messages.len(),
                    "Loaded role state"
                );
                state
            }
            Ok(None) => {
                info!("State not found or empty, initializing with empty data");
                PersistedState::default()
            }
            Err(e) if e.is_corrupt() && policy == CorruptStatePolicy::Reset => {
                warn!(
                    error = %e,
                    "Role state is unparsable, initializing with empty data; previous mappings are lost"
                );
                PersistedState::default()
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self::with_state(backend, state))
    }

    /// Build a store around an already loaded state.
    pub fn with_state(backend: Arc<dyn StateBackend>, state: PersistedState) -> Self {
        Self {
            state: Mutex::new(state),
            backend,
            server_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Acquire the per-server lock.
    pub async fn lock_server(&self, server: ServerId) -> ServerGuard {
        let lock = {
            let mut locks = self.server_locks.lock().await;
            Arc::clone(locks.entry(server).or_default())
        };
        ServerGuard {
            server,
            _guard: lock.lock_owned().await,
        }
    }

    /// Mapping of a server, empty when none is stored.
    pub async fn get(&self, server: ServerId) -> RoleMapping {
        self.state
            .lock()
            .await
            .role_emoji_map
            .get(&server)
            .cloned()
            .unwrap_or_default()
    }

    /// Map `emoji` to `role`, overwriting any previous role for it.
    ///
    /// A failed save restores the previous mapping before returning the error.
    #[instrument(skip_all, fields(server_id = %server, emoji = %emoji, role = %role))]
    pub async fn set(&self, server: ServerId, emoji: Emoji, role: RoleName) -> ReactroleResult<()> {
        let mut state = self.state.lock().await;
        let before = state.role_emoji_map.get(&server).cloned();
        let previous = state
            .role_emoji_map
            .entry(server)
            .or_default()
            .insert(emoji, role);
        debug!(replaced = ?previous, "Mapping updated");

        if let Err(e) = self.backend.save(&state).await {
            restore(&mut state.role_emoji_map, server, before);
            warn!(error = %e, "Save failed, mapping change rolled back");
            return Err(e.into());
        }
        Ok(())
    }

    /// Remove the mapping for `emoji`. Returns whether it existed.
    ///
    /// A failed save restores the removed entry before returning the error.
    #[instrument(skip_all, fields(server_id = %server, emoji = %emoji))]
    pub async fn remove(&self, server: ServerId, emoji: &Emoji) -> ReactroleResult<bool> {
        let mut state = self.state.lock().await;
        let before = state.role_emoji_map.get(&server).cloned();
        let removed = state
            .role_emoji_map
            .get_mut(&server)
            .and_then(|mapping| mapping.remove(emoji));

        match removed {
            Some(role) => {
                debug!(role = %role, "Mapping removed");
                if let Err(e) = self.backend.save(&state).await {
                    restore(&mut state.role_emoji_map, server, before);
                    warn!(error = %e, "Save failed, mapping removal rolled back");
                    return Err(e.into());
                }
                Ok(true)
            }
            None => {
                debug!("No mapping for emoji");
                Ok(false)
            }
        }
    }

    /// Reaction-role message of a server.
    pub async fn message_ref(&self, server: ServerId) -> Option<RoleMessage> {
        self.state.lock().await.role_messages.get(&server).copied()
    }

    /// Point the server at a new reaction-role message.
    ///
    /// A failed save restores the previous reference before returning the error.
    #[instrument(skip_all, fields(server_id = %server, channel_id = %message.channel_id, message_id = %message.message_id))]
    pub async fn set_message_ref(&self, server: ServerId, message: RoleMessage) -> ReactroleResult<()> {
        let mut state = self.state.lock().await;
        let previous = state.role_messages.insert(server, message);
        if let Some(previous) = previous {
            debug!(previous_message_id = %previous.message_id, "Replacing role message reference");
        }

        if let Err(e) = self.backend.save(&state).await {
            restore(&mut state.role_messages, server, previous);
            warn!(error = %e, "Save failed, role message change rolled back");
            return Err(e.into());
        }
        Ok(())
    }

    /// Copy of the whole state.
    pub async fn snapshot(&self) -> PersistedState {
        self.state.lock().await.clone()
    }

    /// Location of the backing document.
    pub fn describe(&self) -> String {
        self.backend.describe()
    }
}

/// Put back a server's entry as it was before a failed save.
fn restore<V>(map: &mut BTreeMap<ServerId, V>, server: ServerId, before: Option<V>) {
    match before {
        Some(value) => {
            map.insert(server, value);
        }
        None => {
            map.remove(&server);
        }
    }
}
