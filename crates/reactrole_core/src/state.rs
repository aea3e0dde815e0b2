//! Persisted state aggregate and platform handles.

use crate::{ChannelId, MessageId, RoleId, RoleMapping, RoleName, ServerId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Pointer to the live reaction-role message of a server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoleMessage {
    /// Channel the message was posted in
    pub channel_id: ChannelId,
    /// The message itself
    pub message_id: MessageId,
}

impl RoleMessage {
    /// Create a new message reference.
    pub fn new(channel_id: ChannelId, message_id: MessageId) -> Self {
        Self {
            channel_id,
            message_id,
        }
    }
}

/// Everything the bot persists, loaded whole and rewritten whole.
///
/// # Examples
///
/// ```
/// use reactrole_core::PersistedState;
///
/// let state: PersistedState = serde_json::from_str(r#"{
///     "role_emoji_map": { "42": { "✅": "Verified" } },
///     "role_messages": { "42": { "channel_id": "7", "message_id": "9" } }
/// }"#).unwrap();
/// assert_eq!(state.role_emoji_map.len(), 1);
/// assert_eq!(state.role_messages.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedState {
    /// Emoji-to-role mapping per server
    #[serde(default)]
    pub role_emoji_map: BTreeMap<ServerId, RoleMapping>,
    /// Reaction-role message per server
    #[serde(default)]
    pub role_messages: BTreeMap<ServerId, RoleMessage>,
}

impl PersistedState {
    /// Whether neither mappings nor message references are stored.
    pub fn is_empty(&self) -> bool {
        self.role_emoji_map.is_empty() && self.role_messages.is_empty()
    }

    /// Servers that have a mapping or a role message, in id order.
    pub fn servers(&self) -> Vec<ServerId> {
        let mut servers: Vec<ServerId> = self
            .role_emoji_map
            .keys()
            .chain(self.role_messages.keys())
            .copied()
            .collect();
        servers.sort();
        servers.dedup();
        servers
    }
}

/// A role as reported by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoleHandle {
    /// Platform role id
    pub id: RoleId,
    /// Role name
    pub name: RoleName,
}

impl RoleHandle {
    /// Create a new role handle.
    pub fn new(id: RoleId, name: RoleName) -> Self {
        Self { id, name }
    }
}
