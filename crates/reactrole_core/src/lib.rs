//! Core data types for the reactrole bot.
//!
//! This crate holds the domain vocabulary shared by storage, the reconciliation
//! logic and the Discord adapter: snowflake identifiers, emoji tokens, role
//! names, the ordered emoji-to-role mapping and the persisted state aggregate.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod emoji;
mod event;
mod ids;
mod mapping;
mod state;

pub use emoji::{Emoji, RoleName, TokenError};
pub use event::{ReactionEvent, ReactionEventBuilder, ReactionEventBuilderError, ReactionKind};
pub use ids::{ChannelId, MessageId, RoleId, ServerId, UserId};
pub use mapping::RoleMapping;
pub use state::{PersistedState, RoleHandle, RoleMessage};
