//! Inbound reaction events.

use crate::{ChannelId, Emoji, MessageId, ServerId, UserId};
use derive_getters::Getters;

/// Whether a reaction was added or removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ReactionKind {
    /// A user reacted
    #[display("added")]
    Added,
    /// A user took their reaction back
    #[display("removed")]
    Removed,
}

/// A reaction added to or removed from a message in a server.
///
/// # Examples
///
/// ```
/// use reactrole_core::{Emoji, ReactionEventBuilder};
///
/// let event = ReactionEventBuilder::default()
///     .server_id(1u64)
///     .channel_id(2u64)
///     .message_id(3u64)
///     .emoji(Emoji::unicode("✅"))
///     .user_id(4u64)
///     .build()
///     .unwrap();
/// assert_eq!(event.user_is_bot(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Getters, derive_builder::Builder)]
#[builder(setter(into))]
pub struct ReactionEvent {
    /// Server the message lives in
    server_id: ServerId,
    /// Channel the message lives in
    channel_id: ChannelId,
    /// Message that was reacted to
    message_id: MessageId,
    /// Emoji token of the reaction
    emoji: Emoji,
    /// Acting user
    user_id: UserId,
    /// Whether the acting user is a bot account, `None` when the gateway
    /// event did not say
    #[builder(default)]
    #[getter(skip)]
    user_is_bot: Option<bool>,
}

impl ReactionEvent {
    /// Whether the acting user is a bot account, if known.
    pub fn user_is_bot(&self) -> Option<bool> {
        self.user_is_bot
    }
}
