//! Chat platform trait and snapshot types.

use async_trait::async_trait;
use reactrole_core::{ChannelId, Emoji, MessageId, RoleHandle, RoleId, RoleName, ServerId, UserId};
use reactrole_error::PlatformResult;

/// One reaction as currently shown on a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionSnapshot {
    /// Emoji token of the reaction
    pub emoji: Emoji,
    /// Number of users who reacted with it
    pub count: u64,
    /// Whether the bot itself is one of them
    pub me: bool,
}

/// The parts of a message the reconciler looks at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageSnapshot {
    /// Current body text
    pub content: String,
    /// Current reactions, in the order the platform reports them
    pub reactions: Vec<ReactionSnapshot>,
}

/// Outbound calls the bot makes into the chat platform.
///
/// The reaction-role logic only talks to the platform through this trait,
/// so it runs unchanged against Discord or an in-memory fake.
///
/// Every method is a single platform call that either completes or fails;
/// none of them retry.
#[async_trait]
pub trait RolePlatform: Send + Sync {
    /// All roles of a server, in platform order.
    async fn list_roles(&self, server: ServerId) -> PlatformResult<Vec<RoleHandle>>;

    /// Create a role with platform defaults.
    async fn create_role(&self, server: ServerId, name: &RoleName) -> PlatformResult<RoleHandle>;

    /// Give a member a role. Granting a role the member has is a no-op.
    async fn grant_role(&self, server: ServerId, user: UserId, role: RoleId) -> PlatformResult<()>;

    /// Take a role from a member. Revoking a missing role is a no-op.
    async fn revoke_role(&self, server: ServerId, user: UserId, role: RoleId)
    -> PlatformResult<()>;

    /// Whether a user account is a bot.
    async fn is_bot(&self, user: UserId) -> PlatformResult<bool>;

    /// Send a direct message to a user.
    async fn send_direct_message(&self, user: UserId, content: &str) -> PlatformResult<()>;

    /// Whether `channel` is a channel of `server`.
    async fn channel_in_server(&self, server: ServerId, channel: ChannelId) -> PlatformResult<bool>;

    /// Post a new message, returning its id.
    async fn post_message(&self, channel: ChannelId, content: &str) -> PlatformResult<MessageId>;

    /// Read a message's body and reactions.
    async fn fetch_message(
        &self,
        channel: ChannelId,
        message: MessageId,
    ) -> PlatformResult<MessageSnapshot>;

    /// Replace a message's body.
    async fn edit_message(
        &self,
        channel: ChannelId,
        message: MessageId,
        content: &str,
    ) -> PlatformResult<()>;

    /// React to a message as the bot.
    async fn add_reaction(
        &self,
        channel: ChannelId,
        message: MessageId,
        emoji: &Emoji,
    ) -> PlatformResult<()>;

    /// Withdraw the bot's own reaction. Other users' reactions are untouched.
    async fn remove_own_reaction(
        &self,
        channel: ChannelId,
        message: MessageId,
        emoji: &Emoji,
    ) -> PlatformResult<()>;

    /// Name used in logs (e.g. "discord").
    fn platform_name(&self) -> &str;
}
