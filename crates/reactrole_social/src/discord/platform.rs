//! `RolePlatform` over serenity's HTTP client.

use super::conversions::{emoji_from_reaction, reaction_type};
use crate::{MessageSnapshot, ReactionSnapshot, RolePlatform};
use async_trait::async_trait;
use reactrole_core::{
    ChannelId, Emoji, MessageId, RoleHandle, RoleId, RoleName, ServerId, UserId,
};
use reactrole_error::{PlatformError, PlatformErrorKind, PlatformResult};
use serenity::all::{CreateMessage, EditMessage, EditRole};
use serenity::http::Http;
use serenity::model::id as discord;
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

/// Reason attached to role changes in the server audit log.
const AUDIT_REASON: &str = "Reaction role";

/// Discord implementation of [`RolePlatform`].
pub struct DiscordPlatform {
    http: Arc<Http>,
}

impl DiscordPlatform {
    /// Create a platform with its own HTTP client.
    #[instrument(skip(token), fields(token_len = token.as_ref().len()))]
    pub fn new(token: impl AsRef<str>) -> Self {
        info!("Creating standalone Discord platform client");
        Self {
            http: Arc::new(Http::new(token.as_ref())),
        }
    }

    /// Create a platform sharing the HTTP client of a running bot, so both
    /// go through the same rate limiter.
    pub fn with_http_client(http: Arc<Http>) -> Self {
        Self { http }
    }
}

/// Map a serenity failure to a platform error, logging it.
fn api_error(operation: &'static str) -> impl FnOnce(serenity::Error) -> PlatformError {
    move |e| {
        error!(operation, error = %e, "Discord API call failed");
        PlatformError::api(operation, e.to_string())
    }
}

/// Serenity ids panic on zero, so reject it before converting.
fn nonzero(what: &str, id: u64) -> PlatformResult<u64> {
    if id == 0 {
        return Err(PlatformError::new(PlatformErrorKind::NotFound(format!(
            "{what} 0"
        ))));
    }
    Ok(id)
}

fn guild(server: ServerId) -> PlatformResult<discord::GuildId> {
    nonzero("server", server.get()).map(discord::GuildId::new)
}

fn channel(channel: ChannelId) -> PlatformResult<discord::ChannelId> {
    nonzero("channel", channel.get()).map(discord::ChannelId::new)
}

fn message(message: MessageId) -> PlatformResult<discord::MessageId> {
    nonzero("message", message.get()).map(discord::MessageId::new)
}

fn user(user: UserId) -> PlatformResult<discord::UserId> {
    nonzero("user", user.get()).map(discord::UserId::new)
}

fn role(role: RoleId) -> PlatformResult<discord::RoleId> {
    nonzero("role", role.get()).map(discord::RoleId::new)
}

#[async_trait]
impl RolePlatform for DiscordPlatform {
    #[instrument(skip(self), fields(server_id = %server))]
    async fn list_roles(&self, server: ServerId) -> PlatformResult<Vec<RoleHandle>> {
        let roles = self
            .http
            .get_guild_roles(guild(server)?)
            .await
            .map_err(api_error("roles.list"))?;
        debug!(role_count = roles.len(), "Fetched roles");

        Ok(roles
            .into_iter()
            .map(|r| RoleHandle::new(RoleId::new(r.id.get()), RoleName::new(r.name)))
            .collect())
    }

    #[instrument(skip(self), fields(server_id = %server, role = %name))]
    async fn create_role(&self, server: ServerId, name: &RoleName) -> PlatformResult<RoleHandle> {
        let created = guild(server)?
            .create_role(
                self.http.as_ref(),
                EditRole::new().name(name.as_str()).audit_log_reason(AUDIT_REASON),
            )
            .await
            .map_err(api_error("roles.create"))?;

        Ok(RoleHandle::new(
            RoleId::new(created.id.get()),
            RoleName::new(created.name),
        ))
    }

    #[instrument(skip(self), fields(server_id = %server, user_id = %member, role_id = %role_id))]
    async fn grant_role(&self, server: ServerId, member: UserId, role_id: RoleId) -> PlatformResult<()> {
        self.http
            .add_member_role(guild(server)?, user(member)?, role(role_id)?, Some(AUDIT_REASON))
            .await
            .map_err(api_error("members.add_role"))
    }

    #[instrument(skip(self), fields(server_id = %server, user_id = %member, role_id = %role_id))]
    async fn revoke_role(
        &self,
        server: ServerId,
        member: UserId,
        role_id: RoleId,
    ) -> PlatformResult<()> {
        self.http
            .remove_member_role(guild(server)?, user(member)?, role(role_id)?, Some(AUDIT_REASON))
            .await
            .map_err(api_error("members.remove_role"))
    }

    #[instrument(skip(self), fields(user_id = %account))]
    async fn is_bot(&self, account: UserId) -> PlatformResult<bool> {
        let found = self
            .http
            .get_user(user(account)?)
            .await
            .map_err(api_error("users.get"))?;
        Ok(found.bot)
    }

    #[instrument(skip(self, content), fields(user_id = %recipient))]
    async fn send_direct_message(&self, recipient: UserId, content: &str) -> PlatformResult<()> {
        let dm = user(recipient)?
            .create_dm_channel(self.http.as_ref())
            .await
            .map_err(api_error("users.create_dm"))?;
        dm.id
            .send_message(self.http.as_ref(), CreateMessage::new().content(content))
            .await
            .map_err(api_error("messages.send_dm"))?;
        Ok(())
    }

    #[instrument(skip(self), fields(server_id = %server, channel_id = %channel_id))]
    async fn channel_in_server(&self, server: ServerId, channel_id: ChannelId) -> PlatformResult<bool> {
        let wanted = channel(channel_id)?;
        let channels = self
            .http
            .get_channels(guild(server)?)
            .await
            .map_err(api_error("channels.list"))?;
        Ok(channels.iter().any(|c| c.id == wanted))
    }

    #[instrument(skip(self, content), fields(channel_id = %channel_id))]
    async fn post_message(&self, channel_id: ChannelId, content: &str) -> PlatformResult<MessageId> {
        let posted = channel(channel_id)?
            .send_message(self.http.as_ref(), CreateMessage::new().content(content))
            .await
            .map_err(api_error("messages.send"))?;
        Ok(MessageId::new(posted.id.get()))
    }

    #[instrument(skip(self), fields(channel_id = %channel_id, message_id = %message_id))]
    async fn fetch_message(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
    ) -> PlatformResult<MessageSnapshot> {
        let fetched = self
            .http
            .get_message(channel(channel_id)?, message(message_id)?)
            .await
            .map_err(api_error("messages.get"))?;

        let reactions = fetched
            .reactions
            .iter()
            .filter_map(|r| {
                emoji_from_reaction(&r.reaction_type).map(|emoji| ReactionSnapshot {
                    emoji,
                    count: r.count,
                    me: r.me,
                })
            })
            .collect();

        Ok(MessageSnapshot {
            content: fetched.content,
            reactions,
        })
    }

    #[instrument(skip(self, content), fields(channel_id = %channel_id, message_id = %message_id))]
    async fn edit_message(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        content: &str,
    ) -> PlatformResult<()> {
        channel(channel_id)?
            .edit_message(
                self.http.as_ref(),
                message(message_id)?,
                EditMessage::new().content(content),
            )
            .await
            .map_err(api_error("messages.edit"))?;
        Ok(())
    }

    #[instrument(skip(self), fields(channel_id = %channel_id, message_id = %message_id, emoji = %emoji))]
    async fn add_reaction(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        emoji: &Emoji,
    ) -> PlatformResult<()> {
        self.http
            .create_reaction(channel(channel_id)?, message(message_id)?, &reaction_type(emoji)?)
            .await
            .map_err(api_error("reactions.add"))
    }

    #[instrument(skip(self), fields(channel_id = %channel_id, message_id = %message_id, emoji = %emoji))]
    async fn remove_own_reaction(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        emoji: &Emoji,
    ) -> PlatformResult<()> {
        self.http
            .delete_reaction_me(channel(channel_id)?, message(message_id)?, &reaction_type(emoji)?)
            .await
            .map_err(api_error("reactions.remove_own"))
    }

    fn platform_name(&self) -> &str {
        "discord"
    }
}
