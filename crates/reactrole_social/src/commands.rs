//! Administrative slash commands.

use crate::{MessageReconciler, RolePlatform, RoleProvisioner, render};
use reactrole_core::{ChannelId, Emoji, RoleMessage, RoleName, ServerId, TokenError, UserId};
use reactrole_error::{CommandError, CommandErrorKind, ReactroleError, ReactroleErrorKind};
use reactrole_storage::MappingStore;
use std::fmt::Write as _;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Names of the commands the bot registers.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum CommandName {
    /// Map an emoji to a role
    AddRole,
    /// Unmap an emoji
    RemoveRole,
    /// Show the current mappings
    ListRoles,
    /// Post the reaction-role message
    SetChannel,
}

impl CommandName {
    /// Short description shown in the command picker.
    pub fn description(self) -> &'static str {
        match self {
            Self::AddRole => "Add a role to the reaction roles list",
            Self::RemoveRole => "Remove a role from the reaction roles list",
            Self::ListRoles => "List all reaction roles",
            Self::SetChannel => "Set the channel for the role selection message",
        }
    }

    /// Required string options as `(name, description)` pairs.
    pub fn options(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::AddRole => &[
                ("emoji", "Emoji for the role"),
                ("role_name", "Name of the role"),
            ],
            Self::RemoveRole => &[("emoji", "Emoji of the role to remove")],
            Self::ListRoles => &[],
            Self::SetChannel => &[("channel_id", "ID of the channel")],
        }
    }
}

/// A parsed command with its raw arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleCommand {
    /// Map `emoji` to `role_name`
    AddRole {
        /// Raw emoji argument
        emoji: String,
        /// Raw role name argument
        role_name: String,
    },
    /// Unmap `emoji`
    RemoveRole {
        /// Raw emoji argument
        emoji: String,
    },
    /// Show the mappings
    ListRoles,
    /// Post the reaction-role message in `channel_id`
    SetChannel {
        /// Raw channel argument, an id or a channel mention
        channel_id: String,
    },
}

impl RoleCommand {
    /// Name of the command.
    pub fn name(&self) -> CommandName {
        match self {
            Self::AddRole { .. } => CommandName::AddRole,
            Self::RemoveRole { .. } => CommandName::RemoveRole,
            Self::ListRoles => CommandName::ListRoles,
            Self::SetChannel { .. } => CommandName::SetChannel,
        }
    }
}

/// A command together with who invoked it and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInvocation {
    /// Server the command was used in, `None` in direct messages
    pub server_id: Option<ServerId>,
    /// Invoking user
    pub user_id: UserId,
    /// Whether the invoker holds the administrator permission
    pub is_administrator: bool,
    /// The command
    pub command: RoleCommand,
}

/// Text sent back to the invoking administrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandReply {
    /// Reply text
    pub content: String,
    /// Whether only the invoker should see it
    pub ephemeral: bool,
}

impl CommandReply {
    /// A reply visible to the channel.
    pub fn public(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ephemeral: false,
        }
    }

    /// A reply only the invoker sees.
    pub fn ephemeral(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ephemeral: true,
        }
    }
}

/// Executes administrative commands.
///
/// Every command needs the administrator permission and a server. Commands
/// that change state hold the server lock from validation until the reply
/// is built, so reactions on the same server never see a half-applied
/// change.
#[derive(Clone)]
pub struct CommandHandlers {
    store: Arc<MappingStore>,
    platform: Arc<dyn RolePlatform>,
    provisioner: RoleProvisioner,
    reconciler: MessageReconciler,
}

impl CommandHandlers {
    /// Create command handlers.
    pub fn new(store: Arc<MappingStore>, platform: Arc<dyn RolePlatform>) -> Self {
        Self {
            provisioner: RoleProvisioner::new(Arc::clone(&platform)),
            reconciler: MessageReconciler::new(Arc::clone(&platform)),
            store,
            platform,
        }
    }

    /// Execute a command and build the reply. Rejections become ephemeral
    /// replies carrying the reason.
    #[instrument(
        skip_all,
        fields(
            command = %invocation.command.name(),
            server_id = ?invocation.server_id,
            user_id = %invocation.user_id
        )
    )]
    pub async fn execute(&self, invocation: &CommandInvocation) -> CommandReply {
        match self.try_execute(invocation).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %e, "Command rejected");
                CommandReply::ephemeral(e.user_message())
            }
        }
    }

    async fn try_execute(&self, invocation: &CommandInvocation) -> Result<CommandReply, CommandError> {
        if !invocation.is_administrator {
            return Err(CommandError::new(CommandErrorKind::NotAdministrator));
        }
        let server = invocation
            .server_id
            .ok_or_else(|| CommandError::new(CommandErrorKind::NoServer))?;

        match &invocation.command {
            RoleCommand::AddRole { emoji, role_name } => {
                self.add_role(server, emoji, role_name).await
            }
            RoleCommand::RemoveRole { emoji } => self.remove_role(server, emoji).await,
            RoleCommand::ListRoles => Ok(self.list_roles(server).await),
            RoleCommand::SetChannel { channel_id } => self.set_channel(server, channel_id).await,
        }
    }

    async fn add_role(
        &self,
        server: ServerId,
        raw_emoji: &str,
        raw_role: &str,
    ) -> Result<CommandReply, CommandError> {
        let emoji = Emoji::parse(raw_emoji).map_err(invalid_argument)?;
        let role_name = RoleName::parse(raw_role).map_err(invalid_argument)?;

        let _guard = self.store.lock_server(server).await;
        let role = self
            .provisioner
            .ensure_role(server, &role_name)
            .await
            .map_err(|e| {
                CommandError::new(CommandErrorKind::RoleProvisioning {
                    role: role_name.to_string(),
                    reason: e.kind.to_string(),
                })
            })?;
        debug!(role_id = %role.id, "Role resolved");

        self.store
            .set(server, emoji.clone(), role_name.clone())
            .await
            .map_err(persistence)?;
        info!(emoji = %emoji, role = %role_name, "Role mapping added");

        let mut content = format!("Role mapping added: {} -> {}", emoji.markup(), role_name);
        content.push_str(&self.refresh_role_message(server).await);
        Ok(CommandReply::public(content))
    }

    async fn remove_role(&self, server: ServerId, raw_emoji: &str) -> Result<CommandReply, CommandError> {
        let emoji = Emoji::parse(raw_emoji).map_err(invalid_argument)?;

        let _guard = self.store.lock_server(server).await;
        if !self.store.remove(server, &emoji).await.map_err(persistence)? {
            return Ok(CommandReply::public("Role mapping not found."));
        }
        info!(emoji = %emoji, "Role mapping removed");

        let mut content = format!("Role mapping removed for emoji: {}", emoji.markup());
        content.push_str(&self.refresh_role_message(server).await);
        Ok(CommandReply::public(content))
    }

    async fn list_roles(&self, server: ServerId) -> CommandReply {
        let mapping = self.store.get(server).await;
        if mapping.is_empty() {
            return CommandReply::public("No role mappings set up.");
        }

        let mut content = String::from("Current role mappings:\n");
        for (emoji, role) in mapping.iter() {
            let _ = writeln!(content, "{} -> {}", emoji.markup(), role);
        }
        CommandReply::public(content)
    }

    async fn set_channel(&self, server: ServerId, raw_channel: &str) -> Result<CommandReply, CommandError> {
        let channel_not_found =
            || CommandError::new(CommandErrorKind::ChannelNotFound(raw_channel.to_string()));
        let channel = parse_channel(raw_channel).ok_or_else(channel_not_found)?;

        let _guard = self.store.lock_server(server).await;
        match self.platform.channel_in_server(server, channel).await {
            Ok(true) => {}
            Ok(false) => return Err(channel_not_found()),
            Err(e) => {
                warn!(channel_id = %channel, error = %e, "Channel lookup failed");
                return Err(CommandError::new(CommandErrorKind::ChannelLookup(
                    e.kind.to_string(),
                )));
            }
        }

        let mapping = self.store.get(server).await;
        if mapping.is_empty() {
            return Err(CommandError::new(CommandErrorKind::NoMappings));
        }

        let message_id = self
            .platform
            .post_message(channel, &render(&mapping))
            .await
            .map_err(|e| CommandError::new(CommandErrorKind::MessageCreation(e.kind.to_string())))?;
        let outcomes = self
            .reconciler
            .seed_reactions(channel, message_id, &mapping)
            .await;

        self.store
            .set_message_ref(server, RoleMessage::new(channel, message_id))
            .await
            .map_err(persistence)?;
        info!(channel_id = %channel, message_id = %message_id, "Role selection message created");

        let mut content = format!("Role selection message created in <#{channel}>.");
        content.push_str(&reaction_failure_line(
            outcomes.iter().filter(|o| !o.is_ok()).count(),
        ));
        Ok(CommandReply::public(content))
    }

    /// Reconcile the server's role message, if any, with the current mapping.
    ///
    /// Returns a warning suffix for the reply, empty when everything applied.
    async fn refresh_role_message(&self, server: ServerId) -> String {
        let Some(message) = self.store.message_ref(server).await else {
            return String::new();
        };
        let mapping = self.store.get(server).await;

        match self.reconciler.reconcile(message, &mapping).await {
            Ok(report) if report.is_clean() => String::new(),
            Ok(report) => {
                let mut warning = reaction_failure_line(report.failures().count());
                if report.body_error().is_some() {
                    warning.push_str(
                        "\nWarning: the role selection message text could not be updated. \
                         Run /setchannel to post a fresh one.",
                    );
                }
                warning
            }
            Err(e) => {
                warn!(error = %e, "Role message could not be reconciled");
                "\nWarning: the role selection message could not be updated. \
                 Run /setchannel to post a fresh one."
                    .to_string()
            }
        }
    }
}

/// Accepts a bare id or a `<#id>` channel mention. Zero is never a valid id.
fn parse_channel(raw: &str) -> Option<ChannelId> {
    let trimmed = raw.trim();
    let inner = trimmed
        .strip_prefix("<#")
        .and_then(|rest| rest.strip_suffix('>'))
        .unwrap_or(trimmed);
    inner.parse::<ChannelId>().ok().filter(|id| id.get() != 0)
}

fn reaction_failure_line(failed: usize) -> String {
    if failed == 0 {
        return String::new();
    }
    format!("\nWarning: {failed} reaction update(s) failed; see logs.")
}

fn invalid_argument(e: TokenError) -> CommandError {
    CommandError::new(CommandErrorKind::InvalidArgument {
        argument: e.what.to_string(),
        reason: e.reason.to_string(),
    })
}

fn persistence(e: ReactroleError) -> CommandError {
    let reason = match e.kind() {
        ReactroleErrorKind::Storage(storage) => storage.kind.to_string(),
        other => other.to_string(),
    };
    CommandError::new(CommandErrorKind::Persistence(reason))
}
