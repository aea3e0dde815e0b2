//! Grants and revokes roles in response to reactions.

use crate::{RolePlatform, RoleProvisioner};
use reactrole_core::{ReactionEvent, ReactionKind, RoleHandle, RoleName, UserId};
use reactrole_error::PlatformError;
use reactrole_storage::MappingStore;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// Why a reaction event was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum DiscardReason {
    /// The server has no reaction-role message
    #[display("server has no role message")]
    NoRoleMessage,
    /// The reaction is on some other message
    #[display("not the role message")]
    MessageMismatch,
    /// The emoji is not mapped to a role
    #[display("emoji not mapped")]
    UnmappedEmoji,
    /// The reacting user is a bot, including this one
    #[display("reaction by a bot")]
    BotActor,
}

/// What handling a reaction event did.
#[derive(Debug, Clone)]
pub enum GrantOutcome {
    /// The event did not concern a role
    Discarded(DiscardReason),
    /// The role was granted, creating it if needed
    Granted(RoleHandle),
    /// Resolving or granting the role failed
    GrantFailed {
        /// Mapped role name
        role: RoleName,
        /// Underlying failure
        error: PlatformError,
    },
    /// The role was revoked
    Revoked(RoleHandle),
    /// Revoking the role failed
    RevokeFailed {
        /// Role that was being revoked
        role: RoleHandle,
        /// Underlying failure
        error: PlatformError,
    },
    /// The mapped role does not exist, so there was nothing to revoke
    RoleMissing(RoleName),
}

/// Turns reactions on reaction-role messages into role changes.
///
/// Adding a reaction creates the mapped role when it is missing; removing a
/// reaction never creates one. Each change is followed by a best-effort
/// direct message to the user.
#[derive(Clone)]
pub struct RoleGrantService {
    store: Arc<MappingStore>,
    platform: Arc<dyn RolePlatform>,
    provisioner: RoleProvisioner,
}

impl RoleGrantService {
    /// Create a grant service.
    pub fn new(store: Arc<MappingStore>, platform: Arc<dyn RolePlatform>) -> Self {
        Self {
            provisioner: RoleProvisioner::new(Arc::clone(&platform)),
            store,
            platform,
        }
    }

    /// Handle a reaction event.
    ///
    /// Events not on the server's reaction-role message or with an unmapped
    /// emoji are discarded without any platform call. Bot accounts are
    /// discarded next; the user is only looked up when the event does not
    /// already say whether it came from a bot.
    #[instrument(
        skip_all,
        fields(
            kind = %kind,
            server_id = %event.server_id(),
            message_id = %event.message_id(),
            emoji = %event.emoji(),
            user_id = %event.user_id()
        )
    )]
    pub async fn handle(&self, kind: ReactionKind, event: &ReactionEvent) -> GrantOutcome {
        let role = match self.mapped_role(event).await {
            Ok(role) => role,
            Err(reason) => {
                debug!(%reason, "Discarding reaction");
                return GrantOutcome::Discarded(reason);
            }
        };

        if self.is_bot(event).await {
            debug!(reason = %DiscardReason::BotActor, "Discarding reaction");
            return GrantOutcome::Discarded(DiscardReason::BotActor);
        }

        match kind {
            ReactionKind::Added => self.grant(event, role).await,
            ReactionKind::Removed => self.revoke(event, role).await,
        }
    }

    /// Resolve the role an event refers to.
    ///
    /// Runs under the server lock so it never observes a command halfway
    /// through. The lock is released before any platform call.
    async fn mapped_role(&self, event: &ReactionEvent) -> Result<RoleName, DiscardReason> {
        let server = *event.server_id();
        let _guard = self.store.lock_server(server).await;

        let message = self
            .store
            .message_ref(server)
            .await
            .ok_or(DiscardReason::NoRoleMessage)?;
        if message.message_id != *event.message_id() {
            return Err(DiscardReason::MessageMismatch);
        }

        self.store
            .get(server)
            .await
            .get(event.emoji())
            .cloned()
            .ok_or(DiscardReason::UnmappedEmoji)
    }

    async fn is_bot(&self, event: &ReactionEvent) -> bool {
        if let Some(known) = event.user_is_bot() {
            return known;
        }
        match self.platform.is_bot(*event.user_id()).await {
            Ok(is_bot) => is_bot,
            Err(e) => {
                debug!(error = %e, "User lookup failed, assuming human");
                false
            }
        }
    }

    async fn grant(&self, event: &ReactionEvent, role_name: RoleName) -> GrantOutcome {
        let server = *event.server_id();
        let user = *event.user_id();

        let result = async {
            let role = self.provisioner.ensure_role(server, &role_name).await?;
            self.platform.grant_role(server, user, role.id).await?;
            Ok::<_, PlatformError>(role)
        }
        .await;

        match result {
            Ok(role) => {
                info!(role = %role.name, role_id = %role.id, "Granted role");
                self.notify(user, format!("You've been granted the {role_name} role!"))
                    .await;
                GrantOutcome::Granted(role)
            }
            Err(e) => {
                error!(role = %role_name, error = %e, "Failed to grant role");
                self.notify(
                    user,
                    format!("There was an error granting the {role_name} role."),
                )
                .await;
                GrantOutcome::GrantFailed {
                    role: role_name,
                    error: e,
                }
            }
        }
    }

    async fn revoke(&self, event: &ReactionEvent, role_name: RoleName) -> GrantOutcome {
        let server = *event.server_id();
        let user = *event.user_id();

        let role = match self.provisioner.find_role(server, &role_name).await {
            Ok(Some(role)) => role,
            Ok(None) => {
                warn!(role = %role_name, "Mapped role does not exist, nothing to revoke");
                return GrantOutcome::RoleMissing(role_name);
            }
            Err(e) => {
                warn!(role = %role_name, error = %e, "Role lookup failed, nothing revoked");
                return GrantOutcome::RoleMissing(role_name);
            }
        };

        match self.platform.revoke_role(server, user, role.id).await {
            Ok(()) => {
                info!(role = %role.name, role_id = %role.id, "Revoked role");
                self.notify(user, format!("You've been removed from the {role_name} role."))
                    .await;
                GrantOutcome::Revoked(role)
            }
            Err(e) => {
                error!(role = %role.name, error = %e, "Failed to revoke role");
                GrantOutcome::RevokeFailed { role, error: e }
            }
        }
    }

    /// Direct messages are best-effort; users may have them disabled.
    async fn notify(&self, user: UserId, content: String) {
        if let Err(e) = self.platform.send_direct_message(user, &content).await {
            warn!(user_id = %user, error = %e, "Failed to send direct message");
        }
    }
}
