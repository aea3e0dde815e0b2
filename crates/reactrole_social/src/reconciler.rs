//! Keeps a reaction-role message in line with its mapping.

use crate::{ReactionSnapshot, RolePlatform};
use derive_getters::Getters;
use reactrole_core::{ChannelId, Emoji, MessageId, RoleMapping, RoleMessage};
use reactrole_error::{PlatformError, ReactroleResult};
use std::collections::HashSet;
use std::fmt::Write as _;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// First line of every reaction-role message.
pub const MESSAGE_HEADER: &str = "React for roles:";

/// Render the body of a reaction-role message.
///
/// The header is followed by a blank line and one `{emoji} - {role}` line
/// per mapping entry, in mapping order.
pub fn render(mapping: &RoleMapping) -> String {
    let mut body = format!("{MESSAGE_HEADER}\n\n");
    for (emoji, role) in mapping.iter() {
        // Writing into a String cannot fail
        let _ = writeln!(body, "{} - {}", emoji.markup(), role);
    }
    body
}

/// Direction of a reaction change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ReactionAction {
    /// The bot reacted
    #[display("add")]
    Add,
    /// The bot withdrew its reaction
    #[display("remove")]
    Remove,
}

/// Result of one reaction change.
#[derive(Debug, Clone, Getters)]
pub struct ReactionOutcome {
    /// Emoji the change was for
    emoji: Emoji,
    /// What was attempted
    action: ReactionAction,
    /// Failure, if the platform call failed
    error: Option<PlatformError>,
}

impl ReactionOutcome {
    fn new(emoji: Emoji, action: ReactionAction, result: Result<(), PlatformError>) -> Self {
        Self {
            emoji,
            action,
            error: result.err(),
        }
    }

    /// Whether the change went through.
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Reaction changes needed to bring a message in line with a mapping.
///
/// `to_remove` holds the bot's own reactions whose emoji is no longer mapped,
/// in the order the message shows them. `to_add` holds mapped emoji that have
/// no reaction at all, in mapping order. Reactions from other users are
/// never touched; a mapped emoji that only other users reacted with is left
/// alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Getters)]
pub struct ReactionPlan {
    /// Own reactions to withdraw
    to_remove: Vec<Emoji>,
    /// Emoji to react with
    to_add: Vec<Emoji>,
}

impl ReactionPlan {
    /// Compare the current reactions with the mapping.
    pub fn diff(current: &[ReactionSnapshot], mapping: &RoleMapping) -> Self {
        let to_remove = current
            .iter()
            .filter(|reaction| reaction.me && !mapping.contains(&reaction.emoji))
            .map(|reaction| reaction.emoji.clone())
            .collect();

        let present: HashSet<&Emoji> = current.iter().map(|reaction| &reaction.emoji).collect();
        let to_add = mapping
            .emojis()
            .filter(|emoji| !present.contains(emoji))
            .cloned()
            .collect();

        Self { to_remove, to_add }
    }

    /// Whether nothing needs to change.
    pub fn is_empty(&self) -> bool {
        self.to_remove.is_empty() && self.to_add.is_empty()
    }
}

/// Summary of one reconciliation pass.
#[derive(Debug, Clone, Default, Getters)]
pub struct ReconcileReport {
    /// Whether the body was rewritten
    body_updated: bool,
    /// Failure of the body rewrite, if one was attempted and failed
    body_error: Option<PlatformError>,
    /// Every reaction change attempted, removals first
    outcomes: Vec<ReactionOutcome>,
}

impl ReconcileReport {
    /// Reaction changes that failed.
    pub fn failures(&self) -> impl Iterator<Item = &ReactionOutcome> {
        self.outcomes.iter().filter(|outcome| !outcome.is_ok())
    }

    /// Number of failed changes, counting a failed body rewrite.
    pub fn failure_count(&self) -> usize {
        self.failures().count() + usize::from(self.body_error.is_some())
    }

    /// Whether every attempted change succeeded.
    pub fn is_clean(&self) -> bool {
        self.failure_count() == 0
    }

    /// Number of platform mutations that went through.
    pub fn mutation_count(&self) -> usize {
        usize::from(self.body_updated) + self.outcomes.iter().filter(|o| o.is_ok()).count()
    }
}

/// Brings a reaction-role message's body and the bot's reactions in line
/// with a mapping.
///
/// A pass against a message that already matches makes no mutations, so
/// running it twice is the same as running it once.
#[derive(Clone)]
pub struct MessageReconciler {
    platform: Arc<dyn RolePlatform>,
}

impl MessageReconciler {
    /// Create a reconciler over `platform`.
    pub fn new(platform: Arc<dyn RolePlatform>) -> Self {
        Self { platform }
    }

    /// Reconcile an existing message with `mapping`.
    ///
    /// The body is rewritten only when it differs from [`render`]. Each
    /// reaction change is its own platform call; a failing call is recorded
    /// in the report and the remaining changes still run.
    ///
    /// # Errors
    ///
    /// Returns error if the message cannot be fetched. Nothing is changed in
    /// that case.
    #[instrument(
        skip(self, mapping),
        fields(
            platform = self.platform.platform_name(),
            channel_id = %message.channel_id,
            message_id = %message.message_id,
            mapped = mapping.len()
        )
    )]
    pub async fn reconcile(
        &self,
        message: RoleMessage,
        mapping: &RoleMapping,
    ) -> ReactroleResult<ReconcileReport> {
        let RoleMessage {
            channel_id,
            message_id,
        } = message;
        let snapshot = self.platform.fetch_message(channel_id, message_id).await?;
        let mut report = ReconcileReport::default();

        // Platforms trim trailing whitespace from stored content
        let body = render(mapping);
        if snapshot.content.trim_end() != body.trim_end() {
            match self.platform.edit_message(channel_id, message_id, &body).await {
                Ok(()) => {
                    debug!("Message body updated");
                    report.body_updated = true;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to update message body");
                    report.body_error = Some(e);
                }
            }
        }

        let plan = ReactionPlan::diff(&snapshot.reactions, mapping);
        debug!(
            to_remove = plan.to_remove.len(),
            to_add = plan.to_add.len(),
            "Reaction plan"
        );

        for emoji in plan.to_remove {
            let result = self
                .platform
                .remove_own_reaction(channel_id, message_id, &emoji)
                .await;
            report.outcomes.push(self.outcome(emoji, ReactionAction::Remove, result));
        }
        for emoji in plan.to_add {
            let result = self.platform.add_reaction(channel_id, message_id, &emoji).await;
            report.outcomes.push(self.outcome(emoji, ReactionAction::Add, result));
        }

        info!(
            body_updated = report.body_updated,
            mutations = report.mutation_count(),
            failures = report.failure_count(),
            "Reconciled role message"
        );
        Ok(report)
    }

    /// React with every mapped emoji on a freshly posted message.
    #[instrument(
        skip(self, mapping),
        fields(
            platform = self.platform.platform_name(),
            channel_id = %channel,
            message_id = %message,
            mapped = mapping.len()
        )
    )]
    pub async fn seed_reactions(
        &self,
        channel: ChannelId,
        message: MessageId,
        mapping: &RoleMapping,
    ) -> Vec<ReactionOutcome> {
        let mut outcomes = Vec::with_capacity(mapping.len());
        for emoji in mapping.emojis() {
            let result = self.platform.add_reaction(channel, message, emoji).await;
            outcomes.push(self.outcome(emoji.clone(), ReactionAction::Add, result));
        }
        outcomes
    }

    fn outcome(
        &self,
        emoji: Emoji,
        action: ReactionAction,
        result: Result<(), PlatformError>,
    ) -> ReactionOutcome {
        if let Err(e) = &result {
            warn!(emoji = %emoji, %action, error = %e, "Reaction update failed");
        }
        ReactionOutcome::new(emoji, action, result)
    }
}
