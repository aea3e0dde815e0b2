//! Reaction-role logic and platform integration.
//!
//! Everything that talks to the chat platform lives here:
//! - [`RolePlatform`] - the outbound calls the bot makes, implemented for
//!   Discord and by test fakes
//! - [`RoleProvisioner`] - role lookup by name, creating on demand
//! - [`MessageReconciler`] - keeps a reaction-role message's body and the
//!   bot's reactions in line with the mapping
//! - [`RoleGrantService`] - grants and revokes roles for reactions
//! - [`CommandHandlers`] - the administrative slash commands
//! - [`Dispatcher`] - applies queued events one at a time
//!
//! # Platform Support
//!
//! The Discord adapter is behind the `discord` feature (on by default).

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod commands;
mod events;
mod grant;
mod platform;
mod provisioner;
mod reconciler;

#[cfg(feature = "discord")]
mod discord;

pub use commands::{CommandHandlers, CommandInvocation, CommandName, CommandReply, RoleCommand};
pub use events::{BotEvent, Dispatcher, EventReceiver, EventSender, event_queue};
pub use grant::{DiscardReason, GrantOutcome, RoleGrantService};
pub use platform::{MessageSnapshot, ReactionSnapshot, RolePlatform};
pub use provisioner::RoleProvisioner;
pub use reconciler::{
    MESSAGE_HEADER, MessageReconciler, ReactionAction, ReactionOutcome, ReactionPlan,
    ReconcileReport, render,
};

#[cfg(feature = "discord")]
pub use discord::{
    DiscordPlatform, ReactroleBot, ReactroleHandler, command_definitions, emoji_from_reaction,
    invocation_from_interaction, reaction_type,
};
