//! Discord integration.
//!
//! Available with the `discord` feature, built on serenity.
//!
//! - **platform**: [`DiscordPlatform`], the [`crate::RolePlatform`] over serenity's HTTP client
//! - **handler**: [`ReactroleHandler`], turning gateway events into queued bot events
//! - **client**: [`ReactroleBot`], client setup and lifecycle
//! - **conversions**: emoji, reaction and slash command mapping

mod client;
mod conversions;
mod handler;
mod platform;

pub use client::ReactroleBot;
pub use conversions::{
    command_definitions, emoji_from_reaction, invocation_from_interaction, reaction_type,
};
pub use handler::ReactroleHandler;
pub use platform::DiscordPlatform;
