//! Reactrole: a Discord bot that grants roles to members who react to a message.
//!
//! Administrators map emoji to role names per server with slash commands and
//! pick a channel for the role-selection message. The bot keeps that message
//! in sync with the mapping and grants or revokes roles as members react.
//!
//! # Quick Start
//!
//! ```no_run
//! use reactrole::{BotConfig, CorruptStatePolicy, JsonFileBackend, MappingStore};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = BotConfig::load(None)?;
//! let backend = Arc::new(JsonFileBackend::new(&config.data_file));
//! let store = Arc::new(MappingStore::open(backend, config.corrupt_state).await?);
//! # Ok(())
//! # }
//! ```
//!
//! # Feature Flags
//!
//! - `discord` (default) - serenity client and the `reactrole` binary
//!
//! # Architecture
//!
//! - `reactrole-core` - identifiers, emoji, mappings and persisted state
//! - `reactrole-error` - error types
//! - `reactrole-storage` - the persisted mapping store
//! - `reactrole-social` - role provisioning, reconciliation, grants, commands and Discord glue
//!
//! This crate (`reactrole`) re-exports everything for convenience and adds
//! configuration and logging setup.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod observability;

pub use config::BotConfig;
pub use observability::{ObservabilityConfig, init_observability};

pub use reactrole_core::*;
pub use reactrole_error::*;
pub use reactrole_social::*;
pub use reactrole_storage::*;
