//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the reactrole binary.

mod commands;
mod run;
mod show;

pub use commands::{Cli, Commands, OutputFormat};
pub use run::run_bot;
pub use show::show_state;
