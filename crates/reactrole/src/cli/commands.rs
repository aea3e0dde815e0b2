//! CLI command definitions.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Reactrole - grant Discord roles to members who react to a message
#[derive(Parser, Debug)]
#[command(name = "reactrole")]
#[command(about = "Grant Discord roles to members who react to a message", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file layered over the defaults
    #[arg(long, global = true, env = "REACTROLE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Data file, overriding the configured one
    #[arg(long, global = true)]
    pub data_file: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Connect to Discord and serve reaction roles until interrupted
    Run {
        /// Discord bot token
        #[arg(long, env = "DISCORD_BOT_TOKEN", hide_env_values = true)]
        token: String,
    },

    /// Print the persisted mappings and role messages per server
    Show {
        /// Output format
        #[arg(long, default_value = "human")]
        format: OutputFormat,
    },
}

/// Output format for `show`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable listing
    Human,
    /// The persisted document as pretty JSON
    Json,
}
