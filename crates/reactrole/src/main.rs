//! Reactrole CLI binary.
//!
//! - `run` connects to Discord and serves reaction roles
//! - `show` prints the persisted mappings without connecting

use clap::Parser;
use reactrole::{BotConfig, ObservabilityConfig, init_observability};

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, run_bot, show_state};

    // Load .env before clap reads DISCORD_BOT_TOKEN
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = BotConfig::load(cli.config.as_deref())?;
    if let Some(data_file) = cli.data_file {
        config = config.with_data_file(data_file);
    }

    init_observability(&ObservabilityConfig::from(&config))?;

    match cli.command {
        Commands::Run { token } => {
            run_bot(&config, &token).await?;
        }

        Commands::Show { format } => {
            show_state(&config.data_file, format).await?;
        }
    }

    Ok(())
}
