//! The `run` command: serve reaction roles until interrupted.

use reactrole::{BotConfig, JsonFileBackend, MappingStore, ReactroleBot, ReactroleResult};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};

/// How long queued events may keep draining after the gateway closes.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

/// Open the store, connect to Discord and block until shutdown.
///
/// Ctrl-C closes every shard, after which the dispatcher gets
/// [`SHUTDOWN_GRACE`] to finish queued events.
#[instrument(skip_all, fields(data_file = %config.data_file.display()))]
pub async fn run_bot(config: &BotConfig, token: &str) -> ReactroleResult<()> {
    let backend = Arc::new(JsonFileBackend::new(&config.data_file));
    let store = Arc::new(MappingStore::open(backend, config.corrupt_state).await?);

    let mut bot = ReactroleBot::new(
        token,
        store,
        config.event_queue_capacity,
        config.register_commands,
    )
    .await?;

    let shard_manager = bot.shard_manager();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Shutdown signal received, closing gateway");
                shard_manager.shutdown_all().await;
            }
            Err(e) => warn!(error = %e, "Failed to listen for shutdown signal"),
        }
    });

    let result = bot.start().await;
    bot.finish(SHUTDOWN_GRACE).await;
    info!("Bot stopped");
    result
}
