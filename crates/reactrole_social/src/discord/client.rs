//! Discord bot client setup and lifecycle management.

use super::{DiscordPlatform, ReactroleHandler};
use crate::{Dispatcher, RolePlatform, event_queue};
use reactrole_error::{PlatformError, PlatformErrorKind, ReactroleResult};
use reactrole_storage::MappingStore;
use serenity::Client;
use serenity::gateway::ShardManager;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{info, instrument, warn};

/// Main Discord bot client.
///
/// Owns the serenity client and the dispatcher task that applies queued
/// events to the mapping store.
///
/// # Example
/// ```no_run
/// use reactrole_social::ReactroleBot;
/// use reactrole_storage::{CorruptStatePolicy, JsonFileBackend, MappingStore};
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let token = std::env::var("DISCORD_BOT_TOKEN")?;
///     let backend = Arc::new(JsonFileBackend::new("role_data.json"));
///     let store = Arc::new(MappingStore::open(backend, CorruptStatePolicy::Reset).await?);
///
///     let mut bot = ReactroleBot::new(&token, store, 64, true).await?;
///     bot.start().await?;
///     Ok(())
/// }
/// ```
pub struct ReactroleBot {
    client: Client,
    dispatcher: Option<Dispatcher>,
    dispatcher_task: Option<JoinHandle<usize>>,
}

impl ReactroleBot {
    /// Create the bot.
    ///
    /// # Arguments
    /// * `token` - Discord bot token
    /// * `store` - Mapping store shared with the dispatcher
    /// * `queue_capacity` - Pending events allowed before the gateway waits
    /// * `register_commands` - Register the slash commands on ready
    ///
    /// # Errors
    /// Returns an error if the serenity client fails to initialize.
    #[instrument(skip(token, store), fields(token_len = token.len()))]
    pub async fn new(
        token: &str,
        store: Arc<MappingStore>,
        queue_capacity: usize,
        register_commands: bool,
    ) -> ReactroleResult<Self> {
        info!("Initializing reaction role bot");

        let (sender, receiver) = event_queue(queue_capacity);
        let handler = ReactroleHandler::new(sender, register_commands);
        let intents = ReactroleHandler::intents();
        info!(?intents, "Building Serenity client");

        let client = Client::builder(token, intents)
            .event_handler(handler)
            .await
            .map_err(|e| {
                PlatformError::new(PlatformErrorKind::ConnectionFailed(format!(
                    "Failed to build client: {}",
                    e
                )))
            })?;

        let platform: Arc<dyn RolePlatform> =
            Arc::new(DiscordPlatform::with_http_client(Arc::clone(&client.http)));
        let dispatcher = Dispatcher::new(receiver, store, platform);

        Ok(Self {
            client,
            dispatcher: Some(dispatcher),
            dispatcher_task: None,
        })
    }

    /// Start the dispatcher and connect to the gateway.
    ///
    /// Blocks until the client shuts down.
    ///
    /// # Errors
    /// Returns an error if the client fails to start or hits a fatal error.
    #[instrument(skip(self))]
    pub async fn start(&mut self) -> ReactroleResult<()> {
        if let Some(dispatcher) = self.dispatcher.take() {
            self.dispatcher_task = Some(tokio::spawn(dispatcher.run()));
        }

        info!("Starting Discord bot");
        self.client.start().await.map_err(|e| {
            PlatformError::new(PlatformErrorKind::ConnectionFailed(format!(
                "Client error: {}",
                e
            )))
        })?;
        Ok(())
    }

    /// Shard manager, for shutting the gateway down from another task.
    pub fn shard_manager(&self) -> Arc<ShardManager> {
        Arc::clone(&self.client.shard_manager)
    }

    /// Wait up to `grace` for the dispatcher to drain once the gateway is down.
    ///
    /// The handler owns the last event sender, so the dispatcher only stops
    /// after the client has been dropped.
    pub async fn finish(self, grace: Duration) {
        let Self {
            client,
            dispatcher_task,
            ..
        } = self;
        drop(client);

        if let Some(task) = dispatcher_task {
            match tokio::time::timeout(grace, task).await {
                Ok(Ok(processed)) => info!(processed, "Dispatcher finished"),
                Ok(Err(e)) => warn!(error = %e, "Dispatcher task failed"),
                Err(_) => warn!("Dispatcher still busy at shutdown, abandoning queued events"),
            }
        }
    }
}
