//! Ordered event queue between the platform adapter and the services.

use crate::{CommandHandlers, CommandInvocation, CommandReply, RoleGrantService, RolePlatform};
use reactrole_core::{ReactionEvent, ReactionKind};
use reactrole_error::{CommandError, CommandErrorKind};
use reactrole_storage::MappingStore;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, instrument, warn};

/// An inbound event waiting to be processed.
#[derive(Debug)]
pub enum BotEvent {
    /// An administrative command; the reply goes back through `reply`
    Command {
        /// The command
        invocation: CommandInvocation,
        /// Where to send the reply
        reply: oneshot::Sender<CommandReply>,
    },
    /// A user reacted to a message
    ReactionAdded(ReactionEvent),
    /// A user took a reaction back
    ReactionRemoved(ReactionEvent),
}

/// Create a bounded event queue.
///
/// Senders wait when `capacity` events are pending. A capacity of zero is
/// treated as one.
pub fn event_queue(capacity: usize) -> (EventSender, EventReceiver) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (EventSender { tx }, EventReceiver { rx })
}

/// Producer side of the event queue. Cheap to clone.
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: mpsc::Sender<BotEvent>,
}

impl EventSender {
    /// Queue a command and wait for its reply.
    ///
    /// # Errors
    ///
    /// Returns [`CommandErrorKind::QueueClosed`] if the dispatcher has
    /// stopped.
    pub async fn submit_command(
        &self,
        invocation: CommandInvocation,
    ) -> Result<CommandReply, CommandError> {
        let (reply, response) = oneshot::channel();
        self.tx
            .send(BotEvent::Command { invocation, reply })
            .await
            .map_err(|_| CommandError::new(CommandErrorKind::QueueClosed))?;
        response
            .await
            .map_err(|_| CommandError::new(CommandErrorKind::QueueClosed))
    }

    /// Queue a reaction event. Returns whether it was accepted.
    pub async fn submit_reaction(&self, kind: ReactionKind, event: ReactionEvent) -> bool {
        let event = match kind {
            ReactionKind::Added => BotEvent::ReactionAdded(event),
            ReactionKind::Removed => BotEvent::ReactionRemoved(event),
        };
        match self.tx.send(event).await {
            Ok(()) => true,
            Err(_) => {
                warn!(%kind, "Event queue closed, dropping reaction");
                false
            }
        }
    }
}

/// Consumer side of the event queue.
#[derive(Debug)]
pub struct EventReceiver {
    rx: mpsc::Receiver<BotEvent>,
}

impl EventReceiver {
    /// Next event, or `None` once every sender is gone and the queue is drained.
    pub async fn recv(&mut self) -> Option<BotEvent> {
        self.rx.recv().await
    }
}

/// Processes queued events one at a time, in arrival order.
///
/// Each event runs to completion before the next one starts, so a reaction
/// queued after a command always sees that command's effects.
pub struct Dispatcher {
    receiver: EventReceiver,
    commands: CommandHandlers,
    grants: RoleGrantService,
}

impl Dispatcher {
    /// Create a dispatcher wired to `store` and `platform`.
    pub fn new(
        receiver: EventReceiver,
        store: Arc<MappingStore>,
        platform: Arc<dyn RolePlatform>,
    ) -> Self {
        Self {
            receiver,
            commands: CommandHandlers::new(Arc::clone(&store), Arc::clone(&platform)),
            grants: RoleGrantService::new(store, platform),
        }
    }

    /// Run until every sender is dropped. Returns the number of events
    /// processed.
    #[instrument(skip_all)]
    pub async fn run(mut self) -> usize {
        info!("Dispatcher started");
        let mut processed = 0;
        while let Some(event) = self.receiver.recv().await {
            self.dispatch(event).await;
            processed += 1;
        }
        info!(processed, "Event queue closed, dispatcher stopping");
        processed
    }

    async fn dispatch(&self, event: BotEvent) {
        match event {
            BotEvent::Command { invocation, reply } => {
                let response = self.commands.execute(&invocation).await;
                if reply.send(response).is_err() {
                    debug!("Command caller went away before the reply");
                }
            }
            BotEvent::ReactionAdded(event) => {
                let outcome = self.grants.handle(ReactionKind::Added, &event).await;
                debug!(?outcome, "Reaction handled");
            }
            BotEvent::ReactionRemoved(event) => {
                let outcome = self.grants.handle(ReactionKind::Removed, &event).await;
                debug!(?outcome, "Reaction handled");
            }
        }
    }
}
