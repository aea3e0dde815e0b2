//! Serenity event handler feeding the event queue.

use super::conversions::{command_definitions, emoji_from_reaction, invocation_from_interaction};
use crate::{CommandReply, EventSender};
use reactrole_core::{ReactionEvent, ReactionEventBuilder, ReactionKind};
use serenity::all::{
    Command, CommandInteraction, Context, CreateInteractionResponse,
    CreateInteractionResponseFollowup, CreateInteractionResponseMessage, EditInteractionResponse,
    EventHandler, GatewayIntents, Interaction, Reaction, Ready,
};
use serenity::async_trait;
use serenity::model::id::UserId;
use std::sync::OnceLock;
use tracing::{debug, error, info, instrument, warn};

/// Event handler for the reaction-role bot.
///
/// Converts gateway events into [`crate::BotEvent`]s and hands them to the
/// dispatcher through the event queue. Nothing here touches the mapping.
pub struct ReactroleHandler {
    events: EventSender,
    register_commands: bool,
    bot_user: OnceLock<UserId>,
}

impl ReactroleHandler {
    /// Create a handler submitting to `events`. When `register_commands` is
    /// set, the slash commands are registered globally on ready.
    pub fn new(events: EventSender, register_commands: bool) -> Self {
        Self {
            events,
            register_commands,
            bot_user: OnceLock::new(),
        }
    }

    /// Gateway intents the bot needs.
    pub fn intents() -> GatewayIntents {
        GatewayIntents::GUILDS
            | GatewayIntents::GUILD_MESSAGES
            | GatewayIntents::GUILD_MESSAGE_REACTIONS
            | GatewayIntents::GUILD_MEMBERS
            | GatewayIntents::DIRECT_MESSAGES
    }

    /// Build a reaction event, or `None` for reactions outside a server or
    /// with an emoji that has no name.
    fn reaction_event(&self, reaction: &Reaction) -> Option<ReactionEvent> {
        let guild_id = reaction.guild_id?;
        let user_id = reaction.user_id?;
        let emoji = emoji_from_reaction(&reaction.emoji)?;

        // Only free signals here; the grant service looks the user up once
        // the event is known to concern a role
        let user_is_bot = if self.bot_user.get() == Some(&user_id) {
            Some(true)
        } else {
            reaction.member.as_ref().map(|member| member.user.bot)
        };

        ReactionEventBuilder::default()
            .server_id(guild_id.get())
            .channel_id(reaction.channel_id.get())
            .message_id(reaction.message_id.get())
            .emoji(emoji)
            .user_id(user_id.get())
            .user_is_bot(user_is_bot)
            .build()
            .map_err(|e| error!(error = %e, "Failed to build reaction event"))
            .ok()
    }

    async fn forward_reaction(&self, kind: ReactionKind, reaction: &Reaction) {
        match self.reaction_event(reaction) {
            Some(event) => {
                self.events.submit_reaction(kind, event).await;
            }
            None => debug!(%kind, "Ignoring reaction without a server or emoji name"),
        }
    }

    #[instrument(skip_all, fields(command = %command.data.name, user_id = %command.user.id))]
    async fn handle_command(&self, ctx: &Context, command: &CommandInteraction) {
        let invocation = match invocation_from_interaction(command) {
            Ok(invocation) => invocation,
            Err(e) => {
                warn!(error = %e, "Rejecting malformed command");
                let response = CreateInteractionResponse::Message(
                    CreateInteractionResponseMessage::new()
                        .content(e.user_message())
                        .ephemeral(true),
                );
                if let Err(e) = command.create_response(&ctx.http, response).await {
                    error!(error = %e, "Failed to send command response");
                }
                return;
            }
        };

        // Reconciling can outlast the interaction deadline, so acknowledge first
        if let Err(e) = command.defer(&ctx.http).await {
            error!(error = %e, "Failed to defer command");
            return;
        }

        let reply = match self.events.submit_command(invocation).await {
            Ok(reply) => reply,
            Err(e) => CommandReply::ephemeral(e.user_message()),
        };
        self.respond(ctx, command, reply).await;
    }

    /// Replace the deferred response. Ephemeral replies are sent as a
    /// follow-up because a deferred public response cannot turn private.
    async fn respond(&self, ctx: &Context, command: &CommandInteraction, reply: CommandReply) {
        let result = if reply.ephemeral {
            if let Err(e) = command.delete_response(&ctx.http).await {
                debug!(error = %e, "Failed to delete deferred response");
            }
            command
                .create_followup(
                    &ctx.http,
                    CreateInteractionResponseFollowup::new()
                        .content(reply.content)
                        .ephemeral(true),
                )
                .await
                .map(|_| ())
        } else {
            command
                .edit_response(&ctx.http, EditInteractionResponse::new().content(reply.content))
                .await
                .map(|_| ())
        };

        if let Err(e) = result {
            error!(error = %e, "Failed to send command reply");
        }
    }
}

#[async_trait]
impl EventHandler for ReactroleHandler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!(
            bot_name = %ready.user.name,
            bot_id = %ready.user.id,
            guild_count = ready.guilds.len(),
            "Discord bot connected"
        );
        if self.bot_user.set(ready.user.id).is_err() {
            debug!("Bot user already recorded");
        }

        if !self.register_commands {
            return;
        }
        match Command::set_global_commands(&ctx.http, command_definitions()).await {
            Ok(commands) => info!(count = commands.len(), "Registered slash commands"),
            Err(e) => error!(error = %e, "Failed to register slash commands"),
        }
    }

    async fn reaction_add(&self, _ctx: Context, reaction: Reaction) {
        self.forward_reaction(ReactionKind::Added, &reaction).await;
    }

    async fn reaction_remove(&self, _ctx: Context, reaction: Reaction) {
        self.forward_reaction(ReactionKind::Removed, &reaction).await;
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        if let Interaction::Command(command) = interaction {
            self.handle_command(&ctx, &command).await;
        }
    }
}
