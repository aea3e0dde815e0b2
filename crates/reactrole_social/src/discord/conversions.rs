//! Conversions between serenity types and reactrole types.

use crate::{CommandInvocation, CommandName, RoleCommand};
use reactrole_core::{Emoji, ServerId, UserId};
use reactrole_error::{CommandError, CommandErrorKind, PlatformError, PlatformErrorKind, PlatformResult};
use serenity::all::{
    CommandInteraction, CommandOptionType, CreateCommand, CreateCommandOption, EmojiId,
    Permissions, ReactionType,
};
use std::str::FromStr;
use strum::IntoEnumIterator;

/// Emoji key for a reaction, `None` for reactions that carry no usable name.
///
/// Custom emoji become `name:id` (`a:name:id` when animated), matching
/// [`Emoji::parse`] on their markup.
pub fn emoji_from_reaction(reaction: &ReactionType) -> Option<Emoji> {
    match reaction {
        ReactionType::Unicode(value) => Some(Emoji::unicode(value.clone())),
        ReactionType::Custom { animated, id, name } => name.as_deref().map(|name| {
            if *animated {
                Emoji::animated(name, id.get())
            } else {
                Emoji::custom(name, id.get())
            }
        }),
        _ => None,
    }
}

/// Reaction type for an emoji key.
///
/// # Errors
///
/// Returns [`PlatformErrorKind::InvalidEmoji`] for a custom emoji with id 0.
pub fn reaction_type(emoji: &Emoji) -> PlatformResult<ReactionType> {
    match emoji.custom_parts() {
        Some((_, 0)) => Err(PlatformError::new(PlatformErrorKind::InvalidEmoji(
            emoji.to_string(),
        ))),
        Some((name, id)) => Ok(ReactionType::Custom {
            animated: emoji.is_animated(),
            id: EmojiId::new(id),
            name: Some(name.to_string()),
        }),
        None => Ok(ReactionType::Unicode(emoji.as_str().to_string())),
    }
}

/// Definitions of every slash command, restricted to administrators by default.
pub fn command_definitions() -> Vec<CreateCommand> {
    CommandName::iter()
        .map(|name| {
            name.options().iter().fold(
                CreateCommand::new(name.to_string())
                    .description(name.description())
                    .default_member_permissions(Permissions::ADMINISTRATOR),
                |command, (option, description)| {
                    command.add_option(
                        CreateCommandOption::new(CommandOptionType::String, *option, *description)
                            .required(true),
                    )
                },
            )
        })
        .collect()
}

/// Build an invocation from a slash command interaction.
///
/// # Errors
///
/// Returns error for an unknown command name or a missing string option.
pub fn invocation_from_interaction(
    command: &CommandInteraction,
) -> Result<CommandInvocation, CommandError> {
    let name = CommandName::from_str(&command.data.name).map_err(|_| {
        CommandError::new(CommandErrorKind::UnknownCommand(command.data.name.clone()))
    })?;

    let role_command = match name {
        CommandName::AddRole => RoleCommand::AddRole {
            emoji: string_option(command, "emoji")?,
            role_name: string_option(command, "role_name")?,
        },
        CommandName::RemoveRole => RoleCommand::RemoveRole {
            emoji: string_option(command, "emoji")?,
        },
        CommandName::ListRoles => RoleCommand::ListRoles,
        CommandName::SetChannel => RoleCommand::SetChannel {
            channel_id: string_option(command, "channel_id")?,
        },
    };

    let is_administrator = command
        .member
        .as_ref()
        .and_then(|member| member.permissions)
        .is_some_and(|permissions| permissions.administrator());

    Ok(CommandInvocation {
        server_id: command.guild_id.map(|guild| ServerId::new(guild.get())),
        user_id: UserId::new(command.user.id.get()),
        is_administrator,
        command: role_command,
    })
}

fn string_option(command: &CommandInteraction, name: &str) -> Result<String, CommandError> {
    command
        .data
        .options
        .iter()
        .find(|option| option.name == name)
        .and_then(|option| option.value.as_str())
        .map(str::to_string)
        .ok_or_else(|| {
            CommandError::new(CommandErrorKind::InvalidArgument {
                argument: name.to_string(),
                reason: "a text value is required".to_string(),
            })
        })
}
