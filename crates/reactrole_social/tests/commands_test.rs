//! Tests for the administrative commands.

mod test_utils;

use reactrole_core::{ChannelId, Emoji, MessageId, RoleMessage, RoleName, ServerId, UserId};
use reactrole_social::{CommandHandlers, CommandInvocation, CommandName, RoleCommand, render};
use reactrole_storage::{CorruptStatePolicy, MappingStore, MemoryBackend};
use std::sync::Arc;
use test_utils::{Call, MockPlatform, memory_store};

const SERVER: ServerId = ServerId::new(1);
const CHANNEL: ChannelId = ChannelId::new(10);
const ADMIN: UserId = UserId::new(7);

async fn setup() -> (Arc<MappingStore>, Arc<MockPlatform>, CommandHandlers) {
    let store = memory_store().await;
    let platform = Arc::new(MockPlatform::new());
    platform.with_channel(SERVER, CHANNEL);
    let handlers = CommandHandlers::new(store.clone(), platform.clone());
    (store, platform, handlers)
}

fn admin(command: RoleCommand) -> CommandInvocation {
    CommandInvocation {
        server_id: Some(SERVER),
        user_id: ADMIN,
        is_administrator: true,
        command,
    }
}

fn add_role(emoji: &str, role: &str) -> CommandInvocation {
    admin(RoleCommand::AddRole {
        emoji: emoji.to_string(),
        role_name: role.to_string(),
    })
}

fn remove_role(emoji: &str) -> CommandInvocation {
    admin(RoleCommand::RemoveRole {
        emoji: emoji.to_string(),
    })
}

fn set_channel(channel: &str) -> CommandInvocation {
    admin(RoleCommand::SetChannel {
        channel_id: channel.to_string(),
    })
}

#[tokio::test]
async fn test_first_time_setup() {
    let (store, platform, handlers) = setup().await;

    let reply = handlers.execute(&add_role("✅", "Verified")).await;
    assert_eq!(reply.content, "Role mapping added: ✅ -> Verified");
    assert!(!reply.ephemeral);
    assert_eq!(platform.roles_named(SERVER, "Verified").len(), 1);

    let reply = handlers.execute(&admin(RoleCommand::ListRoles)).await;
    assert_eq!(reply.content, "Current role mappings:\n✅ -> Verified\n");

    let reply = handlers.execute(&set_channel("10")).await;
    assert_eq!(reply.content, "Role selection message created in <#10>.");

    let posted = platform.last_posted().unwrap();
    assert_eq!(platform.content(posted), "React for roles:\n\n✅ - Verified\n");
    assert_eq!(platform.own_reactions(posted), vec!["✅"]);
    assert_eq!(
        store.message_ref(SERVER).await,
        Some(RoleMessage::new(CHANNEL, posted))
    );
}

#[tokio::test]
async fn test_removing_mapping_updates_live_message() {
    let (store, platform, handlers) = setup().await;
    handlers.execute(&add_role("✅", "Verified")).await;
    handlers.execute(&add_role("🎮", "Gamer")).await;
    handlers.execute(&set_channel("10")).await;
    let posted = platform.last_posted().unwrap();

    let reply = handlers.execute(&remove_role("🎮")).await;

    assert_eq!(reply.content, "Role mapping removed for emoji: 🎮");
    assert_eq!(platform.content(posted), "React for roles:\n\n✅ - Verified");
    assert_eq!(platform.own_reactions(posted), vec!["✅"]);
    assert!(!store.get(SERVER).await.contains(&Emoji::unicode("🎮")));
}

#[tokio::test]
async fn test_adding_mapping_updates_live_message() {
    let (_store, platform, handlers) = setup().await;
    handlers.execute(&add_role("✅", "Verified")).await;
    handlers.execute(&set_channel("10")).await;
    let posted = platform.last_posted().unwrap();

    handlers.execute(&add_role("📚", "Reader")).await;

    assert_eq!(
        platform.content(posted),
        "React for roles:\n\n✅ - Verified\n📚 - Reader"
    );
    assert_eq!(platform.own_reactions(posted), vec!["✅", "📚"]);
}

#[tokio::test]
async fn test_overwriting_mapping_keeps_position() {
    let (store, _platform, handlers) = setup().await;
    handlers.execute(&add_role("✅", "Verified")).await;
    handlers.execute(&add_role("🎮", "Gamer")).await;

    handlers.execute(&add_role("✅", "Member")).await;

    let mapping = store.get(SERVER).await;
    let entries: Vec<_> = mapping
        .iter()
        .map(|(e, r)| format!("{e}={r}"))
        .collect();
    assert_eq!(entries, vec!["✅=Member", "🎮=Gamer"]);
}

#[tokio::test]
async fn test_non_admin_is_rejected_without_effects() {
    let (store, platform, handlers) = setup().await;
    let mut invocation = add_role("✅", "Verified");
    invocation.is_administrator = false;

    let reply = handlers.execute(&invocation).await;

    assert_eq!(
        reply.content,
        "You need the Administrator permission to use this command."
    );
    assert!(reply.ephemeral);
    assert!(store.get(SERVER).await.is_empty());
    assert!(platform.calls().is_empty());
}

#[tokio::test]
async fn test_command_outside_server_is_rejected() {
    let (_store, platform, handlers) = setup().await;
    let mut invocation = admin(RoleCommand::ListRoles);
    invocation.server_id = None;

    let reply = handlers.execute(&invocation).await;

    assert!(reply.ephemeral);
    assert!(platform.calls().is_empty());
}

#[tokio::test]
async fn test_remove_unknown_mapping() {
    let (_store, platform, handlers) = setup().await;

    let reply = handlers.execute(&remove_role("🍕")).await;

    assert_eq!(reply.content, "Role mapping not found.");
    assert_eq!(platform.mutation_count(), 0);
}

#[tokio::test]
async fn test_list_empty_mapping() {
    let (_store, _platform, handlers) = setup().await;

    let reply = handlers.execute(&admin(RoleCommand::ListRoles)).await;

    assert_eq!(reply.content, "No role mappings set up.");
}

#[tokio::test]
async fn test_invalid_emoji_is_rejected_without_mutation() {
    let (store, platform, handlers) = setup().await;

    let reply = handlers.execute(&add_role("   ", "Verified")).await;

    assert!(reply.ephemeral);
    assert!(store.get(SERVER).await.is_empty());
    assert!(platform.calls().is_empty());
}

#[tokio::test]
async fn test_role_provisioning_failure_leaves_mapping_unchanged() {
    let (store, platform, handlers) = setup().await;
    platform.fail_create_role();

    let reply = handlers.execute(&add_role("✅", "Verified")).await;

    assert!(reply.ephemeral);
    assert!(reply.content.contains("Verified"));
    assert!(store.get(SERVER).await.is_empty());
}

#[tokio::test]
async fn test_failed_save_reports_error_and_leaves_mapping_unchanged() {
    let backend = Arc::new(MemoryBackend::new());
    let store = Arc::new(
        MappingStore::open(backend.clone(), CorruptStatePolicy::Reset)
            .await
            .unwrap(),
    );
    let platform = Arc::new(MockPlatform::new());
    platform.with_channel(SERVER, CHANNEL);
    let handlers = CommandHandlers::new(store.clone(), platform.clone());
    handlers.execute(&add_role("✅", "Verified")).await;
    handlers.execute(&set_channel("10")).await;
    let posted = platform.last_posted().unwrap();
    let before = platform.content(posted);
    backend.reject_saves(true);

    let reply = handlers.execute(&add_role("📚", "Reader")).await;
    assert!(reply.ephemeral);
    assert!(reply.content.starts_with("Failed to save role data"));

    let reply = handlers.execute(&remove_role("✅")).await;
    assert!(reply.ephemeral);
    assert!(reply.content.starts_with("Failed to save role data"));

    let mapping = store.get(SERVER).await;
    assert_eq!(mapping.len(), 1);
    assert!(mapping.contains(&Emoji::unicode("✅")));
    assert_eq!(platform.content(posted), before);
    assert_eq!(platform.own_reactions(posted), vec!["✅"]);
}

#[tokio::test]
async fn test_failed_save_keeps_previous_role_message() {
    let backend = Arc::new(MemoryBackend::new());
    let store = Arc::new(
        MappingStore::open(backend.clone(), CorruptStatePolicy::Reset)
            .await
            .unwrap(),
    );
    let platform = Arc::new(MockPlatform::new());
    platform.with_channel(SERVER, CHANNEL);
    let handlers = CommandHandlers::new(store.clone(), platform.clone());
    handlers.execute(&add_role("✅", "Verified")).await;
    handlers.execute(&set_channel("10")).await;
    let first = store.message_ref(SERVER).await;
    backend.reject_saves(true);

    let reply = handlers.execute(&set_channel("10")).await;

    assert!(reply.ephemeral);
    assert!(reply.content.starts_with("Failed to save role data"));
    assert_eq!(store.message_ref(SERVER).await, first);
}

#[tokio::test]
async fn test_set_channel_lookup_failure_is_distinct() {
    let (store, platform, handlers) = setup().await;
    handlers.execute(&add_role("✅", "Verified")).await;
    platform.fail_channel_lookup();

    let reply = handlers.execute(&set_channel("10")).await;

    assert!(reply.ephemeral);
    assert!(reply.content.starts_with("Could not check that channel right now"));
    assert_ne!(
        reply.content,
        "Channel not found. Please use a valid channel ID."
    );
    assert!(platform.last_posted().is_none());
    assert!(store.message_ref(SERVER).await.is_none());
}

#[tokio::test]
async fn test_set_channel_rejects_unknown_channel() {
    let (store, platform, handlers) = setup().await;
    handlers.execute(&add_role("✅", "Verified")).await;

    for raw in ["11", "not-a-channel", "0"] {
        let reply = handlers.execute(&set_channel(raw)).await;
        assert_eq!(
            reply.content,
            "Channel not found. Please use a valid channel ID."
        );
        assert!(reply.ephemeral);
    }
    assert!(platform.last_posted().is_none());
    assert!(store.message_ref(SERVER).await.is_none());
}

#[tokio::test]
async fn test_set_channel_accepts_channel_mention() {
    let (_store, platform, handlers) = setup().await;
    handlers.execute(&add_role("✅", "Verified")).await;

    let reply = handlers.execute(&set_channel("<#10>")).await;

    assert_eq!(reply.content, "Role selection message created in <#10>.");
    assert!(platform.last_posted().is_some());
}

#[tokio::test]
async fn test_set_channel_requires_mappings() {
    let (store, platform, handlers) = setup().await;

    let reply = handlers.execute(&set_channel("10")).await;

    assert_eq!(
        reply.content,
        "No role mappings set up. Use /addrole to add role mappings first."
    );
    assert!(platform.last_posted().is_none());
    assert!(store.message_ref(SERVER).await.is_none());
}

#[tokio::test]
async fn test_set_channel_reports_reaction_failures() {
    let (store, platform, handlers) = setup().await;
    handlers.execute(&add_role("✅", "Verified")).await;
    handlers.execute(&add_role("🎮", "Gamer")).await;
    platform.fail_reactions_for("🎮");

    let reply = handlers.execute(&set_channel("10")).await;

    assert!(reply.content.starts_with("Role selection message created in <#10>."));
    assert!(reply.content.contains("1 reaction update(s) failed; see logs"));
    // The message is still recorded
    assert!(store.message_ref(SERVER).await.is_some());
}

#[tokio::test]
async fn test_stale_message_warns_but_keeps_mutation() {
    let (store, platform, handlers) = setup().await;
    store
        .set_message_ref(SERVER, RoleMessage::new(CHANNEL, MessageId::new(404)))
        .await
        .unwrap();

    let reply = handlers.execute(&add_role("✅", "Verified")).await;

    assert!(reply.content.starts_with("Role mapping added: ✅ -> Verified"));
    assert!(reply.content.contains("/setchannel"));
    assert_eq!(
        store.get(SERVER).await.get(&Emoji::unicode("✅")),
        Some(&RoleName::new("Verified"))
    );
    assert!(
        !platform
            .calls()
            .iter()
            .any(|call| matches!(call, Call::EditMessage(..) | Call::AddReaction(..)))
    );
}

#[tokio::test]
async fn test_repeated_setchannel_posts_new_message() {
    let (store, platform, handlers) = setup().await;
    handlers.execute(&add_role("✅", "Verified")).await;
    handlers.execute(&set_channel("10")).await;
    let first = platform.last_posted().unwrap();

    handlers.execute(&set_channel("10")).await;
    let second = platform.last_posted().unwrap();

    assert_ne!(first, second);
    assert_eq!(store.message_ref(SERVER).await.unwrap().message_id, second);
    assert_eq!(platform.content(second), render(&store.get(SERVER).await));
}

#[test]
fn test_command_names() {
    assert_eq!(CommandName::AddRole.to_string(), "addrole");
    assert_eq!("setchannel".parse::<CommandName>().unwrap(), CommandName::SetChannel);
    assert_eq!(CommandName::AddRole.options().len(), 2);
    assert!(CommandName::ListRoles.options().is_empty());
}
