//! Tests for the core data types.

use reactrole_core::{
    ChannelId, Emoji, MessageId, PersistedState, RoleMapping, RoleMessage, RoleName, ServerId,
};

fn mapping(pairs: &[(&str, &str)]) -> RoleMapping {
    pairs
        .iter()
        .map(|(emoji, role)| (Emoji::unicode(*emoji), RoleName::new(*role)))
        .collect()
}

#[test]
fn test_mapping_serializes_in_insertion_order() {
    let mapping = mapping(&[("🎮", "Gamer"), ("✅", "Verified"), ("📚", "Reader")]);

    let json = serde_json::to_string(&mapping).unwrap();
    assert_eq!(json, r#"{"🎮":"Gamer","✅":"Verified","📚":"Reader"}"#);

    let back: RoleMapping = serde_json::from_str(&json).unwrap();
    assert_eq!(back, mapping);
    let order: Vec<_> = back.emojis().map(Emoji::as_str).collect();
    assert_eq!(order, vec!["🎮", "✅", "📚"]);
}

#[test]
fn test_mapping_overwrite_keeps_position() {
    let mut mapping = mapping(&[("✅", "Verified"), ("🎮", "Gamer")]);

    let previous = mapping.insert(Emoji::unicode("✅"), RoleName::new("Member"));

    assert_eq!(previous, Some(RoleName::new("Verified")));
    let entries: Vec<_> = mapping
        .iter()
        .map(|(e, r)| (e.as_str(), r.as_str()))
        .collect();
    assert_eq!(entries, vec![("✅", "Member"), ("🎮", "Gamer")]);
}

#[test]
fn test_mapping_remove() {
    let mut mapping = mapping(&[("✅", "Verified"), ("🎮", "Gamer")]);

    assert_eq!(
        mapping.remove(&Emoji::unicode("✅")),
        Some(RoleName::new("Verified"))
    );
    assert_eq!(mapping.remove(&Emoji::unicode("✅")), None);
    assert_eq!(mapping.len(), 1);
    assert!(!mapping.contains(&Emoji::unicode("✅")));
}

#[test]
fn test_state_ids_round_trip_as_strings() {
    let mut state = PersistedState::default();
    state
        .role_emoji_map
        .insert(ServerId::new(1234567890123), mapping(&[("✅", "Verified")]));
    state.role_messages.insert(
        ServerId::new(1234567890123),
        RoleMessage::new(ChannelId::new(55), MessageId::new(66)),
    );

    let value = serde_json::to_value(&state).unwrap();
    assert_eq!(
        value["role_messages"]["1234567890123"]["channel_id"],
        serde_json::json!("55")
    );
    assert_eq!(
        value["role_emoji_map"]["1234567890123"]["✅"],
        serde_json::json!("Verified")
    );

    let back: PersistedState = serde_json::from_value(value).unwrap();
    assert_eq!(back, state);
}

#[test]
fn test_state_accepts_numeric_ids_and_missing_sections() {
    let state: PersistedState =
        serde_json::from_str(r#"{"role_messages": {"9": {"channel_id": 1, "message_id": 2}}}"#)
            .unwrap();

    assert!(state.role_emoji_map.is_empty());
    let message = state.role_messages[&ServerId::new(9)];
    assert_eq!(message.channel_id, ChannelId::new(1));
    assert_eq!(message.message_id, MessageId::new(2));
    assert_eq!(state.servers(), vec![ServerId::new(9)]);
}

#[test]
fn test_state_rejects_garbage_ids() {
    let result: Result<PersistedState, _> = serde_json::from_str(
        r#"{"role_messages": {"9": {"channel_id": "general", "message_id": "2"}}}"#,
    );
    assert!(result.is_err());
}

#[test]
fn test_emoji_parse_forms() {
    assert_eq!(Emoji::parse("✅").unwrap().as_str(), "✅");
    assert_eq!(Emoji::parse("<:wave:42>").unwrap().as_str(), "wave:42");
    assert_eq!(Emoji::parse("<a:dance:7>").unwrap().as_str(), "a:dance:7");
    assert_eq!(Emoji::parse("dance:7").unwrap().custom_parts(), Some(("dance", 7)));
    assert_eq!(Emoji::parse("a:dance:7").unwrap().custom_parts(), Some(("dance", 7)));
    // A custom emoji literally named "a"
    assert_eq!(Emoji::parse("a:7").unwrap().custom_parts(), Some(("a", 7)));
    assert!(!Emoji::parse("a:7").unwrap().is_animated());
    assert!(Emoji::parse("   ").is_err());
    assert!(Emoji::parse("<:wave:notanid>").is_err());
    assert!(Emoji::parse("<wave>").is_err());
}

#[test]
fn test_emoji_markup() {
    assert_eq!(Emoji::unicode("✅").markup(), "✅");
    assert_eq!(Emoji::custom("wave", 42).markup(), "<:wave:42>");
    assert_eq!(Emoji::animated("dance", 7).markup(), "<a:dance:7>");
    assert_eq!(Emoji::unicode("✅").custom_parts(), None);
}

#[test]
fn test_custom_emoji_identity_is_the_id() {
    let old = Emoji::custom("old", 42);
    let renamed = Emoji::custom("new", 42);

    assert_eq!(old, renamed);
    assert_eq!(old, Emoji::animated("old", 42));
    assert_ne!(old, Emoji::custom("old", 43));

    let mapping: RoleMapping = [(old, RoleName::new("Blob"))].into_iter().collect();
    assert_eq!(mapping.get(&renamed), Some(&RoleName::new("Blob")));
}

#[test]
fn test_overwrite_takes_current_custom_name() {
    let mut mapping = RoleMapping::new();
    mapping.insert(Emoji::custom("old", 42), RoleName::new("Blob"));

    mapping.insert(Emoji::custom("new", 42), RoleName::new("Blob"));

    assert_eq!(mapping.len(), 1);
    assert_eq!(mapping.emojis().next().unwrap().markup(), "<:new:42>");
}

#[test]
fn test_stored_keys_are_normalised_on_load() {
    let mapping: RoleMapping =
        serde_json::from_str(r#"{"<:blob:42>": "Blob", " ✅": "Verified", "<a:dance:7>": "Dancer"}"#)
            .unwrap();

    let keys: Vec<_> = mapping.emojis().map(Emoji::as_str).collect();
    assert_eq!(keys, vec!["blob:42", "✅", "a:dance:7"]);
    assert_eq!(
        mapping.get(&Emoji::parse("<:blob:42>").unwrap()),
        Some(&RoleName::new("Blob"))
    );
    assert_eq!(
        mapping.get(&Emoji::parse("✅").unwrap()),
        Some(&RoleName::new("Verified"))
    );
    assert_eq!(
        serde_json::to_string(&mapping).unwrap(),
        r#"{"blob:42":"Blob","✅":"Verified","a:dance:7":"Dancer"}"#
    );
}

#[test]
fn test_blank_stored_key_is_rejected() {
    let result: Result<RoleMapping, _> = serde_json::from_str(r#"{"  ": "Nobody"}"#);
    assert!(result.is_err());
}

#[test]
fn test_role_name_validation() {
    assert_eq!(RoleName::parse("  Verified ").unwrap().as_str(), "Verified");
    assert!(RoleName::parse("").is_err());
    assert!(RoleName::parse(&"x".repeat(101)).is_err());
}
