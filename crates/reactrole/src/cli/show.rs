//! The `show` command: inspect a data file without connecting.

use super::OutputFormat;
use reactrole::{
    CorruptStatePolicy, JsonError, JsonFileBackend, MappingStore, PersistedState, ReactroleResult,
};
use std::fmt::Write;
use std::path::Path;
use std::sync::Arc;

/// Print the persisted mappings and role messages in `data_file`.
///
/// A missing file prints as empty. A corrupt file is an error whatever the
/// configured policy.
pub async fn show_state(data_file: &Path, format: OutputFormat) -> ReactroleResult<()> {
    let backend = Arc::new(JsonFileBackend::new(data_file));
    let state = MappingStore::open(backend, CorruptStatePolicy::Refuse)
        .await?
        .snapshot()
        .await;

    match format {
        OutputFormat::Human => print!("{}", format_state(&state)),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&state)
                .map_err(|e| JsonError::new(format!("Failed to render state: {}", e)))?;
            println!("{json}");
        }
    }
    Ok(())
}

/// One block per server: its role message, then `emoji -> role` lines.
fn format_state(state: &PersistedState) -> String {
    if state.is_empty() {
        return "No role mappings stored.\n".to_string();
    }

    let mut out = String::new();
    for server in state.servers() {
        let _ = writeln!(out, "Server {server}");
        match state.role_messages.get(&server) {
            Some(message) => {
                let _ = writeln!(
                    out,
                    "  Role message: {} in <#{}>",
                    message.message_id, message.channel_id
                );
            }
            None => out.push_str("  Role message: none\n"),
        }
        match state.role_emoji_map.get(&server) {
            Some(mapping) if !mapping.is_empty() => {
                for (emoji, role) in mapping.iter() {
                    let _ = writeln!(out, "  {} -> {role}", emoji.markup());
                }
            }
            _ => out.push_str("  No role mappings\n"),
        }
    }
    out
}
