use super::format_session;
use anyhow::Result;
use lobe_application::SessionStore;

pub fn run(store: &SessionStore, json: bool) -> Result<()> {
    let state = store.state();

    if json {
        println!("{}", serde_json::to_string_pretty(&state.sessions)?);
        return Ok(());
    }

    if !state.pinned_sessions.is_empty() {
        println!("📌 Pinned");
        for session in &state.pinned_sessions {
            println!("  {}", format_session(store, session));
        }
    }

    for group in &state.custom_session_groups {
        println!("📁 {} ({})", group.name, group.id);
        for session in &group.children {
            println!("  {}", format_session(store, session));
        }
    }

    println!("💬 Default");
    for session in &state.default_sessions {
        println!("  {}", format_session(store, session));
    }

    Ok(())
}
