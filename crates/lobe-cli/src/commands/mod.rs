pub mod group;
pub mod list;
pub mod search;
pub mod session;

use lobe_application::SessionStore;
use lobe_application::session::session_title;
use lobe_core::session::Session;

/// One display line for a session.
pub fn format_session(store: &SessionStore, session: &Session) -> String {
    let title = session_title(&session.meta, store.messages());
    match &session.meta.avatar {
        Some(avatar) => format!("{}  {} {}", session.id, avatar, title),
        None => format!("{}  {}", session.id, title),
    }
}
