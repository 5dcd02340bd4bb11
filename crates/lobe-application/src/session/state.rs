//! Observable session directory state and its selectors.

use crate::i18n::{MessageKey, Messages};
use lobe_core::session::{
    CustomSessionGroup, INBOX_SESSION_ID, MetaData, Session, SessionGroup,
};

/// Snapshot of everything the UI renders from the session store.
///
/// `pinned_sessions`, `custom_session_groups` and `default_sessions` are
/// caches derived from `sessions` and `session_groups`; they are recomputed
/// on every publication and never written on their own.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub active_id: String,
    pub sessions: Vec<Session>,
    pub session_groups: Vec<SessionGroup>,
    pub pinned_sessions: Vec<Session>,
    pub custom_session_groups: Vec<CustomSessionGroup>,
    pub default_sessions: Vec<Session>,
    pub is_sessions_first_fetch_finished: bool,
    pub session_search_keywords: String,
    pub is_searching: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            active_id: INBOX_SESSION_ID.to_string(),
            sessions: Vec::new(),
            session_groups: Vec::new(),
            pinned_sessions: Vec::new(),
            custom_session_groups: Vec::new(),
            default_sessions: Vec::new(),
            is_sessions_first_fetch_finished: false,
            session_search_keywords: String::new(),
            is_searching: false,
        }
    }
}

impl SessionState {
    pub fn session_by_id(&self, id: &str) -> Option<&Session> {
        self.sessions.iter().find(|s| s.id == id)
    }

    /// The session the active pointer resolves to, if it is in the collection.
    pub fn current_session(&self) -> Option<&Session> {
        self.session_by_id(&self.active_id)
    }

    /// Finds the derived group record with `group_id`.
    pub fn custom_group(&self, group_id: &str) -> Option<&CustomSessionGroup> {
        self.custom_session_groups.iter().find(|g| g.id == group_id)
    }
}

/// Display title of a session, falling back to the localized default.
pub fn session_title(meta: &MetaData, messages: &Messages) -> String {
    match meta.title.as_deref().map(str::trim) {
        Some(title) if !title.is_empty() => title.to_string(),
        _ => messages.text(MessageKey::DefaultSessionTitle),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lobe_core::settings::Locale;

    #[test]
    fn test_default_state_points_to_inbox() {
        let state = SessionState::default();
        assert_eq!(state.active_id, INBOX_SESSION_ID);
        assert!(state.current_session().is_none());
        assert!(!state.is_sessions_first_fetch_finished);
    }

    #[test]
    fn test_session_title_fallback() {
        let messages = Messages::new(Locale::EnUs);
        assert_eq!(session_title(&MetaData::default(), &messages), "Custom Agent");

        let titled = MetaData {
            title: Some("Writer".to_string()),
            ..MetaData::default()
        };
        assert_eq!(session_title(&titled, &messages), "Writer");

        let blank = MetaData {
            title: Some("   ".to_string()),
            ..MetaData::default()
        };
        assert_eq!(session_title(&blank, &messages), "Custom Agent");
    }
}
