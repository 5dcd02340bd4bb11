//! Pure reducer over the session collection.

use super::model::Session;
use super::patch::SessionPatch;

/// A local mutation of the session collection.
///
/// Only the store dispatches these. The enum is closed, so an unknown
/// mutation kind cannot reach the reducer.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionDispatch {
    /// Merge `value` into the session identified by `id`.
    UpdateSession { id: String, value: SessionPatch },
}

/// Applies `dispatch` to `sessions` and returns the next collection.
///
/// The input is never mutated. Untouched sessions keep their order and
/// their values; a dispatch naming an unknown id yields an equal copy.
pub fn sessions_reducer(sessions: &[Session], dispatch: SessionDispatch) -> Vec<Session> {
    match dispatch {
        SessionDispatch::UpdateSession { id, value } => {
            if !sessions.iter().any(|s| s.id == id) {
                tracing::debug!("[SessionReducer] updateSession: unknown id {}", id);
                return sessions.to_vec();
            }

            sessions
                .iter()
                .map(|session| {
                    if session.id == id {
                        let mut next = session.clone();
                        value.apply_to(&mut next);
                        next
                    } else {
                        session.clone()
                    }
                })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::model::{AgentConfig, MetaData, SessionType};
    use crate::session::patch::MetaPatch;
    use chrono::Utc;

    fn session(id: &str) -> Session {
        let now = Utc::now();
        Session {
            id: id.to_string(),
            session_type: SessionType::Agent,
            group: None,
            pinned: false,
            meta: MetaData {
                title: Some(format!("title-{id}")),
                ..MetaData::default()
            },
            config: AgentConfig::default(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_update_session_merges_patch() {
        let sessions = vec![session("a"), session("b"), session("c")];
        let next = sessions_reducer(
            &sessions,
            SessionDispatch::UpdateSession {
                id: "b".to_string(),
                value: SessionPatch {
                    pinned: Some(true),
                    meta: Some(MetaPatch {
                        avatar: Some("🐱".to_string()),
                        ..MetaPatch::default()
                    }),
                    ..SessionPatch::default()
                },
            },
        );

        assert_eq!(next.len(), 3);
        assert!(next[1].pinned);
        assert_eq!(next[1].meta.avatar.as_deref(), Some("🐱"));
        assert_eq!(next[1].meta.title.as_deref(), Some("title-b"));
        assert_eq!(next[0], sessions[0]);
        assert_eq!(next[2], sessions[2]);
        // input untouched
        assert!(!sessions[1].pinned);
    }

    #[test]
    fn test_update_session_keeps_order() {
        let sessions = vec![session("a"), session("b"), session("c")];
        let next = sessions_reducer(
            &sessions,
            SessionDispatch::UpdateSession {
                id: "a".to_string(),
                value: SessionPatch::group("work"),
            },
        );
        let ids: Vec<_> = next.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(next[0].group.as_deref(), Some("work"));
    }

    #[test]
    fn test_update_unknown_id_returns_equal_collection() {
        let sessions = vec![session("a"), session("b")];
        let next = sessions_reducer(
            &sessions,
            SessionDispatch::UpdateSession {
                id: "missing".to_string(),
                value: SessionPatch::pinned(true),
            },
        );
        assert_eq!(next, sessions);
    }
}
