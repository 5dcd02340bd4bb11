//! The session directory document shared by the bundled session services.
//!
//! `SessionDirectory` is the canonical data a session service owns: an
//! ordered list of sessions and an ordered list of groups. The in-memory and
//! TOML-backed services both delegate their bookkeeping to it.

use chrono::{DateTime, Utc};
use lobe_core::session::{
    ChatSessionList, DEFAULT_GROUP_ID, MetaPatch, Session, SessionGroup, SessionPatch, SessionType,
};
use lobe_core::{LobeError, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionDirectory {
    #[serde(default)]
    pub sessions: Vec<Session>,
    #[serde(default)]
    pub session_groups: Vec<SessionGroup>,
}

impl SessionDirectory {
    pub fn new(sessions: Vec<Session>, session_groups: Vec<SessionGroup>) -> Self {
        Self {
            sessions,
            session_groups,
        }
    }

    fn find_mut(&mut self, id: &str) -> Result<&mut Session> {
        self.sessions
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| LobeError::not_found("Session", id))
    }

    /// Appends a copy of `session` under a fresh id and returns that id.
    pub fn create_session(
        &mut self,
        session_type: SessionType,
        session: &Session,
        now: DateTime<Utc>,
    ) -> String {
        let id = Uuid::new_v4().to_string();
        let mut stored = session.clone();
        stored.id = id.clone();
        stored.session_type = session_type;
        stored.created_at = now;
        stored.updated_at = now;
        self.sessions.push(stored);
        id
    }

    /// Copies session `id` under `new_title`, unpinned, right after the source.
    pub fn clone_session(&mut self, id: &str, new_title: &str, now: DateTime<Utc>) -> Option<String> {
        let index = self.sessions.iter().position(|s| s.id == id)?;

        let mut copy = self.sessions[index].clone();
        copy.id = Uuid::new_v4().to_string();
        copy.pinned = false;
        copy.meta.title = Some(new_title.to_string());
        copy.created_at = now;
        copy.updated_at = now;

        let new_id = copy.id.clone();
        self.sessions.insert(index + 1, copy);
        Some(new_id)
    }

    pub fn update_session(&mut self, id: &str, patch: &SessionPatch, now: DateTime<Utc>) -> Result<()> {
        let session = self.find_mut(id)?;
        patch.apply_to(session);
        session.updated_at = now;
        Ok(())
    }

    pub fn update_session_meta(&mut self, id: &str, meta: &MetaPatch, now: DateTime<Utc>) -> Result<()> {
        let session = self.find_mut(id)?;
        meta.apply_to(&mut session.meta);
        session.updated_at = now;
        Ok(())
    }

    pub fn remove_session(&mut self, id: &str) {
        self.sessions.retain(|s| s.id != id);
    }

    pub fn remove_all_sessions(&mut self) {
        self.sessions.clear();
    }

    /// Returns the whole directory, groups ordered by `sort` then insertion.
    pub fn grouped(&self) -> ChatSessionList {
        let mut session_groups = self.session_groups.clone();
        session_groups.sort_by_key(|g| g.sort.unwrap_or(i32::MAX));

        ChatSessionList {
            sessions: self.sessions.clone(),
            session_groups,
        }
    }

    /// Case-insensitive match on title, description and tags.
    pub fn search(&self, keyword: &str) -> Vec<Session> {
        let needle = keyword.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        let hit = |value: &Option<String>| {
            value
                .as_deref()
                .is_some_and(|v| v.to_lowercase().contains(&needle))
        };

        self.sessions
            .iter()
            .filter(|s| {
                hit(&s.meta.title)
                    || hit(&s.meta.description)
                    || s.meta.tags.iter().any(|t| t.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect()
    }

    pub fn create_group(&mut self, name: &str) -> String {
        let id = Uuid::new_v4().to_string();
        self.session_groups.push(SessionGroup {
            id: id.clone(),
            name: name.to_string(),
            sort: None,
        });
        id
    }

    pub fn update_group(&mut self, id: &str, name: &str) -> Result<()> {
        let group = self
            .session_groups
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or_else(|| LobeError::not_found("SessionGroup", id))?;
        group.name = name.to_string();
        Ok(())
    }

    /// Removes group `id` and moves its sessions back to the default group.
    pub fn remove_group(&mut self, id: &str, now: DateTime<Utc>) {
        self.session_groups.retain(|g| g.id != id);
        for session in self.sessions.iter_mut().filter(|s| s.in_group(id)) {
            session.group = Some(DEFAULT_GROUP_ID.to_string());
            session.updated_at = now;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lobe_core::session::{SessionDraft, compose_new_session};
    use lobe_core::settings::DefaultAgentSettings;

    fn draft_session(title: &str) -> Session {
        compose_new_session(
            &DefaultAgentSettings::default(),
            &SessionDraft::titled(title),
            Utc::now(),
        )
    }

    #[test]
    fn test_create_assigns_unique_ids() {
        let mut dir = SessionDirectory::default();
        let a = dir.create_session(SessionType::Agent, &draft_session("A"), Utc::now());
        let b = dir.create_session(SessionType::Agent, &draft_session("B"), Utc::now());
        assert_ne!(a, b);
        assert_eq!(dir.sessions.len(), 2);
        assert_eq!(dir.sessions[0].id, a);
    }

    #[test]
    fn test_clone_session_inserts_after_source() {
        let mut dir = SessionDirectory::default();
        let a = dir.create_session(SessionType::Agent, &draft_session("A"), Utc::now());
        let b = dir.create_session(SessionType::Agent, &draft_session("B"), Utc::now());
        dir.update_session(&a, &SessionPatch::pinned(true), Utc::now())
            .unwrap();

        let copy = dir.clone_session(&a, "A (copy)", Utc::now()).unwrap();

        let ids: Vec<_> = dir.sessions.iter().map(|s| s.id.clone()).collect();
        assert_eq!(ids, vec![a, copy.clone(), b]);
        assert_eq!(dir.sessions[1].meta.title.as_deref(), Some("A (copy)"));
        assert!(!dir.sessions[1].pinned);
    }

    #[test]
    fn test_clone_missing_session_is_none() {
        let mut dir = SessionDirectory::default();
        assert!(dir.clone_session("nope", "x", Utc::now()).is_none());
    }

    #[test]
    fn test_update_missing_session_is_not_found() {
        let mut dir = SessionDirectory::default();
        let err = dir
            .update_session("nope", &SessionPatch::pinned(true), Utc::now())
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_search_matches_title_description_and_tags() {
        let mut dir = SessionDirectory::default();
        let mut tagged = draft_session("Translator");
        tagged.meta.tags = vec!["Language".to_string()];
        tagged.meta.description = Some("Turns English into Chinese".to_string());
        dir.create_session(SessionType::Agent, &tagged, Utc::now());
        dir.create_session(SessionType::Agent, &draft_session("Coder"), Utc::now());

        assert_eq!(dir.search("TRANS").len(), 1);
        assert_eq!(dir.search("chinese").len(), 1);
        assert_eq!(dir.search("language").len(), 1);
        assert!(dir.search("   ").is_empty());
        assert!(dir.search("painter").is_empty());
    }

    #[test]
    fn test_remove_group_ungroups_members() {
        let mut dir = SessionDirectory::default();
        let group = dir.create_group("Work");
        let id = dir.create_session(SessionType::Agent, &draft_session("A"), Utc::now());
        dir.update_session(&id, &SessionPatch::group(group.clone()), Utc::now())
            .unwrap();

        dir.remove_group(&group, Utc::now());

        assert!(dir.session_groups.is_empty());
        assert!(dir.sessions[0].is_ungrouped());
    }

    #[test]
    fn test_grouped_orders_by_sort() {
        let mut dir = SessionDirectory::default();
        let first = dir.create_group("first");
        let second = dir.create_group("second");
        dir.session_groups[1].sort = Some(0);

        let list = dir.grouped();
        assert_eq!(list.session_groups[0].id, second);
        assert_eq!(list.session_groups[1].id, first);
    }
}
