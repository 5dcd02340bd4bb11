//! Session domain model.
//!
//! This module contains the `Session` entity and the group records that the
//! directory partitions sessions into.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Identifier of the built-in inbox session.
///
/// The inbox is the fallback target of the active-session pointer; it is
/// never part of the fetched collection.
pub const INBOX_SESSION_ID: &str = "inbox";

/// Group id that marks a session as ungrouped.
pub const DEFAULT_GROUP_ID: &str = "default";

/// Variant tag of a session.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SessionType {
    /// A single-agent chat session
    #[default]
    Agent,
    /// A multi-agent group chat session
    Group,
}

/// Display metadata of a session.
///
/// Opaque to the directory except for `title`, which is used for
/// duplicate naming and search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetaData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

/// Sampling parameters forwarded to the model provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelParams {
    pub temperature: f32,
    pub top_p: f32,
    pub presence_penalty: f32,
    pub frequency_penalty: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl Default for ModelParams {
    fn default() -> Self {
        Self {
            temperature: 0.6,
            top_p: 1.0,
            presence_penalty: 0.0,
            frequency_penalty: 0.0,
            max_tokens: None,
        }
    }
}

/// Agent configuration attached to a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    pub model: String,
    pub provider: String,
    #[serde(default)]
    pub system_role: String,
    #[serde(default)]
    pub params: ModelParams,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub plugins: Vec<String>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            model: "gpt-3.5-turbo".to_string(),
            provider: "openai".to_string(),
            system_role: String::new(),
            params: ModelParams::default(),
            plugins: Vec::new(),
        }
    }
}

/// A persisted chat/agent conversation context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Unique session identifier
    pub id: String,
    /// Variant tag
    #[serde(rename = "type", default)]
    pub session_type: SessionType,
    /// Custom group id; `None` or `"default"` means ungrouped
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    /// Whether the session sits in the pinned partition
    #[serde(default)]
    pub pinned: bool,
    pub meta: MetaData,
    pub config: AgentConfig,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    /// Returns true when the session carries no custom group.
    pub fn is_ungrouped(&self) -> bool {
        match self.group.as_deref() {
            None => true,
            Some(group) => group == DEFAULT_GROUP_ID,
        }
    }

    /// Returns true when the session belongs to the custom group `group_id`.
    pub fn in_group(&self, group_id: &str) -> bool {
        self.group.as_deref() == Some(group_id)
    }
}

/// A user-defined label used to cluster sessions for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionGroup {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<i32>,
}

/// A session group together with its derived children.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomSessionGroup {
    pub id: String,
    pub name: String,
    pub children: Vec<Session>,
}

/// Payload of a full directory fetch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatSessionList {
    #[serde(default)]
    pub sessions: Vec<Session>,
    #[serde(default)]
    pub session_groups: Vec<SessionGroup>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn session(group: Option<&str>) -> Session {
        let now = Utc::now();
        Session {
            id: "s1".to_string(),
            session_type: SessionType::Agent,
            group: group.map(str::to_string),
            pinned: false,
            meta: MetaData::default(),
            config: AgentConfig::default(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_default_group_counts_as_ungrouped() {
        assert!(session(None).is_ungrouped());
        assert!(session(Some("default")).is_ungrouped());
        assert!(!session(Some("work")).is_ungrouped());
        assert!(session(Some("work")).in_group("work"));
    }

    #[test]
    fn test_session_type_string_forms() {
        assert_eq!(SessionType::Agent.to_string(), "agent");
        assert_eq!(SessionType::from_str("group").unwrap(), SessionType::Group);
    }

    #[test]
    fn test_session_serializes_type_tag() {
        let json = serde_json::to_value(session(None)).unwrap();
        assert_eq!(json["type"], "agent");
        assert!(json.get("group").is_none());
    }
}
