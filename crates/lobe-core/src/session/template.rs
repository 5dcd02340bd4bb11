//! Built-in session templates.

use super::model::{AgentConfig, MetaData, Session, SessionType};
use super::patch::SessionDraft;
use crate::settings::DefaultAgentSettings;
use chrono::{DateTime, Utc};

/// The agent template every new session starts from.
pub fn default_agent_session(now: DateTime<Utc>) -> Session {
    Session {
        id: String::new(),
        session_type: SessionType::Agent,
        group: None,
        pinned: false,
        meta: MetaData::default(),
        config: AgentConfig::default(),
        created_at: now,
        updated_at: now,
    }
}

/// Builds the session to persist from the template, the user's default
/// agent and the caller's draft, later layers winning.
pub fn compose_new_session(
    defaults: &DefaultAgentSettings,
    draft: &SessionDraft,
    now: DateTime<Utc>,
) -> Session {
    let mut session = default_agent_session(now);

    defaults.config.apply_to(&mut session.config);
    defaults.meta.apply_to(&mut session.meta);

    draft.config.apply_to(&mut session.config);
    draft.meta.apply_to(&mut session.meta);
    if let Some(group) = &draft.group {
        session.group = Some(group.clone());
    }
    if let Some(pinned) = draft.pinned {
        session.pinned = pinned;
    }

    session
}
