//! Session domain module.
//!
//! # Module Structure
//!
//! - `model`: Core session domain model (`Session`, `SessionGroup`)
//! - `patch`: Partial updates (`SessionPatch`, `MetaPatch`, `SessionDraft`)
//! - `reducer`: Pure reducer over the session collection
//! - `partition`: Pinned / custom-group / default partitioning
//! - `template`: Built-in session templates
//! - `service`: Remote session service trait

mod model;
mod partition;
mod patch;
mod reducer;
mod service;
mod template;

// Re-export public API
pub use model::{
    AgentConfig, ChatSessionList, CustomSessionGroup, DEFAULT_GROUP_ID, INBOX_SESSION_ID,
    MetaData, ModelParams, Session, SessionGroup, SessionType,
};
pub use partition::{OrphanGroupPolicy, SessionPartitions, partition_sessions};
pub use patch::{AgentConfigPatch, MetaPatch, ModelParamsPatch, SessionDraft, SessionPatch};
pub use reducer::{SessionDispatch, sessions_reducer};
pub use service::SessionService;
pub use template::{compose_new_session, default_agent_session};
