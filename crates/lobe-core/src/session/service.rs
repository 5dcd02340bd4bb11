//! Session service trait.
//!
//! Defines the remote collaborator the session store talks to.

use super::model::{ChatSessionList, Session, SessionType};
use super::patch::{MetaPatch, SessionPatch};
use crate::error::Result;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// An abstract remote service holding the canonical session directory.
///
/// The store never owns the data; it caches what this service returns and
/// re-pulls after every mutation. Implementations may live behind a network
/// boundary, a local database or a file.
#[async_trait]
pub trait SessionService: Send + Sync {
    /// Persists a new session and returns its id.
    ///
    /// The `id` field of `session` is ignored; the service assigns one.
    async fn create_session(&self, session_type: SessionType, session: &Session)
    -> Result<String>;

    /// Copies the session `id` under `new_title`.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(id))`: id of the copy
    /// - `Ok(None)`: the service declined to clone (e.g. the source vanished)
    /// - `Err(_)`: the request failed
    async fn clone_session(&self, id: &str, new_title: &str) -> Result<Option<String>>;

    /// Applies a partial update to the session `id`.
    async fn update_session(&self, id: &str, patch: &SessionPatch) -> Result<()>;

    /// Merges `meta` into the metadata of session `id`.
    ///
    /// Implementations must stop and return `LobeError::Cancelled` without
    /// persisting anything once `cancel` fires.
    async fn update_session_meta(
        &self,
        id: &str,
        meta: &MetaPatch,
        cancel: CancellationToken,
    ) -> Result<()>;

    /// Deletes the session `id`. Deleting a missing session succeeds.
    async fn remove_session(&self, id: &str) -> Result<()>;

    /// Deletes every session.
    async fn remove_all_sessions(&self) -> Result<()>;

    /// Returns the full directory: every session and every group.
    async fn get_grouped_sessions(&self) -> Result<ChatSessionList>;

    /// Returns sessions matching `keyword`.
    async fn search_sessions(&self, keyword: &str) -> Result<Vec<Session>>;

    /// Creates a session group and returns its id.
    async fn create_session_group(&self, name: &str) -> Result<String>;

    /// Renames the session group `id`.
    async fn update_session_group(&self, id: &str, name: &str) -> Result<()>;

    /// Deletes the session group `id`; its sessions become ungrouped.
    async fn remove_session_group(&self, id: &str) -> Result<()>;
}
