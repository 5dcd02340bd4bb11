//! In-memory session service.

use crate::directory::SessionDirectory;
use async_trait::async_trait;
use chrono::Utc;
use lobe_core::session::{
    ChatSessionList, MetaPatch, Session, SessionGroup, SessionPatch, SessionService, SessionType,
};
use lobe_core::{LobeError, Result};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

/// A `SessionService` that keeps the directory in process memory.
///
/// Useful as the local data source of a single-user client and as the
/// collaborator in tests. An optional latency delays every request so that
/// overlapping requests can be observed.
#[derive(Debug, Default)]
pub struct InMemorySessionService {
    directory: RwLock<SessionDirectory>,
    latency: Option<Duration>,
    fetch_count: AtomicUsize,
    search_count: AtomicUsize,
}

impl InMemorySessionService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the service with an existing directory.
    pub fn with_directory(sessions: Vec<Session>, session_groups: Vec<SessionGroup>) -> Self {
        Self {
            directory: RwLock::new(SessionDirectory::new(sessions, session_groups)),
            ..Self::default()
        }
    }

    /// Delays every request by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Number of `get_grouped_sessions` calls served so far.
    pub fn fetch_count(&self) -> usize {
        self.fetch_count.load(Ordering::SeqCst)
    }

    /// Number of `search_sessions` calls served so far.
    pub fn search_count(&self) -> usize {
        self.search_count.load(Ordering::SeqCst)
    }

    /// Returns a copy of the stored directory.
    pub async fn snapshot(&self) -> SessionDirectory {
        self.directory.read().await.clone()
    }

    async fn delay(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl SessionService for InMemorySessionService {
    async fn create_session(&self, session_type: SessionType, session: &Session) -> Result<String> {
        self.delay().await;
        let id = self
            .directory
            .write()
            .await
            .create_session(session_type, session, Utc::now());
        tracing::debug!("[InMemorySessionService] created session {}", id);
        Ok(id)
    }

    async fn clone_session(&self, id: &str, new_title: &str) -> Result<Option<String>> {
        self.delay().await;
        Ok(self
            .directory
            .write()
            .await
            .clone_session(id, new_title, Utc::now()))
    }

    async fn update_session(&self, id: &str, patch: &SessionPatch) -> Result<()> {
        self.delay().await;
        self.directory
            .write()
            .await
            .update_session(id, patch, Utc::now())
    }

    async fn update_session_meta(
        &self,
        id: &str,
        meta: &MetaPatch,
        cancel: CancellationToken,
    ) -> Result<()> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!("[InMemorySessionService] meta update for {} cancelled", id);
                return Err(LobeError::Cancelled);
            }
            _ = self.delay() => {}
        }

        if cancel.is_cancelled() {
            return Err(LobeError::Cancelled);
        }
        self.directory
            .write()
            .await
            .update_session_meta(id, meta, Utc::now())
    }

    async fn remove_session(&self, id: &str) -> Result<()> {
        self.delay().await;
        self.directory.write().await.remove_session(id);
        Ok(())
    }

    async fn remove_all_sessions(&self) -> Result<()> {
        self.delay().await;
        self.directory.write().await.remove_all_sessions();
        Ok(())
    }

    async fn get_grouped_sessions(&self) -> Result<ChatSessionList> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);
        self.delay().await;
        Ok(self.directory.read().await.grouped())
    }

    async fn search_sessions(&self, keyword: &str) -> Result<Vec<Session>> {
        self.search_count.fetch_add(1, Ordering::SeqCst);
        self.delay().await;
        Ok(self.directory.read().await.search(keyword))
    }

    async fn create_session_group(&self, name: &str) -> Result<String> {
        self.delay().await;
        Ok(self.directory.write().await.create_group(name))
    }

    async fn update_session_group(&self, id: &str, name: &str) -> Result<()> {
        self.delay().await;
        self.directory.write().await.update_group(id, name)
    }

    async fn remove_session_group(&self, id: &str) -> Result<()> {
        self.delay().await;
        self.directory.write().await.remove_group(id, Utc::now());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lobe_core::session::{SessionDraft, compose_new_session};
    use lobe_core::settings::DefaultAgentSettings;
    use std::sync::Arc;

    fn new_session(title: &str) -> Session {
        compose_new_session(
            &DefaultAgentSettings::default(),
            &SessionDraft::titled(title),
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn test_create_and_fetch() {
        let service = InMemorySessionService::new();
        let id = service
            .create_session(SessionType::Agent, &new_session("Test"))
            .await
            .unwrap();

        let list = service.get_grouped_sessions().await.unwrap();
        assert_eq!(list.sessions.len(), 1);
        assert_eq!(list.sessions[0].id, id);
        assert_eq!(service.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_cancelled_meta_update_is_not_persisted() {
        let service = Arc::new(
            InMemorySessionService::new().with_latency(Duration::from_millis(50)),
        );
        let id = service
            .create_session(SessionType::Agent, &new_session("Before"))
            .await
            .unwrap();

        let token = CancellationToken::new();
        let pending = {
            let service = service.clone();
            let id = id.clone();
            let token = token.clone();
            tokio::spawn(async move {
                service
                    .update_session_meta(&id, &MetaPatch::title("After"), token)
                    .await
            })
        };
        token.cancel();

        let result = pending.await.unwrap();
        assert_eq!(result, Err(LobeError::Cancelled));
        let snapshot = service.snapshot().await;
        assert_eq!(snapshot.sessions[0].meta.title.as_deref(), Some("Before"));
    }

    #[tokio::test]
    async fn test_meta_update_applies() {
        let service = InMemorySessionService::new();
        let id = service
            .create_session(SessionType::Agent, &new_session("Before"))
            .await
            .unwrap();

        service
            .update_session_meta(&id, &MetaPatch::title("After"), CancellationToken::new())
            .await
            .unwrap();

        let snapshot = service.snapshot().await;
        assert_eq!(snapshot.sessions[0].meta.title.as_deref(), Some("After"));
    }
}
