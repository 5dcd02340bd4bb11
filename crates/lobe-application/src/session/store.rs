//! The session store.
//!
//! `SessionStore` owns the local copy of the session directory, coordinates
//! every mutation with the remote `SessionService` and republishes derived
//! partitions to observers.

use super::fetcher::{FetchKey, SessionListFetcher};
use super::state::{SessionState, session_title};
use crate::i18n::{MessageKey, Messages};
use crate::notifier::{Notifier, TracingNotifier};
use chrono::Utc;
use lobe_core::session::{
    ChatSessionList, INBOX_SESSION_ID, MetaPatch, OrphanGroupPolicy, Session, SessionDispatch,
    SessionDraft, SessionGroup, SessionPatch, SessionService, SessionType, compose_new_session,
    partition_sessions, sessions_reducer,
};
use lobe_core::settings::{Locale, SettingsProvider, StaticSettingsProvider};
use lobe_core::{LobeError, Result};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

const DUPLICATE_LOADING_KEY: &str = "duplicateSession.loading";

/// Prefixes an action name with the store namespace for logging.
fn action(name: &str) -> String {
    format!("session/{}", name)
}

/// Tunables of a `SessionStore`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreOptions {
    pub locale: Locale,
    pub orphan_group_policy: OrphanGroupPolicy,
}

/// Client-side cache of the session directory.
///
/// The store is meant to be shared behind an `Arc` and injected wherever the
/// directory is needed. Reads go through `state()` or a `subscribe()`
/// receiver; writes only happen through the action methods below.
///
/// # Consistency
///
/// Every mutation re-pulls the full list from the service afterwards, so the
/// service is always the source of truth. Pin and group changes are applied
/// optimistically first. Metadata updates of the active session are limited
/// to one in flight; a newer one cancels the older request.
pub struct SessionStore {
    service: Arc<dyn SessionService>,
    settings: Arc<dyn SettingsProvider>,
    notifier: Arc<dyn Notifier>,
    messages: Messages,
    orphan_group_policy: OrphanGroupPolicy,
    fetcher: SessionListFetcher,
    state: watch::Sender<SessionState>,
    /// Cancellation handle of the in-flight metadata update
    signal_session_meta: Mutex<Option<CancellationToken>>,
    /// Key used by `refresh_sessions`; follows the last `fetch_sessions` call
    fetch_key: Mutex<FetchKey>,
}

impl SessionStore {
    /// Creates a store with default settings, English messages and a
    /// notifier that writes to the log.
    pub fn new(service: Arc<dyn SessionService>) -> Self {
        let (state, _) = watch::channel(SessionState::default());
        Self {
            fetcher: SessionListFetcher::new(Arc::clone(&service)),
            service,
            settings: Arc::new(StaticSettingsProvider::default()),
            notifier: Arc::new(TracingNotifier),
            messages: Messages::default(),
            orphan_group_policy: OrphanGroupPolicy::default(),
            state,
            signal_session_meta: Mutex::new(None),
            fetch_key: Mutex::new(FetchKey { is_login: true }),
        }
    }

    pub fn with_settings(mut self, settings: Arc<dyn SettingsProvider>) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_options(mut self, options: StoreOptions) -> Self {
        self.messages = Messages::new(options.locale);
        self.orphan_group_policy = options.orphan_group_policy;
        self
    }

    // ============================================================================
    // Selectors
    // ============================================================================

    /// Returns a snapshot of the current state.
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Subscribes to state publications.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn active_id(&self) -> String {
        self.state.borrow().active_id.clone()
    }

    pub fn session_by_id(&self, id: &str) -> Option<Session> {
        self.state.borrow().session_by_id(id).cloned()
    }

    pub fn current_session(&self) -> Option<Session> {
        self.state.borrow().current_session().cloned()
    }

    pub fn messages(&self) -> &Messages {
        &self.messages
    }

    // ============================================================================
    // Actions
    // ============================================================================

    /// Points the active session at `id`. Re-selecting the active session
    /// publishes nothing.
    pub fn switch_session(&self, id: &str) {
        let changed = self.state.send_if_modified(|state| {
            if state.active_id == id {
                return false;
            }
            state.active_id = id.to_string();
            true
        });

        if changed {
            tracing::debug!("[SessionStore] {}", action(&format!("activeSession/{}", id)));
        }
    }

    /// Creates a session from the agent template, the user's default agent
    /// and `draft`, then refreshes.
    ///
    /// # Errors
    ///
    /// Returns the service error when the remote create or the refresh fails.
    pub async fn create_session(&self, draft: SessionDraft, auto_switch: bool) -> Result<String> {
        let defaults = self.settings.default_agent();
        let session = compose_new_session(&defaults, &draft, Utc::now());

        let id = self
            .service
            .create_session(SessionType::Agent, &session)
            .await
            .map_err(|e| self.fail("createSession", e))?;
        tracing::info!("[SessionStore] created session {}", id);

        self.revalidate("createSession").await?;

        if auto_switch {
            self.switch_session(&id);
        }

        Ok(id)
    }

    /// Copies the session `id` and switches to the copy.
    ///
    /// A missing session is a no-op. When the service cannot clone, a
    /// `copyFail` notification is shown and the active session is kept.
    ///
    /// # Returns
    ///
    /// The id of the copy, or `None` when nothing was copied.
    pub async fn duplicate_session(&self, id: &str) -> Result<Option<String>> {
        let Some(session) = self.session_by_id(id) else {
            tracing::debug!("[SessionStore] duplicateSession: {} not found", id);
            return Ok(None);
        };

        let title = session_title(&session.meta, &self.messages);
        let new_title = self.messages.duplicate_title(&title);

        self.notifier.loading(
            DUPLICATE_LOADING_KEY,
            &self.messages.text(MessageKey::DuplicateLoading),
        );

        let new_id = match self.service.clone_session(id, &new_title).await {
            Ok(Some(new_id)) => new_id,
            failed => {
                self.notifier.destroy(DUPLICATE_LOADING_KEY);
                self.notifier.error(&self.messages.text(MessageKey::CopyFail));
                return failed.map(|_| None).inspect_err(|e| {
                    tracing::warn!("[SessionStore] duplicateSession failed: {}", e);
                });
            }
        };

        self.fetcher.invalidate();
        let refreshed = self.refetch().await;
        self.notifier.destroy(DUPLICATE_LOADING_KEY);
        refreshed.map_err(|e| self.fail("duplicateSession", e))?;

        self.notifier
            .success(&self.messages.text(MessageKey::DuplicateSuccess));
        self.switch_session(&new_id);

        Ok(Some(new_id))
    }

    pub async fn pin_session(&self, id: &str, pinned: bool) -> Result<()> {
        self.internal_update_session(id, SessionPatch::pinned(pinned))
            .await
    }

    pub async fn update_session_group_id(&self, id: &str, group: &str) -> Result<()> {
        self.internal_update_session(id, SessionPatch::group(group))
            .await
    }

    /// Merges `meta` into the active session.
    ///
    /// Any metadata update still in flight is cancelled first. A cancelled
    /// update resolves to `Ok(())` without refreshing; the newer update
    /// refreshes instead.
    pub async fn update_session_meta(&self, meta: MetaPatch) -> Result<()> {
        let Some(session) = self.current_session() else {
            tracing::debug!("[SessionStore] updateSessionMeta: no active session");
            return Ok(());
        };

        let signal = self.replace_meta_signal();

        match self
            .service
            .update_session_meta(&session.id, &meta, signal)
            .await
        {
            Ok(()) => {}
            Err(e) if e.is_cancelled() => {
                tracing::debug!(
                    "[SessionStore] updateSessionMeta for {} superseded",
                    session.id
                );
                return Ok(());
            }
            Err(e) => return Err(self.fail("updateSessionMeta", e)),
        }

        self.revalidate("updateSessionMeta").await
    }

    /// Deletes `id`; when it was active the inbox becomes active.
    pub async fn remove_session(&self, id: &str) -> Result<()> {
        self.service
            .remove_session(id)
            .await
            .map_err(|e| self.fail("removeSession", e))?;
        self.revalidate("removeSession").await?;

        if self.active_id() == id {
            self.switch_session(INBOX_SESSION_ID);
        }

        Ok(())
    }

    pub async fn clear_sessions(&self) -> Result<()> {
        self.service
            .remove_all_sessions()
            .await
            .map_err(|e| self.fail("clearSessions", e))?;
        self.revalidate("clearSessions").await
    }

    /// Re-pulls the directory and re-derives partitions.
    ///
    /// This is the only path by which fetched data reaches the state;
    /// concurrent calls share one remote request.
    pub async fn refresh_sessions(&self) -> Result<()> {
        self.refetch()
            .await
            .map_err(|e| self.fail("refreshSessions", e))
    }

    /// Ensures the directory is loaded.
    ///
    /// Serves the cached list for `is_login` when one exists; otherwise
    /// fetches it. The first successful load marks
    /// `is_sessions_first_fetch_finished`.
    pub async fn fetch_sessions(&self, is_login: bool) -> Result<ChatSessionList> {
        let key = FetchKey { is_login };
        *self.fetch_key.lock().unwrap_or_else(PoisonError::into_inner) = key;

        if let Some(cached) = self.fetcher.cached(key) {
            return Ok(cached);
        }

        let data = self.fetcher.fetch(key).await.inspect_err(|e| {
            tracing::warn!("[SessionStore] fetchSessions failed: {}", e);
        })?;
        self.on_fetch_success(&data);
        Ok(data)
    }

    /// Searches the directory. An empty keyword yields nothing and skips the
    /// remote call.
    pub async fn search_sessions(&self, keyword: &str) -> Result<Vec<Session>> {
        if keyword.is_empty() {
            return Ok(Vec::new());
        }

        self.service.search_sessions(keyword).await.inspect_err(|e| {
            tracing::warn!("[SessionStore] searchSessions failed: {}", e);
        })
    }

    pub fn update_search_keywords(&self, keywords: &str) {
        self.state.send_modify(|state| {
            state.is_searching = !keywords.is_empty();
            state.session_search_keywords = keywords.to_string();
        });
        tracing::debug!("[SessionStore] {}", action("updateSearchKeywords"));
    }

    /// Creates a session group.
    pub async fn add_session_group(&self, name: &str) -> Result<String> {
        let id = self
            .service
            .create_session_group(name)
            .await
            .map_err(|e| self.fail("addSessionGroup", e))?;
        self.revalidate("addSessionGroup").await?;
        Ok(id)
    }

    pub async fn update_session_group_name(&self, id: &str, name: &str) -> Result<()> {
        self.service
            .update_session_group(id, name)
            .await
            .map_err(|e| self.fail("updateSessionGroupName", e))?;
        self.revalidate("updateSessionGroupName").await
    }

    /// Deletes a session group; its sessions move to the default partition.
    pub async fn remove_session_group(&self, id: &str) -> Result<()> {
        self.service
            .remove_session_group(id)
            .await
            .map_err(|e| self.fail("removeSessionGroup", e))?;
        self.revalidate("removeSessionGroup").await
    }

    // ============================================================================
    // Internal actions
    // ============================================================================

    /// Runs the reducer over the current sessions and republishes.
    pub fn internal_dispatch_sessions(&self, dispatch: SessionDispatch) {
        let (sessions, groups) = {
            let state = self.state.borrow();
            (
                sessions_reducer(&state.sessions, dispatch),
                state.session_groups.clone(),
            )
        };
        self.internal_process_sessions(sessions, groups, "dispatchSessions");
    }

    /// Optimistically applies `patch`, sends it to the service and always
    /// refreshes so the service's answer replaces the optimistic state.
    pub async fn internal_update_session(&self, id: &str, patch: SessionPatch) -> Result<()> {
        self.internal_dispatch_sessions(SessionDispatch::UpdateSession {
            id: id.to_string(),
            value: patch.clone(),
        });

        let remote = self.service.update_session(id, &patch).await;

        self.fetcher.invalidate();
        let refreshed = self.refetch().await;

        match remote {
            Err(e) => {
                if let Err(refresh_err) = refreshed {
                    tracing::warn!(
                        "[SessionStore] reconcile after failed update of {} failed: {}",
                        id,
                        refresh_err
                    );
                }
                Err(self.fail("updateSession", e))
            }
            Ok(()) => refreshed.map_err(|e| self.fail("updateSession", e)),
        }
    }

    /// Partitions `sessions` and publishes them together with `groups`.
    pub fn internal_process_sessions(
        &self,
        sessions: Vec<Session>,
        groups: Vec<SessionGroup>,
        action_name: &str,
    ) {
        self.publish_sessions(sessions, groups, action_name, false);
    }

    // ============================================================================
    // Helpers
    // ============================================================================

    fn publish_sessions(
        &self,
        sessions: Vec<Session>,
        groups: Vec<SessionGroup>,
        action_name: &str,
        mark_fetched: bool,
    ) {
        let partitions = partition_sessions(&sessions, &groups, self.orphan_group_policy);

        tracing::debug!(
            "[SessionStore] {}: {} sessions ({} pinned, {} groups, {} default)",
            action(action_name),
            sessions.len(),
            partitions.pinned.len(),
            partitions.custom_groups.len(),
            partitions.default.len()
        );

        self.state.send_modify(|state| {
            state.pinned_sessions = partitions.pinned;
            state.custom_session_groups = partitions.custom_groups;
            state.default_sessions = partitions.default;
            state.sessions = sessions;
            state.session_groups = groups;
            if mark_fetched {
                state.is_sessions_first_fetch_finished = true;
            }
        });
    }

    fn on_fetch_success(&self, data: &ChatSessionList) {
        let unchanged = {
            let state = self.state.borrow();
            state.is_sessions_first_fetch_finished
                && state.sessions == data.sessions
                && state.session_groups == data.session_groups
        };
        if unchanged {
            tracing::trace!("[SessionStore] fetched list unchanged, skipping");
            return;
        }

        self.publish_sessions(
            data.sessions.clone(),
            data.session_groups.clone(),
            "useFetchSessions/updateData",
            true,
        );
    }

    async fn refetch(&self) -> Result<()> {
        let key = *self.fetch_key.lock().unwrap_or_else(PoisonError::into_inner);
        let data = self.fetcher.fetch(key).await?;
        self.on_fetch_success(&data);
        Ok(())
    }

    /// Refreshes after a successful remote mutation.
    async fn revalidate(&self, action_name: &str) -> Result<()> {
        self.fetcher.invalidate();
        self.refetch().await.map_err(|e| self.fail(action_name, e))
    }

    /// Cancels the in-flight metadata update, if any, and installs a new
    /// handle for the caller.
    fn replace_meta_signal(&self) -> CancellationToken {
        let mut slot = self
            .signal_session_meta
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = slot.take() {
            previous.cancel();
        }
        let signal = CancellationToken::new();
        *slot = Some(signal.clone());
        signal
    }

    /// Logs and reports a remote failure, handing the error back.
    fn fail(&self, action_name: &str, err: LobeError) -> LobeError {
        tracing::warn!("[SessionStore] {} failed: {}", action(action_name), err);
        self.notifier
            .error(&self.messages.request_failed(&err.to_string()));
        err
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;
