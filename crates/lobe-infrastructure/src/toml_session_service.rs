//! TOML file-backed session service.

use crate::directory::SessionDirectory;
use crate::storage::AtomicTomlFile;
use async_trait::async_trait;
use chrono::Utc;
use lobe_core::session::{
    ChatSessionList, MetaPatch, Session, SessionPatch, SessionService, SessionType,
};
use lobe_core::{LobeError, Result};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

/// A `SessionService` that persists the directory to a single TOML file.
///
/// Every mutation is a locked read-modify-write of the whole file, executed on
/// the blocking thread pool.
#[derive(Debug, Clone)]
pub struct TomlSessionService {
    file: AtomicTomlFile<SessionDirectory>,
}

impl TomlSessionService {
    pub fn new(path: PathBuf) -> Self {
        tracing::debug!("[TomlSessionService] using {:?}", path);
        Self {
            file: AtomicTomlFile::new(path),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.file.path().to_path_buf()
    }

    async fn read<R, F>(&self, f: F) -> Result<R>
    where
        R: Send + 'static,
        F: FnOnce(&SessionDirectory) -> R + Send + 'static,
    {
        let file = self.file.clone();
        tokio::task::spawn_blocking(move || {
            let directory = file.load()?.unwrap_or_default();
            Ok(f(&directory))
        })
        .await
        .map_err(|e| LobeError::internal(format!("storage task failed: {}", e)))?
    }

    async fn write<R, F>(&self, f: F) -> Result<R>
    where
        R: Send + 'static,
        F: FnOnce(&mut SessionDirectory) -> Result<R> + Send + 'static,
    {
        let file = self.file.clone();
        tokio::task::spawn_blocking(move || file.update(SessionDirectory::default(), f))
            .await
            .map_err(|e| LobeError::internal(format!("storage task failed: {}", e)))?
    }
}

#[async_trait]
impl SessionService for TomlSessionService {
    async fn create_session(&self, session_type: SessionType, session: &Session) -> Result<String> {
        let session = session.clone();
        self.write(move |dir| Ok(dir.create_session(session_type, &session, Utc::now())))
            .await
    }

    async fn clone_session(&self, id: &str, new_title: &str) -> Result<Option<String>> {
        let id = id.to_string();
        let new_title = new_title.to_string();
        self.write(move |dir| Ok(dir.clone_session(&id, &new_title, Utc::now())))
            .await
    }

    async fn update_session(&self, id: &str, patch: &SessionPatch) -> Result<()> {
        let id = id.to_string();
        let patch = patch.clone();
        self.write(move |dir| dir.update_session(&id, &patch, Utc::now()))
            .await
    }

    async fn update_session_meta(
        &self,
        id: &str,
        meta: &MetaPatch,
        cancel: CancellationToken,
    ) -> Result<()> {
        if cancel.is_cancelled() {
            return Err(LobeError::Cancelled);
        }

        let id = id.to_string();
        let meta = meta.clone();
        self.write(move |dir| {
            // a cancelled write must not reach the file
            if cancel.is_cancelled() {
                return Err(LobeError::Cancelled);
            }
            dir.update_session_meta(&id, &meta, Utc::now())
        })
        .await
    }

    async fn remove_session(&self, id: &str) -> Result<()> {
        let id = id.to_string();
        self.write(move |dir| {
            dir.remove_session(&id);
            Ok(())
        })
        .await
    }

    async fn remove_all_sessions(&self) -> Result<()> {
        self.write(|dir| {
            dir.remove_all_sessions();
            Ok(())
        })
        .await
    }

    async fn get_grouped_sessions(&self) -> Result<ChatSessionList> {
        self.read(|dir| dir.grouped()).await
    }

    async fn search_sessions(&self, keyword: &str) -> Result<Vec<Session>> {
        let keyword = keyword.to_string();
        self.read(move |dir| dir.search(&keyword)).await
    }

    async fn create_session_group(&self, name: &str) -> Result<String> {
        let name = name.to_string();
        self.write(move |dir| Ok(dir.create_group(&name))).await
    }

    async fn update_session_group(&self, id: &str, name: &str) -> Result<()> {
        let id = id.to_string();
        let name = name.to_string();
        self.write(move |dir| dir.update_group(&id, &name)).await
    }

    async fn remove_session_group(&self, id: &str) -> Result<()> {
        let id = id.to_string();
        self.write(move |dir| {
            dir.remove_group(&id, Utc::now());
            Ok(())
        })
        .await
    }
}
