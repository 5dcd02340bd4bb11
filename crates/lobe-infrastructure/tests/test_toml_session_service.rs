use chrono::Utc;
use lobe_core::LobeError;
use lobe_core::session::{
    DEFAULT_GROUP_ID, MetaPatch, SessionPatch, SessionService, SessionType,
    default_agent_session,
};
use lobe_infrastructure::TomlSessionService;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

fn service(temp_dir: &TempDir) -> TomlSessionService {
    TomlSessionService::new(temp_dir.path().join("sessions.toml"))
}

fn titled(title: &str) -> lobe_core::session::Session {
    let mut session = default_agent_session(Utc::now());
    session.meta.title = Some(title.to_string());
    session
}

#[tokio::test]
async fn test_missing_file_is_empty_directory() {
    let temp_dir = TempDir::new().unwrap();
    let service = service(&temp_dir);

    let list = service.get_grouped_sessions().await.expect("Should read");
    assert!(list.sessions.is_empty());
    assert!(list.session_groups.is_empty());
    assert!(!service.path().exists(), "Reads should not create the file");
}

#[tokio::test]
async fn test_sessions_survive_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let id = {
        let service = service(&temp_dir);
        let id = service
            .create_session(SessionType::Agent, &titled("Persisted"))
            .await
            .unwrap();
        service
            .update_session(&id, &SessionPatch::pinned(true))
            .await
            .unwrap();
        id
    };

    let reopened = service(&temp_dir);
    let list = reopened.get_grouped_sessions().await.unwrap();
    assert_eq!(list.sessions.len(), 1);
    assert_eq!(list.sessions[0].id, id);
    assert!(list.sessions[0].pinned);
    assert_eq!(list.sessions[0].meta.title.as_deref(), Some("Persisted"));
}

#[tokio::test]
async fn test_clone_inserts_after_source() {
    let temp_dir = TempDir::new().unwrap();
    let service = service(&temp_dir);
    let first = service
        .create_session(SessionType::Agent, &titled("First"))
        .await
        .unwrap();
    let second = service
        .create_session(SessionType::Agent, &titled("Second"))
        .await
        .unwrap();

    let copy = service
        .clone_session(&first, "First (copy)")
        .await
        .unwrap()
        .expect("Should clone existing session");

    let ids: Vec<_> = service
        .get_grouped_sessions()
        .await
        .unwrap()
        .sessions
        .into_iter()
        .map(|s| s.id)
        .collect();
    assert_eq!(ids, vec![first, copy, second]);

    assert_eq!(service.clone_session("missing", "x").await.unwrap(), None);
}

#[tokio::test]
async fn test_cancelled_meta_update_is_not_written() {
    let temp_dir = TempDir::new().unwrap();
    let service = service(&temp_dir);
    let id = service
        .create_session(SessionType::Agent, &titled("Before"))
        .await
        .unwrap();

    let cancel = CancellationToken::new();
    cancel.cancel();
    let result = service
        .update_session_meta(&id, &MetaPatch::title("After"), cancel)
        .await;

    assert_eq!(result, Err(LobeError::Cancelled));
    let list = service.get_grouped_sessions().await.unwrap();
    assert_eq!(list.sessions[0].meta.title.as_deref(), Some("Before"));
}

#[tokio::test]
async fn test_meta_update_on_missing_session_is_not_found() {
    let temp_dir = TempDir::new().unwrap();
    let service = service(&temp_dir);

    let err = service
        .update_session_meta("missing", &MetaPatch::title("x"), CancellationToken::new())
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_group_lifecycle() {
    let temp_dir = TempDir::new().unwrap();
    let service = service(&temp_dir);
    let group = service.create_session_group("Work").await.unwrap();
    let id = service
        .create_session(SessionType::Agent, &titled("Report"))
        .await
        .unwrap();
    service
        .update_session(&id, &SessionPatch::group(group.clone()))
        .await
        .unwrap();

    service.update_session_group(&group, "Office").await.unwrap();
    let list = service.get_grouped_sessions().await.unwrap();
    assert_eq!(list.session_groups[0].name, "Office");
    assert_eq!(list.sessions[0].group.as_deref(), Some(group.as_str()));

    service.remove_session_group(&group).await.unwrap();
    let list = service.get_grouped_sessions().await.unwrap();
    assert!(list.session_groups.is_empty());
    assert_eq!(list.sessions[0].group.as_deref(), Some(DEFAULT_GROUP_ID));
}

#[tokio::test]
async fn test_search_and_clear() {
    let temp_dir = TempDir::new().unwrap();
    let service = service(&temp_dir);
    service
        .create_session(SessionType::Agent, &titled("Rust reviewer"))
        .await
        .unwrap();
    service
        .create_session(SessionType::Agent, &titled("Poet"))
        .await
        .unwrap();

    let found = service.search_sessions("rust").await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].meta.title.as_deref(), Some("Rust reviewer"));

    service.remove_all_sessions().await.unwrap();
    assert!(service.search_sessions("rust").await.unwrap().is_empty());
    assert!(service.get_grouped_sessions().await.unwrap().sessions.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creates_are_all_persisted() {
    let temp_dir = TempDir::new().unwrap();
    let service = service(&temp_dir);

    let tasks: Vec<_> = (0..32)
        .map(|i| {
            let service = service.clone();
            tokio::spawn(async move {
                service
                    .create_session(SessionType::Agent, &titled(&format!("Session {i}")))
                    .await
            })
        })
        .collect();

    let mut ids = Vec::new();
    for task in tasks {
        ids.push(task.await.unwrap().expect("Every create should succeed"));
    }

    let stored = service.get_grouped_sessions().await.unwrap().sessions;
    assert_eq!(stored.len(), 32);
    for id in &ids {
        assert!(stored.iter().any(|s| &s.id == id), "Missing session {id}");
    }
}
