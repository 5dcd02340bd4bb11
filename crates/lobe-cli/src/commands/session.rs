use anyhow::{Result, bail};
use lobe_application::SessionStore;
use lobe_core::session::{MetaPatch, SessionDraft};

pub fn draft(
    title: Option<String>,
    group: Option<String>,
    pin: bool,
    description: Option<String>,
    avatar: Option<String>,
) -> SessionDraft {
    SessionDraft {
        group,
        pinned: pin.then_some(true),
        meta: MetaPatch {
            title,
            description,
            avatar,
            ..MetaPatch::default()
        },
        ..SessionDraft::default()
    }
}

pub async fn create(store: &SessionStore, draft: SessionDraft) -> Result<()> {
    let id = store.create_session(draft, true).await?;
    println!("{}", id);
    Ok(())
}

pub async fn duplicate(store: &SessionStore, id: &str) -> Result<()> {
    ensure_session(store, id)?;
    match store.duplicate_session(id).await? {
        Some(new_id) => println!("{}", new_id),
        None => bail!("Session could not be copied: {}", id),
    }
    Ok(())
}

pub async fn pin(store: &SessionStore, id: &str, pinned: bool) -> Result<()> {
    ensure_session(store, id)?;
    store.pin_session(id, pinned).await?;
    Ok(())
}

pub async fn move_to(store: &SessionStore, id: &str, group: &str) -> Result<()> {
    ensure_session(store, id)?;
    store.update_session_group_id(id, group).await?;
    Ok(())
}

/// Metadata updates target the active session, so activate `id` first.
pub async fn rename(store: &SessionStore, id: &str, title: &str) -> Result<()> {
    ensure_session(store, id)?;
    store.switch_session(id);
    store.update_session_meta(MetaPatch::title(title)).await?;
    Ok(())
}

pub async fn remove(store: &SessionStore, id: &str) -> Result<()> {
    ensure_session(store, id)?;
    store.remove_session(id).await?;
    Ok(())
}

pub async fn clear(store: &SessionStore, yes: bool) -> Result<()> {
    if !yes {
        bail!("Refusing to remove all sessions without --yes");
    }
    store.clear_sessions().await?;
    Ok(())
}

fn ensure_session(store: &SessionStore, id: &str) -> Result<()> {
    if store.session_by_id(id).is_none() {
        bail!("Session not found: {}", id);
    }
    Ok(())
}
