use anyhow::{Result, bail};
use lobe_application::SessionStore;

pub async fn add(store: &SessionStore, name: &str) -> Result<()> {
    let id = store.add_session_group(name).await?;
    println!("{}", id);
    Ok(())
}

pub async fn rename(store: &SessionStore, id: &str, name: &str) -> Result<()> {
    ensure_group(store, id)?;
    store.update_session_group_name(id, name).await?;
    Ok(())
}

pub async fn remove(store: &SessionStore, id: &str) -> Result<()> {
    ensure_group(store, id)?;
    store.remove_session_group(id).await?;
    Ok(())
}

fn ensure_group(store: &SessionStore, id: &str) -> Result<()> {
    if !store.state().session_groups.iter().any(|g| g.id == id) {
        bail!("Session group not found: {}", id);
    }
    Ok(())
}
