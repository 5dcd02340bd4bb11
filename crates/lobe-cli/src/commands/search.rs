use super::format_session;
use anyhow::Result;
use lobe_application::SessionStore;

pub async fn run(store: &SessionStore, keyword: &str) -> Result<()> {
    store.update_search_keywords(keyword);
    let results = store.search_sessions(keyword).await?;

    if results.is_empty() {
        println!("No sessions match {:?}", keyword);
        return Ok(());
    }

    for session in &results {
        println!("{}", format_session(store, session));
    }
    Ok(())
}
