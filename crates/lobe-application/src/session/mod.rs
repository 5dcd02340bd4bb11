//! Session application services.
//!
//! - `store`: `SessionStore`, the orchestrator UI code talks to
//! - `state`: the observable `SessionState` snapshot and selectors
//! - `fetcher`: coalescing, keyed fetcher for the full session list

mod fetcher;
mod state;
mod store;

pub use fetcher::{FetchKey, SessionListFetcher};
pub use state::{SessionState, session_title};
pub use store::{SessionStore, StoreOptions};
