//! Application layer for Lobe Sessions.
//!
//! This crate provides the session store that keeps a local, observable copy
//! of the remote session directory and coordinates mutations with it.

pub mod i18n;
pub mod notifier;
pub mod session;

pub use notifier::{ChannelNotifier, Notification, Notifier, TracingNotifier};
pub use session::{SessionState, SessionStore, StoreOptions};
