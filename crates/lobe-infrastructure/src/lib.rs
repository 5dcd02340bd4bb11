//! Infrastructure layer for Lobe Sessions.
//!
//! Bundled `SessionService` implementations, configuration loading and path
//! resolution.

pub mod config;
pub mod directory;
pub mod in_memory_session_service;
pub mod paths;
pub mod storage;
pub mod toml_session_service;

pub use crate::config::{LobeConfig, load_config, load_default_config};
pub use crate::directory::SessionDirectory;
pub use crate::in_memory_session_service::InMemorySessionService;
pub use crate::paths::LobePaths;
pub use crate::toml_session_service::TomlSessionService;
