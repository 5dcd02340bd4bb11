//! Path resolution for lobe configuration and data files.
//!
//! ```text
//! ~/.config/lobe/          # Config directory (platform config dir)
//! ├── config.toml          # Application configuration
//! └── sessions.toml        # Session directory used by the CLI
//! ```

use std::path::PathBuf;

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Platform config directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find config directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for lobe_core::LobeError {
    fn from(err: PathError) -> Self {
        lobe_core::LobeError::config(err.to_string())
    }
}

/// Unified path management for lobe.
pub struct LobePaths;

impl LobePaths {
    const APP_DIR: &'static str = "lobe";

    /// Returns the lobe configuration directory (e.g. `~/.config/lobe/`).
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(Self::APP_DIR))
            .ok_or(PathError::ConfigDirNotFound)
    }

    /// Returns the path to `config.toml`.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the default session directory file.
    pub fn sessions_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("sessions.toml"))
    }
}
