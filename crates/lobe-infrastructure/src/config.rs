//! Application configuration loaded from `config.toml`.

use crate::paths::LobePaths;
use lobe_core::Result;
use lobe_core::session::OrphanGroupPolicy;
use lobe_core::settings::{DefaultAgentSettings, Locale};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration of a session directory client.
///
/// ```toml
/// locale = "zh-CN"
/// orphan_group_policy = "drop"
/// data_file = "/tmp/sessions.toml"
///
/// [default_agent.config]
/// model = "gpt-4o-mini"
///
/// [default_agent.meta]
/// avatar = "🦊"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LobeConfig {
    #[serde(default)]
    pub locale: Locale,
    #[serde(default)]
    pub orphan_group_policy: OrphanGroupPolicy,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_file: Option<PathBuf>,
    #[serde(default)]
    pub default_agent: DefaultAgentSettings,
}

impl LobeConfig {
    /// Resolves the session data file, falling back to the config directory.
    pub fn data_file(&self) -> Result<PathBuf> {
        match &self.data_file {
            Some(path) => Ok(path.clone()),
            None => Ok(LobePaths::sessions_file()?),
        }
    }
}

/// Loads the configuration at `path`; a missing or empty file yields defaults.
pub fn load_config(path: &Path) -> Result<LobeConfig> {
    if !path.exists() {
        tracing::debug!("[Config] {:?} not found, using defaults", path);
        return Ok(LobeConfig::default());
    }

    let content = std::fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(LobeConfig::default());
    }

    let config: LobeConfig = toml::from_str(&content)?;
    tracing::info!(
        "[Config] loaded {:?} (locale: {}, orphan policy: {:?})",
        path,
        config.locale,
        config.orphan_group_policy
    );
    Ok(config)
}

/// Loads the configuration from the default location.
pub fn load_default_config() -> Result<LobeConfig> {
    load_config(&LobePaths::config_file()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = load_config(&temp_dir.path().join("config.toml")).unwrap();
        assert_eq!(config, LobeConfig::default());
        assert_eq!(config.orphan_group_policy, OrphanGroupPolicy::FallbackToDefault);
    }

    #[test]
    fn test_parse_full_config() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
locale = "zh-CN"
orphan_group_policy = "drop"
data_file = "/tmp/lobe-sessions.toml"

[default_agent.config]
model = "gpt-4o-mini"

[default_agent.config.params]
temperature = 0.5

[default_agent.meta]
avatar = "🦊"
"#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.locale, Locale::ZhCn);
        assert_eq!(config.orphan_group_policy, OrphanGroupPolicy::Drop);
        assert_eq!(
            config.data_file().unwrap(),
            PathBuf::from("/tmp/lobe-sessions.toml")
        );
        assert_eq!(
            config.default_agent.config.model.as_deref(),
            Some("gpt-4o-mini")
        );
        assert_eq!(
            config
                .default_agent
                .config
                .params
                .as_ref()
                .and_then(|p| p.temperature),
            Some(0.5)
        );
        assert_eq!(config.default_agent.meta.avatar.as_deref(), Some("🦊"));
    }

    #[test]
    fn test_invalid_config_is_serialization_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "locale = \"fr-FR\"").unwrap();

        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, lobe_core::LobeError::Serialization { .. }));
    }
}
