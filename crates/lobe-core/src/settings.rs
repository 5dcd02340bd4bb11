//! User settings consumed by the session directory.

use crate::session::{AgentConfigPatch, MetaPatch};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Interface language of user-visible messages.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
)]
pub enum Locale {
    #[default]
    #[serde(rename = "en-US")]
    #[strum(serialize = "en-US")]
    EnUs,
    #[serde(rename = "zh-CN")]
    #[strum(serialize = "zh-CN")]
    ZhCn,
}

/// The user's default agent, layered over the built-in agent template when a
/// session is created.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DefaultAgentSettings {
    #[serde(default)]
    pub config: AgentConfigPatch,
    #[serde(default)]
    pub meta: MetaPatch,
}

/// Source of user settings.
pub trait SettingsProvider: Send + Sync {
    /// Returns the user's default agent settings.
    fn default_agent(&self) -> DefaultAgentSettings;
}

/// A settings provider backed by a fixed value.
#[derive(Debug, Clone, Default)]
pub struct StaticSettingsProvider {
    default_agent: DefaultAgentSettings,
}

impl StaticSettingsProvider {
    pub fn new(default_agent: DefaultAgentSettings) -> Self {
        Self { default_agent }
    }
}

impl SettingsProvider for StaticSettingsProvider {
    fn default_agent(&self) -> DefaultAgentSettings {
        self.default_agent.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_locale_tags() {
        assert_eq!(Locale::from_str("zh-CN").unwrap(), Locale::ZhCn);
        assert_eq!(Locale::EnUs.to_string(), "en-US");
    }

    #[test]
    fn test_static_provider_returns_value() {
        let settings = DefaultAgentSettings {
            meta: MetaPatch::title("Helper"),
            ..DefaultAgentSettings::default()
        };
        let provider = StaticSettingsProvider::new(settings.clone());
        assert_eq!(provider.default_agent(), settings);
    }
}
