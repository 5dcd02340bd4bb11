//! Partial updates for sessions.
//!
//! Every patch type mirrors a model type with all fields optional. `None`
//! leaves the target field untouched; `Some` overwrites it.

use super::model::{AgentConfig, MetaData, ModelParams, Session};
use serde::{Deserialize, Serialize};

/// Partial display metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetaPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl MetaPatch {
    /// Patch that only sets the title.
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn apply_to(&self, meta: &mut MetaData) {
        if let Some(title) = &self.title {
            meta.title = Some(title.clone());
        }
        if let Some(description) = &self.description {
            meta.description = Some(description.clone());
        }
        if let Some(avatar) = &self.avatar {
            meta.avatar = Some(avatar.clone());
        }
        if let Some(background_color) = &self.background_color {
            meta.background_color = Some(background_color.clone());
        }
        if let Some(tags) = &self.tags {
            meta.tags = tags.clone();
        }
    }
}

/// Partial sampling parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelParamsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl ModelParamsPatch {
    pub fn apply_to(&self, params: &mut ModelParams) {
        if let Some(v) = self.temperature {
            params.temperature = v;
        }
        if let Some(v) = self.top_p {
            params.top_p = v;
        }
        if let Some(v) = self.presence_penalty {
            params.presence_penalty = v;
        }
        if let Some(v) = self.frequency_penalty {
            params.frequency_penalty = v;
        }
        if let Some(v) = self.max_tokens {
            params.max_tokens = Some(v);
        }
    }
}

/// Partial agent configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentConfigPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<ModelParamsPatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugins: Option<Vec<String>>,
}

impl AgentConfigPatch {
    pub fn apply_to(&self, config: &mut AgentConfig) {
        if let Some(model) = &self.model {
            config.model = model.clone();
        }
        if let Some(provider) = &self.provider {
            config.provider = provider.clone();
        }
        if let Some(system_role) = &self.system_role {
            config.system_role = system_role.clone();
        }
        if let Some(params) = &self.params {
            params.apply_to(&mut config.params);
        }
        if let Some(plugins) = &self.plugins {
            config.plugins = plugins.clone();
        }
    }
}

/// Partial update accepted by the generic update-and-sync path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<MetaPatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pinned: Option<bool>,
}

impl SessionPatch {
    pub fn pinned(pinned: bool) -> Self {
        Self {
            pinned: Some(pinned),
            ..Self::default()
        }
    }

    pub fn group(group: impl Into<String>) -> Self {
        Self {
            group: Some(group.into()),
            ..Self::default()
        }
    }

    /// Applies the patch to a session in place.
    ///
    /// `pinned` and `group` are replaced; `meta` is merged field by field.
    pub fn apply_to(&self, session: &mut Session) {
        if let Some(group) = &self.group {
            session.group = Some(group.clone());
        }
        if let Some(meta) = &self.meta {
            meta.apply_to(&mut session.meta);
        }
        if let Some(pinned) = self.pinned {
            session.pinned = pinned;
        }
    }
}

/// The partial session handed to `create_session`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pinned: Option<bool>,
    #[serde(default)]
    pub meta: MetaPatch,
    #[serde(default)]
    pub config: AgentConfigPatch,
}

impl SessionDraft {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            meta: MetaPatch::title(title),
            ..Self::default()
        }
    }
}
