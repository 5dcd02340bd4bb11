//! Localized user-facing messages.

use lobe_core::settings::Locale;
use minijinja::{Environment, context};

/// Keys of the messages the session store shows to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKey {
    /// Title of a session that has none.
    DefaultSessionTitle,
    /// Title of a duplicated session; takes `title`.
    DuplicateTitle,
    DuplicateLoading,
    DuplicateSuccess,
    CopyFail,
    /// Generic remote failure; takes `reason`.
    RequestFailed,
}

impl MessageKey {
    pub fn id(self) -> &'static str {
        match self {
            MessageKey::DefaultSessionTitle => "defaultSession",
            MessageKey::DuplicateTitle => "duplicateSession.title",
            MessageKey::DuplicateLoading => "duplicateSession.loading",
            MessageKey::DuplicateSuccess => "duplicateSession.success",
            MessageKey::CopyFail => "copyFail",
            MessageKey::RequestFailed => "requestFailed",
        }
    }
}

fn template(locale: Locale, key: MessageKey) -> &'static str {
    match (locale, key) {
        (Locale::EnUs, MessageKey::DefaultSessionTitle) => "Custom Agent",
        (Locale::EnUs, MessageKey::DuplicateTitle) => "{{ title }} (copy)",
        (Locale::EnUs, MessageKey::DuplicateLoading) => "Copying...",
        (Locale::EnUs, MessageKey::DuplicateSuccess) => "Copy successful",
        (Locale::EnUs, MessageKey::CopyFail) => "Copy failed",
        (Locale::EnUs, MessageKey::RequestFailed) => "Request failed: {{ reason }}",
        (Locale::ZhCn, MessageKey::DefaultSessionTitle) => "自定义助手",
        (Locale::ZhCn, MessageKey::DuplicateTitle) => "{{ title }} 副本",
        (Locale::ZhCn, MessageKey::DuplicateLoading) => "复制中...",
        (Locale::ZhCn, MessageKey::DuplicateSuccess) => "复制成功",
        (Locale::ZhCn, MessageKey::CopyFail) => "复制失败",
        (Locale::ZhCn, MessageKey::RequestFailed) => "请求失败：{{ reason }}",
    }
}

/// Message catalog for one locale.
pub struct Messages {
    locale: Locale,
    env: Environment<'static>,
}

impl std::fmt::Debug for Messages {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Messages")
            .field("locale", &self.locale)
            .finish()
    }
}

impl Default for Messages {
    fn default() -> Self {
        Self::new(Locale::default())
    }
}

impl Messages {
    pub fn new(locale: Locale) -> Self {
        Self {
            locale,
            env: Environment::new(),
        }
    }

    /// Renders a message that takes no arguments.
    pub fn text(&self, key: MessageKey) -> String {
        self.render(key, context! {})
    }

    /// Title given to the copy of a session titled `title`.
    pub fn duplicate_title(&self, title: &str) -> String {
        self.render(MessageKey::DuplicateTitle, context! { title => title })
    }

    pub fn request_failed(&self, reason: &str) -> String {
        self.render(MessageKey::RequestFailed, context! { reason => reason })
    }

    fn render(&self, key: MessageKey, ctx: minijinja::Value) -> String {
        let source = template(self.locale, key);
        match self.env.render_str(source, ctx) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("[Messages] failed to render {}: {}", key.id(), e);
                source.to_string()
            }
        }
    }
}
