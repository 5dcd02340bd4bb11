//! Transient user-visible feedback.

use tokio::sync::mpsc;

/// A notification emitted by the session store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// A long-running operation started; stays visible until destroyed.
    Loading { key: String, content: String },
    /// Dismisses the loading notification with `key`.
    Destroy { key: String },
    Success(String),
    Error(String),
}

/// Sink for transient notifications (toasts, status lines, ...).
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);

    fn loading(&self, key: &str, content: &str) {
        self.notify(Notification::Loading {
            key: key.to_string(),
            content: content.to_string(),
        });
    }

    fn destroy(&self, key: &str) {
        self.notify(Notification::Destroy {
            key: key.to_string(),
        });
    }

    fn success(&self, content: &str) {
        self.notify(Notification::Success(content.to_string()));
    }

    fn error(&self, content: &str) {
        self.notify(Notification::Error(content.to_string()));
    }
}

/// Writes notifications to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification {
            Notification::Loading { key, content } => {
                tracing::info!(target: "notification", key = %key, "{}", content)
            }
            Notification::Destroy { key } => {
                tracing::debug!(target: "notification", key = %key, "dismissed")
            }
            Notification::Success(content) => tracing::info!(target: "notification", "{}", content),
            Notification::Error(content) => tracing::warn!(target: "notification", "{}", content),
        }
    }
}

/// Forwards notifications to a UI task over a channel.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<Notification>,
}

impl ChannelNotifier {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notification: Notification) {
        if self.tx.send(notification).is_err() {
            tracing::debug!("[ChannelNotifier] receiver dropped, notification discarded");
        }
    }
}
