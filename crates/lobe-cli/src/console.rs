//! Terminal rendering of store notifications.

use lobe_application::{Notification, Notifier};

/// Prints notifications to stderr so stdout stays machine-readable.
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        match notification {
            Notification::Loading { content, .. } => eprintln!("⏳ {}", content),
            Notification::Destroy { .. } => {}
            Notification::Success(content) => eprintln!("✅ {}", content),
            Notification::Error(content) => eprintln!("❌ {}", content),
        }
    }
}
