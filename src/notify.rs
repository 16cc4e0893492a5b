//! Transient user-facing notifications.
//!
//! Components emit notifications; whatever renders them (the WebSocket
//! stream in `server`, a test receiver) subscribes to the broadcast channel.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::debug;

/// Default broadcast channel capacity.
const DEFAULT_BROADCAST_CAPACITY: usize = 64;

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Info,
    Warning,
    Error,
}

/// A single transient notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub description: String,
    pub at: DateTime<Utc>,
}

impl Notification {
    pub fn new(
        kind: NotificationKind,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            title: title.into(),
            description: description.into(),
            at: Utc::now(),
        }
    }
}

/// Cloneable handle that fans notifications out to subscribers.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: broadcast::Sender<Notification>,
}

impl Notifier {
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(DEFAULT_BROADCAST_CAPACITY);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.tx.subscribe()
    }

    pub fn emit(&self, notification: Notification) {
        debug!(
            kind = ?notification.kind,
            title = %notification.title,
            "Notification emitted"
        );
        // Nobody listening is fine.
        let _ = self.tx.send(notification);
    }

    pub fn info(&self, title: impl Into<String>, description: impl Into<String>) {
        self.emit(Notification::new(NotificationKind::Info, title, description));
    }

    pub fn warning(&self, title: impl Into<String>, description: impl Into<String>) {
        self.emit(Notification::new(NotificationKind::Warning, title, description));
    }

    pub fn error(&self, title: impl Into<String>, description: impl Into<String>) {
        self.emit(Notification::new(NotificationKind::Error, title, description));
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}
