use tokio::sync::broadcast;

use crate::NotificationReceiver;

#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub enum Notification {
    Error(String),
    Warning(String),
    Info(String),
}

#[derive(Debug)]
pub struct NotificationBroadcast {
    tx: broadcast::Sender<Notification>,
}

impl Default for NotificationBroadcast {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationBroadcast {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(20);
        Self { tx }
    }

    /// Dropped silently when nobody is listening.
    pub fn send(&self, notification: Notification) {
        _ = self.tx.send(notification);
    }

    pub fn subscribe(&self) -> NotificationReceiver {
        self.tx.subscribe()
    }
}
