//! In-process notification bus backed by a tokio broadcast channel.

use tokio::sync::broadcast;

use smartspace_domain::notification::{Notification, Severity};

use crate::ports::Notifier;

/// In-process [`Notifier`] using a tokio [`broadcast`] channel.
///
/// Notifying succeeds even when there are no active subscribers
/// (the notification is simply dropped).
pub struct NotificationBus {
    sender: broadcast::Sender<Notification>,
}

impl NotificationBus {
    /// Create a new bus with the given channel capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to notifications on this bus.
    ///
    /// Returns a receiver that will get all notifications sent *after*
    /// the subscription is created.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }
}

impl Notifier for NotificationBus {
    fn notify(&self, message: &str, severity: Severity) {
        // broadcast::send fails only when there are zero receivers.
        let _ = self.sender.send(Notification::new(message, severity));
    }
}
