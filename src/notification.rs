//! Single-slot transient notifications

use uuid::Uuid;

/// Severity of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

/// A message shown to the user until it expires or is replaced
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: Uuid,
    pub kind: NotificationKind,
    pub message: String,
}

/// Holds at most one notification
#[derive(Debug, Clone, Default)]
pub struct NotificationSlot {
    current: Option<Notification>,
}

impl NotificationSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces whatever is shown and returns the id to expire later
    pub fn show(&mut self, kind: NotificationKind, message: impl Into<String>) -> Uuid {
        let notification = Notification {
            id: Uuid::new_v4(),
            kind,
            message: message.into(),
        };
        let id = notification.id;

        match kind {
            NotificationKind::Success => {
                tracing::info!(message = %notification.message, "Notification")
            }
            NotificationKind::Error => {
                tracing::warn!(message = %notification.message, "Notification")
            }
        }

        self.current = Some(notification);
        id
    }

    /// Clears the slot if `id` is still the one shown
    ///
    /// Returns true when something was dismissed.
    pub fn expire(&mut self, id: Uuid) -> bool {
        if self.current.as_ref().is_some_and(|n| n.id == id) {
            self.current = None;
            true
        } else {
            false
        }
    }

    pub fn current(&self) -> Option<&Notification> {
        self.current.as_ref()
    }
}
