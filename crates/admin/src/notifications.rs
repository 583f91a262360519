//! Operator-facing notifications.
//!
//! The console reports outcomes through a [`Notifier`]; the CLI prints them,
//! tests collect them in a [`NotificationLog`].

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

/// Visual weight of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationVariant {
    Default,
    Destructive,
}

/// A transient message shown to the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub variant: NotificationVariant,
    pub title: String,
    pub description: Option<String>,
}

impl Notification {
    /// Success notification titled "Success".
    #[must_use]
    pub fn success(description: impl Into<String>) -> Self {
        Self {
            variant: NotificationVariant::Default,
            title: "Success".to_string(),
            description: Some(description.into()),
        }
    }

    /// Destructive notification titled "Error".
    #[must_use]
    pub fn error(description: Option<String>) -> Self {
        Self {
            variant: NotificationVariant::Destructive,
            title: "Error".to_string(),
            description,
        }
    }

    #[must_use]
    pub const fn is_destructive(&self) -> bool {
        matches!(self.variant, NotificationVariant::Destructive)
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.variant {
            NotificationVariant::Default => "[ok]",
            NotificationVariant::Destructive => "[error]",
        };
        match &self.description {
            Some(description) => write!(f, "{tag} {}: {description}", self.title),
            None => write!(f, "{tag} {}", self.title),
        }
    }
}

/// Sink for console notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

impl<T: Notifier + ?Sized> Notifier for Arc<T> {
    fn notify(&self, notification: Notification) {
        (**self).notify(notification);
    }
}

/// Notifier that keeps every notification in memory.
///
/// Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct NotificationLog {
    entries: Arc<Mutex<Vec<Notification>>>,
}

impl NotificationLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything recorded so far.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Notification> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Take everything recorded so far, leaving the log empty.
    #[must_use]
    pub fn drain(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.entries.lock().unwrap_or_else(PoisonError::into_inner))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Notifier for NotificationLog {
    fn notify(&self, notification: Notification) {
        tracing::debug!(%notification, "Notification raised");
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            Notification::success("Privilege activated").to_string(),
            "[ok] Success: Privilege activated"
        );
        assert_eq!(
            Notification::error(Some("Could not reject request".to_string())).to_string(),
            "[error] Error: Could not reject request"
        );
        assert_eq!(Notification::error(None).to_string(), "[error] Error");
    }

    #[test]
    fn test_log_is_shared_between_clones() {
        let log = NotificationLog::new();
        let handle = log.clone();

        handle.notify(Notification::success("Request rejected"));
        assert_eq!(log.len(), 1);

        let drained = log.drain();
        assert_eq!(drained.len(), 1);
        assert!(!drained.iter().any(Notification::is_destructive));
        assert!(handle.is_empty());
    }
}
