use serde::Serialize;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationVariant {
    Default,
    Destructive,
}

/// Transient, user-facing message. The UI shell decides how to show it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub variant: NotificationVariant,
}

impl Notification {
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        let notification = Self {
            title: title.into(),
            description: description.into(),
            variant: NotificationVariant::Default,
        };
        info!(
            "Notify: {}: {}",
            notification.title, notification.description
        );
        notification
    }

    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        let notification = Self {
            title: title.into(),
            description: description.into(),
            variant: NotificationVariant::Destructive,
        };
        warn!(
            "Notify: {}: {}",
            notification.title, notification.description
        );
        notification
    }

    #[cfg(test)]
    pub fn is_destructive(&self) -> bool {
        self.variant == NotificationVariant::Destructive
    }
}
