//! Operator-facing alerts and notifications.
//!
//! The dialog raises two kinds of feedback: a blocking alert when a confirm
//! is rejected, and a notification when the operator closes the dialog and
//! the tests are stopped. [`OperatorFeedback`] lets the embedder route both
//! to its own toolkit; [`LogFeedback`] and (with the `notifications`
//! feature) [`DesktopFeedback`] cover headless and desktop use.

use hardpy_panel_core::logging::targets;

/// Severity of a [`Notice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NoticeLevel {
    #[default]
    Info,
    Warning,
    Error,
}

/// A non-blocking notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub body: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            body: body.into(),
        }
    }

    /// Raised when the operator closes the dialog without confirming.
    pub fn tests_stopped() -> Self {
        Self::new(
            NoticeLevel::Error,
            "Notification",
            "The window was closed. Tests stopped.",
        )
    }
}

/// Presents feedback to the operator.
pub trait OperatorFeedback: Send + Sync {
    /// Show a blocking alert with `message`.
    fn alert(&self, message: &str);

    /// Show a notification.
    fn notify(&self, notice: &Notice);
}

/// Writes all feedback to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogFeedback;

impl OperatorFeedback for LogFeedback {
    fn alert(&self, message: &str) {
        tracing::warn!(target: targets::DIALOG, "alert: {message}");
    }

    fn notify(&self, notice: &Notice) {
        match notice.level {
            NoticeLevel::Info => {
                tracing::info!(target: targets::DIALOG, title = %notice.title, "{}", notice.body)
            }
            NoticeLevel::Warning => {
                tracing::warn!(target: targets::DIALOG, title = %notice.title, "{}", notice.body)
            }
            NoticeLevel::Error => {
                tracing::error!(target: targets::DIALOG, title = %notice.title, "{}", notice.body)
            }
        }
    }
}

/// Shows notifications on the desktop and logs alerts.
#[cfg(feature = "notifications")]
#[derive(Debug, Clone, Default)]
pub struct DesktopFeedback {
    app_name: Option<String>,
}

#[cfg(feature = "notifications")]
impl DesktopFeedback {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the application name shown with notifications.
    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = Some(app_name.into());
        self
    }
}

#[cfg(all(feature = "notifications", target_os = "linux"))]
impl From<NoticeLevel> for notify_rust::Urgency {
    fn from(level: NoticeLevel) -> Self {
        match level {
            NoticeLevel::Info => notify_rust::Urgency::Low,
            NoticeLevel::Warning => notify_rust::Urgency::Normal,
            NoticeLevel::Error => notify_rust::Urgency::Critical,
        }
    }
}

#[cfg(feature = "notifications")]
impl OperatorFeedback for DesktopFeedback {
    fn alert(&self, message: &str) {
        LogFeedback.alert(message);
    }

    fn notify(&self, notice: &Notice) {
        LogFeedback.notify(notice);

        let mut notification = notify_rust::Notification::new();
        notification.summary(&notice.title).body(&notice.body);
        if let Some(app_name) = &self.app_name {
            notification.appname(app_name);
        }
        #[cfg(target_os = "linux")]
        notification.urgency(notice.level.into());

        if let Err(err) = notification.show() {
            tracing::warn!(target: targets::DIALOG, error = %err, "desktop notification failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tests_stopped_notice() {
        let notice = Notice::tests_stopped();
        assert_eq!(notice.level, NoticeLevel::Error);
        assert_eq!(notice.title, "Notification");
        assert_eq!(notice.body, "The window was closed. Tests stopped.");
    }

    #[test]
    fn test_log_feedback_does_not_panic() {
        LogFeedback.alert("The field must not be empty");
        LogFeedback.notify(&Notice::tests_stopped());
    }
}
