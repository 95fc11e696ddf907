//! User-facing notifications.
//!
//! # Responsibilities
//! - Model ephemeral, timed toasts as values
//! - Keep the notification kind a closed enum so handling stays exhaustive
//! - Provide a tracing-backed sink for terminal use
//!
//! # Design Decisions
//! - Fire-and-forget: `notify` returns nothing and must never fail
//! - The sink is a trait so tests can record instead of print

use std::time::Duration;

/// Default auto-close for most toasts.
pub const DEFAULT_AUTO_CLOSE: Duration = Duration::from_millis(5000);

/// Auto-close for the in-flight submission toast, which outlives the
/// expected confirmation wait.
pub const IN_FLIGHT_AUTO_CLOSE: Duration = Duration::from_millis(18050);

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Success,
    Warn,
    Error,
}

/// Screen corner a toast is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// One ephemeral user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub text: String,
    pub position: Position,
    pub auto_close: Duration,
}

impl Notification {
    /// Create a notification with the default position and auto-close.
    pub fn new(kind: NotificationKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            position: Position::TopRight,
            auto_close: DEFAULT_AUTO_CLOSE,
        }
    }

    pub fn position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    pub fn auto_close(mut self, auto_close: Duration) -> Self {
        self.auto_close = auto_close;
        self
    }
}

/// Sink for user-facing notifications.
pub trait Notifier {
    /// Deliver a notification. Purely presentational; no return value.
    fn notify(&self, notification: Notification);
}

/// Notifier that renders toasts as structured log lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: Notification) {
        match notification.kind {
            NotificationKind::Info => tracing::info!(toast = %notification.text),
            NotificationKind::Success => tracing::info!(kind = "success", toast = %notification.text),
            NotificationKind::Warn => tracing::warn!(toast = %notification.text),
            NotificationKind::Error => tracing::error!(toast = %notification.text),
        }
    }
}
