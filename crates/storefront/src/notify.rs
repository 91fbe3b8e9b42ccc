//! Single-slot toast notifications.
//!
//! The page shows at most one toast at a time. Pushing a new toast while
//! one is visible replaces it and restarts the clock. Expiry is driven by
//! the host's tick, not a background thread, so tests control time.

use std::time::{Duration, Instant};

/// Visual severity of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Info,
    Warning,
    Error,
}

impl ToastLevel {
    /// CSS class suffix for the toast container.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// A transient notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
}

/// Owns the single toast slot and its expiry deadline.
#[derive(Debug)]
pub struct ToastCenter {
    ttl: Duration,
    current: Option<(Toast, Instant)>,
}

impl ToastCenter {
    /// A center whose toasts stay visible for `ttl`.
    #[must_use]
    pub const fn new(ttl: Duration) -> Self {
        Self { ttl, current: None }
    }

    /// Show a toast, replacing any visible one and restarting its clock.
    pub fn push(&mut self, level: ToastLevel, message: impl Into<String>, now: Instant) {
        let toast = Toast {
            level,
            message: message.into(),
        };
        self.current = Some((toast, now + self.ttl));
    }

    /// The visible toast, if any.
    #[must_use]
    pub fn current(&self) -> Option<&Toast> {
        self.current.as_ref().map(|(toast, _)| toast)
    }

    /// Drop the toast once its deadline passes. Returns `true` when a
    /// toast was dismissed on this call.
    pub fn expire_due(&mut self, now: Instant) -> bool {
        match &self.current {
            Some((_, deadline)) if *deadline <= now => {
                self.current = None;
                true
            }
            _ => false,
        }
    }

    /// When the visible toast is due to disappear.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.current.as_ref().map(|(_, deadline)| *deadline)
    }
}
