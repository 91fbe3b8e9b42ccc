//! Debounced deferred execution.
//!
//! Search-as-you-type coalesces keystrokes: each submission supersedes the
//! previous one and restarts the quiet window, and only the latest value
//! fires once the window elapses with no further input. Time is injected
//! by the host so tests stay deterministic.

use std::time::{Duration, Instant};

/// Coalesces a stream of values down to the last one per quiet window.
#[derive(Debug)]
pub struct Debouncer {
    window: Duration,
    pending: Option<(String, Instant)>,
}

impl Debouncer {
    /// A debouncer with the given quiet window.
    #[must_use]
    pub const fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    /// Submit a value, superseding any pending one and restarting the window.
    pub fn submit(&mut self, value: impl Into<String>, now: Instant) {
        self.pending = Some((value.into(), now + self.window));
    }

    /// Take the pending value once its window has elapsed.
    ///
    /// Returns `None` while the window is still open or nothing is pending.
    /// A fired value is consumed; it will not fire again.
    pub fn fire_due(&mut self, now: Instant) -> Option<String> {
        match &self.pending {
            Some((_, deadline)) if *deadline <= now => {
                self.pending.take().map(|(value, _)| value)
            }
            _ => None,
        }
    }

    /// Drop the pending value without firing it.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Whether a value is waiting to fire.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending value is due to fire.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, deadline)| *deadline)
    }
}
