//! Caller-side coalescing of query keystrokes.
//!
//! The filter engine stays synchronous; input handlers push raw text here and
//! only forward it once typing has paused for the debounce window.
use std::ops::Sub;
use std::time::Duration;

use crate::constants::QUERY_DEBOUNCE;

/// Generic over the clock type so callers can pass `Instant` in production
/// and plain `Duration` offsets in tests.
#[derive(Debug, Clone)]
pub struct QueryDebouncer<T> {
    window: Duration,
    pending: Option<(String, T)>,
}

impl<T> Default for QueryDebouncer<T> {
    fn default() -> Self {
        Self::new(QUERY_DEBOUNCE)
    }
}

impl<T> QueryDebouncer<T> {
    #[must_use]
    pub const fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    #[must_use]
    pub const fn window(&self) -> Duration {
        self.window
    }

    #[must_use]
    pub const fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Record new input text, restarting the window.
    pub fn push(&mut self, text: impl Into<String>, now: T) {
        self.pending = Some((text.into(), now));
    }

    /// Hand over the pending text regardless of the window.
    pub fn flush(&mut self) -> Option<String> {
        self.pending.take().map(|(text, _)| text)
    }
}

impl<T> QueryDebouncer<T>
where
    T: Copy + Sub<T, Output = Duration>,
{
    /// Yield the pending text once `window` has elapsed since the last push.
    pub fn poll(&mut self, now: T) -> Option<String> {
        let ready = self
            .pending
            .as_ref()
            .is_some_and(|(_, pushed_at)| now - *pushed_at >= self.window);
        if ready { self.flush() } else { None }
    }
}
