//! Quiet-period debouncer for search input.

use std::time::{Duration, Instant};

/// Holds the latest pushed value until no newer value arrives for `delay`.
///
/// Time is passed in explicitly so callers decide the clock; the controller
/// uses `Instant::now()` and tests use fixed offsets.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Record a new value at `now`, replacing any pending one and restarting
    /// the quiet period.
    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now + self.delay));
    }

    /// When the pending value becomes ready, if there is one.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, deadline)| *deadline)
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Take the pending value if its quiet period has elapsed by `now`.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((_, deadline)) if *deadline <= now => self.pending.take().map(|(value, _)| value),
            _ => None,
        }
    }

    /// Drop the pending value.
    pub fn cancel(&mut self) {
        self.pending = None;
    }
}
