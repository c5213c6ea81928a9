use std::time::{Duration, Instant};

/// Cancellable delayed task driven by explicit instants.
///
/// Each [`Debouncer::push`] cancels whatever was pending and reschedules; [`Debouncer::poll`]
/// hands out the last pushed value once `delay` has passed since that push.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(Instant, T)>,
}

impl<T> Debouncer<T> {
    /// Create a debouncer with the given quiet period.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Quiet period.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule `value` to fire at `now + delay`. Returns `true` if a pending value was
    /// cancelled.
    pub fn push(&mut self, value: T, now: Instant) -> bool {
        self.pending.replace((now + self.delay, value)).is_some()
    }

    /// Drop the pending value, if any.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(_, v)| v)
    }

    /// Whether a value is waiting to fire.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending value fires.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(at, _)| *at)
    }

    /// Take the pending value if its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((at, _)) if now >= *at => self.cancel(),
            _ => None,
        }
    }
}
