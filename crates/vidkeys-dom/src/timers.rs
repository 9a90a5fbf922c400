//! Timer APIs
//!
//! setTimeout/clearTimeout over a virtual clock owned by the page. Time
//! only moves when the page is advanced, which keeps scheduling
//! deterministic.

use std::fmt;
use std::time::Duration;

use crate::Scope;

/// Deferred task
pub type TimerCallback = Box<dyn FnOnce(&mut Scope<'_>)>;

/// Timer handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

struct Timer {
    id: TimerId,
    due: Duration,
    callback: TimerCallback,
}

/// Timer manager
#[derive(Default)]
pub struct TimerQueue {
    now: Duration,
    timers: Vec<Timer>,
    next_id: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time since the page was created
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Add a timeout
    pub fn set_timeout(&mut self, delay: Duration, callback: TimerCallback) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        self.timers.push(Timer {
            id,
            due: self.now + delay,
            callback,
        });
        id
    }

    /// Number of pending timers
    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    /// Check if there are pending timers
    pub fn has_pending(&self) -> bool {
        !self.timers.is_empty()
    }

    /// Due time of the earliest timer
    pub fn next_due(&self) -> Option<Duration> {
        self.timers.iter().map(|t| t.due).min()
    }

    /// Remove the earliest due timer, ties broken by scheduling order
    pub(crate) fn pop_due(&mut self) -> Option<TimerCallback> {
        let index = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due <= self.now)
            .min_by_key(|(_, t)| (t.due, t.id))
            .map(|(i, _)| i)?;
        Some(self.timers.remove(index).callback)
    }

    /// Move the clock forward (never backwards)
    pub(crate) fn set_now(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }
}

impl fmt::Debug for TimerQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerQueue")
            .field("now", &self.now)
            .field("pending", &self.timers.len())
            .finish()
    }
}
