//! Completion counting with a selectable done signal.
//!
//! [`WaitGroup`] tracks how many registered events are still outstanding and
//! fires a one-shot [`Signal`] the moment the count reaches zero. Unlike a
//! plain join handle it hands out [`DoneSignal`] observers before completion,
//! so "all workers finished" can feed a bounded wait or cancel a semaphore
//! acquisition elsewhere.

use std::sync::atomic::{AtomicI64, Ordering};

use crate::signal::{DoneSignal, Signal};

/// Counts outstanding events and signals completion at zero.
///
/// Register work with [`add`](Self::add) before the event is started, mark
/// completion with [`decr`](Self::decr), and [`wait`](Self::wait) for the
/// whole batch. The completion signal is one-shot: once the count has
/// reached zero the group never becomes pending again.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use std::thread;
/// use synckit::WaitGroup;
///
/// let group = Arc::new(WaitGroup::new());
/// group.add(2);
/// for _ in 0..2 {
///     let group = Arc::clone(&group);
///     thread::spawn(move || group.decr());
/// }
/// group.wait();
/// assert_eq!(group.count(), 0);
/// ```
pub struct WaitGroup {
    count: AtomicI64,
    signal: Signal,
}

impl WaitGroup {
    /// Creates a wait group with a count of zero and a pending signal.
    #[must_use]
    pub fn new() -> Self {
        Self {
            count: AtomicI64::new(0),
            signal: Signal::new(),
        }
    }

    /// Adds `delta` (which may be negative) to the completion count.
    ///
    /// If the new count is exactly zero the completion signal fires and all
    /// waiters are released; concurrent crossings fire it once. The signal
    /// never rearms, so driving the count back above zero after completion
    /// leaves it fired: register every expected event before the count can
    /// first reach zero.
    ///
    /// # Panics
    ///
    /// Panics if the new count is negative, which means completions
    /// outnumbered registrations.
    pub fn add(&self, delta: i64) {
        let old = self.count.fetch_add(delta, Ordering::SeqCst);
        let new = old + delta;
        assert!(new >= 0, "wait group counter went negative");
        if new == 0 {
            self.signal.fire();
        }
    }

    /// Marks one event complete. Equivalent to `add(-1)`.
    ///
    /// # Panics
    ///
    /// Panics if the count was already zero or negative.
    pub fn decr(&self) {
        self.add(-1);
    }

    /// Blocks the calling thread until the count has reached zero.
    ///
    /// Returns immediately if it already has. On a fresh group this blocks
    /// until some `add`/`decr` sequence first crosses zero.
    pub fn wait(&self) {
        self.signal.wait();
    }

    /// Returns a handle that fires exactly when the count reaches zero.
    ///
    /// Obtainable at any time, including before any event was registered,
    /// and usable in multi-way waits without calling [`wait`](Self::wait).
    #[must_use]
    pub fn done_signal(&self) -> DoneSignal {
        self.signal.done_signal()
    }

    /// Returns the current count.
    ///
    /// Inherently racy under concurrent `add`/`decr`; intended for tests
    /// and diagnostics.
    #[must_use]
    pub fn count(&self) -> i64 {
        self.count.load(Ordering::SeqCst)
    }
}

impl Default for WaitGroup {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for WaitGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WaitGroup")
            .field("count", &self.count())
            .field("completed", &self.signal.is_fired())
            .finish()
    }
}
