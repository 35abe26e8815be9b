//! Counting semaphore with cancellable acquisition.
//!
//! [`Semaphore`] hands out up to `capacity` slots. Waiting is built on a
//! mutex-guarded free-slot counter and a condvar, so the available count is
//! directly observable and a release without a matching acquire is detected
//! rather than absorbed.
//!
//! Acquisition comes in three shapes: blocking ([`Semaphore::acquire`]),
//! non-blocking ([`Semaphore::try_acquire`]) and cancellable
//! ([`Semaphore::acquire_cancellable`], which gives up when a [`DoneSignal`]
//! fires). Each has a permit-returning variant whose [`SemaphorePermit`]
//! releases the slot on drop.

use std::sync::{Condvar, Mutex as StdMutex, MutexGuard};
use std::time::Duration;

use crate::signal::DoneSignal;
use crate::tracing_compat::trace;

#[derive(Debug)]
struct SemaphoreState {
    /// Unclaimed slots, always in `0..=capacity`.
    available: usize,
}

/// A counting semaphore for limiting concurrent access.
///
/// The capacity is fixed at construction. A semaphore is neither cloneable
/// nor copyable; share one instance by reference or `Arc`.
///
/// # Example
///
/// ```
/// use synckit::Semaphore;
///
/// let gate = Semaphore::new(2);
/// assert!(gate.try_acquire());
/// assert!(gate.try_acquire());
/// assert!(!gate.try_acquire());
///
/// gate.release();
/// assert_eq!(gate.available(), 1);
/// ```
pub struct Semaphore {
    state: StdMutex<SemaphoreState>,
    slot_freed: Condvar,
    capacity: usize,
}

impl Semaphore {
    /// Creates a semaphore with `capacity` slots, all initially free.
    ///
    /// A capacity of zero is allowed; such a semaphore never grants a slot.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            state: StdMutex::new(SemaphoreState {
                available: capacity,
            }),
            slot_freed: Condvar::new(),
            capacity,
        }
    }

    /// Returns the total number of slots.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of currently free slots.
    #[must_use]
    pub fn available(&self) -> usize {
        self.lock_state().available
    }

    /// Blocks until a slot is free, then claims it.
    ///
    /// This wait cannot be cancelled; use
    /// [`acquire_cancellable`](Self::acquire_cancellable) when the caller
    /// may need to give up. On a zero-capacity semaphore this blocks
    /// forever.
    pub fn acquire(&self) {
        let mut state = self.lock_state();
        if state.available == 0 {
            trace!(capacity = self.capacity, "semaphore acquire blocking");
        }
        while state.available == 0 {
            state = match self.slot_freed.wait(state) {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
        }
        state.available -= 1;
    }

    /// Blocks until a slot is claimed or `cancel` fires.
    ///
    /// Returns true with a slot claimed, or false holding nothing. When a
    /// free slot and a fired cancel are both observable the slot wins, so
    /// an already-cancelled signal still acquires if no waiting would have
    /// been needed. A cancel that fires mid-wait releases the caller within
    /// the re-check interval.
    pub fn acquire_cancellable(&self, cancel: &DoneSignal) -> bool {
        let mut state = self.lock_state();
        loop {
            if state.available > 0 {
                state.available -= 1;
                return true;
            }
            if cancel.is_fired() {
                trace!("semaphore acquire cancelled");
                return false;
            }
            let (guard, _) = match self
                .slot_freed
                .wait_timeout(state, Duration::from_millis(10))
            {
                Ok(pair) => pair,
                Err(poisoned) => poisoned.into_inner(),
            };
            state = guard;
        }
    }

    /// Claims a slot without blocking.
    ///
    /// Returns whether a slot was claimed.
    #[must_use]
    pub fn try_acquire(&self) -> bool {
        let mut state = self.lock_state();
        if state.available > 0 {
            state.available -= 1;
            true
        } else {
            false
        }
    }

    /// Returns a previously claimed slot and wakes one waiter.
    ///
    /// # Panics
    ///
    /// Panics if every slot is already free: a release with no matching
    /// acquire is a pairing bug, not a way to grow the semaphore. On a
    /// zero-capacity semaphore every release panics.
    pub fn release(&self) {
        let mut state = self.lock_state();
        assert!(
            state.available < self.capacity,
            "semaphore released more times than acquired"
        );
        state.available += 1;
        drop(state);
        self.slot_freed.notify_one();
    }

    /// Blocks for a slot and returns a guard that releases it on drop.
    pub fn acquire_permit(&self) -> SemaphorePermit<'_> {
        self.acquire();
        SemaphorePermit { semaphore: self }
    }

    /// Claims a slot without blocking, returning a releasing guard on
    /// success.
    #[must_use]
    pub fn try_acquire_permit(&self) -> Option<SemaphorePermit<'_>> {
        self.try_acquire()
            .then(|| SemaphorePermit { semaphore: self })
    }

    /// Blocks for a slot unless `cancel` fires first.
    #[must_use]
    pub fn acquire_permit_cancellable(&self, cancel: &DoneSignal) -> Option<SemaphorePermit<'_>> {
        self.acquire_cancellable(cancel)
            .then(|| SemaphorePermit { semaphore: self })
    }

    fn lock_state(&self) -> MutexGuard<'_, SemaphoreState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl std::fmt::Debug for Semaphore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut out = f.debug_struct("Semaphore");
        out.field("capacity", &self.capacity);
        match self.state.try_lock() {
            Ok(state) => out.field("available", &state.available).finish(),
            Err(_) => out.finish_non_exhaustive(),
        }
    }
}

/// Slot guard returned by the permit-style acquire methods.
///
/// Dropping the permit releases its slot back to the semaphore.
#[must_use = "permit will be immediately released if not held"]
pub struct SemaphorePermit<'a> {
    semaphore: &'a Semaphore,
}

impl SemaphorePermit<'_> {
    /// Keeps the slot claimed forever instead of releasing it on drop.
    pub fn forget(self) {
        std::mem::forget(self);
    }
}

impl Drop for SemaphorePermit<'_> {
    fn drop(&mut self) {
        self.semaphore.release();
    }
}
