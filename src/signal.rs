//! One-shot completion events.
//!
//! A [`Signal`] starts pending and fires at most once. Firing wakes every
//! current waiter and makes every later wait return immediately. The owner
//! side ([`Signal`]) holds the sole authority to fire; [`DoneSignal`] is the
//! cloneable observer handle for code that only polls or waits.
//!
//! A fired-or-not event doubles as a cancellation token:
//! [`Semaphore::acquire_cancellable`](crate::Semaphore::acquire_cancellable)
//! takes a [`DoneSignal`], and [`DoneSignal::completed`] provides a
//! permanently fired instance for "already cancelled" call sites.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex as StdMutex, OnceLock};
use std::time::{Duration, Instant};

use crate::tracing_compat::trace;

/// Shared state behind a [`Signal`] and its [`DoneSignal`] handles.
#[derive(Debug)]
struct SignalCore {
    /// Lock-free readiness flag. Set under `state` before waiters are woken,
    /// so a `true` observed here is never retracted.
    fired: AtomicBool,
    /// Authoritative fired flag for the condvar protocol.
    state: StdMutex<bool>,
    cvar: Condvar,
}

impl SignalCore {
    fn fire(&self) {
        let mut fired = match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if *fired {
            return;
        }
        *fired = true;
        self.fired.store(true, Ordering::SeqCst);
        drop(fired);
        trace!("signal fired");
        self.cvar.notify_all();
    }

    fn is_fired(&self) -> bool {
        self.fired.load(Ordering::SeqCst)
    }

    fn wait(&self) {
        if self.is_fired() {
            return;
        }
        trace!("signal wait blocking");
        let mut fired = match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        while !*fired {
            fired = match self.cvar.wait(fired) {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
        }
    }

    fn wait_timeout(&self, timeout: Duration) -> bool {
        if self.is_fired() {
            return true;
        }
        let start = Instant::now();
        let mut fired = match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        while !*fired {
            let Some(remaining) = timeout.checked_sub(start.elapsed()) else {
                trace!("signal wait timed out");
                return false;
            };
            let (guard, _) = match self.cvar.wait_timeout(fired, remaining) {
                Ok(pair) => pair,
                Err(poisoned) => poisoned.into_inner(),
            };
            fired = guard;
        }
        true
    }
}

/// One-shot completion event (owner side).
///
/// Starts pending; [`fire`](Self::fire) transitions it to fired exactly once
/// and there is no way back. `Signal` is deliberately not `Clone`: exactly
/// one place owns the decision to fire. Hand out [`DoneSignal`] handles to
/// everyone else.
///
/// # Example
///
/// ```
/// use std::thread;
/// use synckit::Signal;
///
/// let signal = Signal::new();
/// let done = signal.done_signal();
///
/// let waiter = thread::spawn(move || done.wait());
/// signal.fire();
/// waiter.join().unwrap();
/// assert!(signal.is_fired());
/// ```
pub struct Signal {
    core: Arc<SignalCore>,
}

impl Signal {
    /// Creates a new unfired signal.
    #[must_use]
    pub fn new() -> Self {
        Self {
            core: Arc::new(SignalCore {
                fired: AtomicBool::new(false),
                state: StdMutex::new(false),
                cvar: Condvar::new(),
            }),
        }
    }

    /// Fires the signal, waking all current and future waiters.
    ///
    /// Idempotent: concurrent or repeated calls fire the event once and the
    /// rest are no-ops.
    pub fn fire(&self) {
        self.core.fire();
    }

    /// Returns true if the signal has fired.
    ///
    /// A `false` result may be stale by the time the caller acts on it; a
    /// `true` result is permanent.
    #[must_use]
    pub fn is_fired(&self) -> bool {
        self.core.is_fired()
    }

    /// Blocks the calling thread until the signal fires.
    ///
    /// Returns immediately if it already fired. There is no cancellation;
    /// use [`wait_timeout`](Self::wait_timeout) for a bounded wait.
    pub fn wait(&self) {
        self.core.wait();
    }

    /// Waits for the signal to fire, giving up after `timeout`.
    ///
    /// Returns true if the signal fired before the timeout elapsed.
    #[must_use]
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        self.core.wait_timeout(timeout)
    }

    /// Returns an observer handle sharing this signal's underlying event.
    #[must_use]
    pub fn done_signal(&self) -> DoneSignal {
        DoneSignal {
            core: Arc::clone(&self.core),
        }
    }
}

impl Default for Signal {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("fired", &self.is_fired())
            .finish()
    }
}

/// Cloneable observer handle for a [`Signal`].
///
/// Clones share the one underlying event; none of them can fire it.
#[derive(Clone)]
pub struct DoneSignal {
    core: Arc<SignalCore>,
}

impl DoneSignal {
    /// Returns a handle to the process-wide pre-fired signal.
    ///
    /// The instance is created lazily on first use and shared by every
    /// caller thereafter. It is permanently fired: waits return immediately
    /// and [`is_fired`](Self::is_fired) is always true. Useful as a no-op
    /// wait target or an "already cancelled" token.
    #[must_use]
    pub fn completed() -> Self {
        static COMPLETED: OnceLock<DoneSignal> = OnceLock::new();
        COMPLETED
            .get_or_init(|| {
                let signal = Signal::new();
                signal.fire();
                signal.done_signal()
            })
            .clone()
    }

    /// Returns true if the observed signal has fired.
    #[must_use]
    pub fn is_fired(&self) -> bool {
        self.core.is_fired()
    }

    /// Blocks the calling thread until the observed signal fires.
    pub fn wait(&self) {
        self.core.wait();
    }

    /// Waits for the observed signal to fire, giving up after `timeout`.
    ///
    /// Returns true if the signal fired before the timeout elapsed.
    #[must_use]
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        self.core.wait_timeout(timeout)
    }
}

impl std::fmt::Debug for DoneSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DoneSignal")
            .field("fired", &self.is_fired())
            .finish()
    }
}
