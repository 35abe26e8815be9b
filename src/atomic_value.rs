//! Atomic single-value container.
//!
//! [`AtomicValue`] holds at most one `T` and hands out clones of it. All
//! operations serialize through one reader-writer lock, so a load always
//! observes the most recent completed store and mixed readers never see a
//! torn value. Critical sections are a clone or a pointer swap; nothing in
//! this module blocks on application events.

use parking_lot::RwLock;

/// A thread-safe container holding at most one value of type `T`.
///
/// The slot starts empty. Unlike a type-erased container, the element type
/// is fixed at compile time, so there is no runtime type check to fail on a
/// mismatched store.
///
/// # Example
///
/// ```
/// use synckit::AtomicValue;
///
/// let value = AtomicValue::new();
/// assert_eq!(value.load_ok(), None);
///
/// value.store(7);
/// assert_eq!(value.load(), 7);
/// assert_eq!(value.swap(9), Some(7));
/// assert!(value.compare_and_swap(&9, 11));
/// ```
pub struct AtomicValue<T> {
    slot: RwLock<Option<T>>,
}

impl<T> AtomicValue<T> {
    /// Creates an empty container.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slot: RwLock::new(None),
        }
    }

    /// Returns the most recent value, or `T::default()` if nothing was ever
    /// stored.
    ///
    /// Use [`load_ok`](Self::load_ok) to distinguish a stored default from
    /// an empty slot.
    #[must_use]
    pub fn load(&self) -> T
    where
        T: Clone + Default,
    {
        self.slot.read().clone().unwrap_or_default()
    }

    /// Returns the most recent value, or `None` if the slot is empty.
    #[must_use]
    pub fn load_ok(&self) -> Option<T>
    where
        T: Clone,
    {
        self.slot.read().clone()
    }

    /// Stores `value`, replacing any previous one.
    ///
    /// The new value is visible to every load that starts after this call
    /// returns, on any thread.
    pub fn store(&self, value: T) {
        *self.slot.write() = Some(value);
    }

    /// Stores `value` and returns the previous one, or `None` if the slot
    /// was empty.
    pub fn swap(&self, value: T) -> Option<T> {
        self.slot.write().replace(value)
    }

    /// Stores `new` only if the current value equals `current`.
    ///
    /// Returns whether the swap happened. An empty slot never matches, so
    /// this cannot be used to perform the first store; on failure the slot
    /// is left untouched.
    pub fn compare_and_swap(&self, current: &T, new: T) -> bool
    where
        T: PartialEq,
    {
        let mut slot = self.slot.write();
        match slot.as_ref() {
            Some(stored) if stored == current => {
                *slot = Some(new);
                true
            }
            _ => false,
        }
    }

    /// Removes and returns the current value, leaving the slot empty.
    pub fn take(&self) -> Option<T> {
        self.slot.write().take()
    }
}

impl<T> Default for AtomicValue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for AtomicValue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.slot.try_read() {
            Some(guard) => match guard.as_ref() {
                Some(value) => f.debug_tuple("AtomicValue").field(value).finish(),
                None => f.write_str("AtomicValue(<empty>)"),
            },
            None => f.write_str("AtomicValue(<locked>)"),
        }
    }
}
