//! Reader-writer-locked hash map.
//!
//! [`GuardedMap`] wraps a `HashMap` in a single [`parking_lot::RwLock`].
//! Loads take the shared mode and clone the value out; mutations take the
//! exclusive mode. One lock over the whole table keeps every entry update a
//! handful of instructions, which suits tables whose entries change at high
//! frequency; a load observes every store whose exclusive lock released
//! before the load's shared lock was acquired.

use std::borrow::Borrow;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::hash::Hash;

use parking_lot::RwLock;

/// A thread-safe map guarded by one reader-writer lock.
///
/// Not cloneable or copyable; share one instance by reference or `Arc`.
/// Lookup methods accept any borrowed form of the key, mirroring
/// `HashMap`'s API.
///
/// # Example
///
/// ```
/// use synckit::GuardedMap;
///
/// let map = GuardedMap::new();
/// map.store("a", 1);
///
/// let (value, loaded) = map.load_or_store("a", 99);
/// assert_eq!((value, loaded), (1, true));
///
/// assert_eq!(map.load_and_delete("a"), Some(1));
/// assert!(map.is_empty());
/// ```
pub struct GuardedMap<K, V> {
    entries: RwLock<HashMap<K, V>>,
}

impl<K, V> GuardedMap<K, V> {
    /// Creates an empty map.
    ///
    /// The backing table allocates on first insert.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl<K: Eq + Hash, V> GuardedMap<K, V> {
    /// Returns a clone of the value stored for `key`.
    #[must_use]
    pub fn load<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        self.entries.read().get(key).cloned()
    }

    /// Inserts or overwrites the value for `key`.
    pub fn store(&self, key: K, value: V) {
        self.entries.write().insert(key, value);
    }

    /// Returns the existing value for `key`, or stores `value` if absent.
    ///
    /// The boolean is true when an existing value was returned and false
    /// when `value` was stored. The check-and-insert is atomic: when
    /// several callers race on an absent key, exactly one stores and the
    /// rest load what it stored.
    ///
    /// Starts with an optimistic shared-mode lookup so the common
    /// already-present case never blocks readers.
    pub fn load_or_store(&self, key: K, value: V) -> (V, bool)
    where
        V: Clone,
    {
        if let Some(existing) = self.entries.read().get(&key) {
            return (existing.clone(), true);
        }
        let mut entries = self.entries.write();
        match entries.entry(key) {
            Entry::Occupied(entry) => (entry.get().clone(), true),
            Entry::Vacant(entry) => (entry.insert(value).clone(), false),
        }
    }

    /// Removes `key` and returns its value in one exclusive-mode step.
    ///
    /// A concurrent racer observes either the value-and-absence or nothing;
    /// two callers can never both get the value.
    pub fn load_and_delete<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.write().remove(key)
    }

    /// Removes `key` if present.
    pub fn delete<Q>(&self, key: &Q)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.write().remove(key);
    }

    /// Visits entries in unspecified order until `visit` returns false.
    ///
    /// The whole traversal runs under the shared lock, so it sees the
    /// contents as of lock acquisition and concurrent writers block until
    /// it finishes. `visit` must not call back into the same map; re-entry
    /// can deadlock.
    pub fn range<F>(&self, mut visit: F)
    where
        F: FnMut(&K, &V) -> bool,
    {
        let entries = self.entries.read();
        for (key, value) in &*entries {
            if !visit(key, value) {
                break;
            }
        }
    }

    /// Returns true if `key` is present.
    #[must_use]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.read().contains_key(key)
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if the map holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Removes every entry.
    pub fn clear(&self) {
        self.entries.write().clear();
    }
}

impl<K, V> Default for GuardedMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: std::fmt::Debug, V: std::fmt::Debug> std::fmt::Debug for GuardedMap<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.entries.try_read() {
            Some(entries) => f.debug_map().entries(entries.iter()).finish(),
            None => f.write_str("GuardedMap(<locked>)"),
        }
    }
}
