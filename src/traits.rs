//! Cache trait hierarchy.
//!
//! Three layers, each extending the previous:
//!
//! | Trait | Adds | Receiver |
//! |---|---|---|
//! | [`ReadOnlyCache`] | `contains` / `peek` / `len` / `capacity` | `&self` |
//! | [`CoreCache`] | `insert` / `get` / `clear` | `&mut self` |
//! | [`MutableCache`] | `remove` / `remove_batch` | `&mut self` |
//!
//! [`ReadOnlyCache`] methods never reorder entries; [`CoreCache::get`] may
//! (promotion is part of the eviction policy, so even reads mutate).
//! [`ConcurrentCache`] is a marker for handles that are safe to share across
//! threads as-is.
//!
//! ## Thread Safety
//!
//! - Core implementations are **not** thread-safe; wrap them in external
//!   synchronization or use a provided concurrent wrapper
//!   ([`ConcurrentArcCache`](crate::policy::arc::ConcurrentArcCache)).
//! - Because `get` mutates recency state, a reader/writer lock split is not a
//!   safe way to share a core; every operation needs the exclusive lock.

/// Read-only cache introspection.
///
/// None of these operations update recency or frequency state, so they are
/// safe to call without affecting subsequent eviction decisions.
///
/// # Example
///
/// ```
/// use arc_cache::prelude::*;
///
/// fn occupancy<C: ReadOnlyCache<u64, String>>(cache: &C) -> f64 {
///     cache.len() as f64 / cache.capacity() as f64
/// }
///
/// let mut cache = ArcCore::new(4).unwrap();
/// cache.insert(1, "one".to_string());
/// assert_eq!(occupancy(&cache), 0.25);
/// ```
pub trait ReadOnlyCache<K, V> {
    /// Checks if a key exists without updating access state.
    fn contains(&self, key: &K) -> bool;

    /// Gets a reference to a value without updating access state.
    ///
    /// Unlike [`CoreCache::get`], this never reorders entries.
    fn peek(&self, key: &K) -> Option<&V>;

    /// Returns the current number of entries in the cache.
    fn len(&self) -> usize;

    /// Returns `true` if the cache contains no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the maximum number of entries the cache can hold.
    fn capacity(&self) -> usize;
}

/// Core mutating cache operations.
///
/// # Example
///
/// ```
/// use arc_cache::prelude::*;
///
/// fn warm<C: CoreCache<u64, String>>(cache: &mut C, data: &[(u64, String)]) {
///     for (key, value) in data {
///         cache.insert(*key, value.clone());
///     }
/// }
///
/// let mut cache = ArcCore::new(100).unwrap();
/// warm(&mut cache, &[(1, "one".to_string()), (2, "two".to_string())]);
/// assert_eq!(cache.len(), 2);
/// ```
pub trait CoreCache<K, V>: ReadOnlyCache<K, V> {
    /// Inserts a key-value pair, returning the previous value if one was live.
    ///
    /// If the cache is at capacity an entry may be evicted according to the
    /// cache's eviction policy before the new entry is admitted.
    fn insert(&mut self, key: K, value: V) -> Option<V>;

    /// Gets a reference to a value by key.
    ///
    /// Updates recency/frequency state; use [`ReadOnlyCache::peek`] to look
    /// without touching eviction order.
    fn get(&mut self, key: &K) -> Option<&V>;

    /// Removes all entries from the cache.
    fn clear(&mut self);
}

/// Caches that support arbitrary key-based removal.
///
/// # Example
///
/// ```
/// use arc_cache::prelude::*;
///
/// fn invalidate<C: MutableCache<u64, &'static str>>(cache: &mut C, keys: &[u64]) {
///     for key in keys {
///         cache.remove(key);
///     }
/// }
///
/// let mut cache = ArcCore::new(10).unwrap();
/// cache.insert(1, "one");
/// cache.insert(2, "two");
/// invalidate(&mut cache, &[1]);
/// assert!(!cache.contains(&1));
/// assert!(cache.contains(&2));
/// ```
pub trait MutableCache<K, V>: CoreCache<K, V> {
    /// Removes a specific entry, returning its value if it was live.
    ///
    /// Idempotent: removing an absent key is a no-op returning `None`.
    fn remove(&mut self, key: &K) -> Option<V>;

    /// Removes multiple keys, returning the removed values in input order.
    ///
    /// The default implementation loops over [`remove`](Self::remove).
    fn remove_batch(&mut self, keys: &[K]) -> Vec<Option<V>> {
        keys.iter().map(|k| self.remove(k)).collect()
    }
}

/// Marker for cache handles that are safe to share across threads as-is.
pub trait ConcurrentCache: Send + Sync {}
