//! Adaptive Replacement Cache (ARC) policy.
//!
//! Implements the ARC algorithm, which automatically adapts between recency
//! and frequency preferences by maintaining four bounded recency lists and
//! adjusting a dynamic target parameter based on access patterns.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          ArcCore<K, V> Layout                           │
//! │                                                                         │
//! │   T1 (recent, live values)            T2 (frequent, live values)        │
//! │   ┌─────────────────────────┐          ┌─────────────────────────┐      │
//! │   │ MRU               LRU   │          │ MRU               LRU   │      │
//! │   │ [new] ◄──► [...] ◄──┤   │          │ [hot] ◄──► [...] ◄──┤   │      │
//! │   └───────────────┬─────────┘          └───────────────┬─────────┘      │
//! │          evict    │ callback                  evict    │ callback       │
//! │                   ▼                                    ▼                │
//! │   B1 (ghost: keys evicted from T1)    B2 (ghost: keys evicted from T2)  │
//! │   ┌─────────────────────────┐          ┌─────────────────────────┐      │
//! │   │ keys only, no values    │          │ keys only, no values    │      │
//! │   └─────────────────────────┘          └─────────────────────────┘      │
//! │                                                                         │
//! │   Adaptation parameter p: target size for T1 (starts at 0)              │
//! │   • Hit in B1 → increase p (favor recency)                              │
//! │   • Hit in B2 → decrease p (favor frequency)                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//!
//! Lookup order (get and insert)
//! ─────────────────────────────
//!
//!   T1 → T2 → B1 → B2, because each location implies a different history
//!   for the key and therefore a different action:
//!     - T1 hit: second touch, promote to T2
//!     - T2 hit: refresh at T2 MRU
//!     - B1/B2 hit (insert only): the earlier eviction was wrong in
//!       hindsight; adapt p toward the list that would have kept the key,
//!       free a slot with `replace`, revive the key into T2
//!     - complete miss (insert only): capacity ladder, then admit into T1
//!
//! Replace (the adaptive decision point)
//! ─────────────────────────────────────
//!
//!   if |T1| > 0 and (|T1| > p, or |T1| == p and the incoming key is a B2
//!   ghost): evict T1's LRU → its callback records the key in B1
//!   else: evict T2's LRU → its callback records the key in B2
//! ```
//!
//! ## Key Components
//!
//! - [`ArcCore`]: single-threaded ARC implementation
//! - [`ConcurrentArcCache`]: thread-safe handle holding an `ArcCore` behind
//!   one exclusive lock
//!
//! ## Operations
//!
//! | Operation   | Time   | Notes                                      |
//! |-------------|--------|--------------------------------------------|
//! | `get`       | O(1)   | May promote T1→T2                          |
//! | `insert`    | O(1)*  | *Amortized; may adapt p and evict          |
//! | `contains`  | O(1)   | T1/T2 only, no reordering                  |
//! | `peek`      | O(1)   | T1 then T2, no reordering                  |
//! | `remove`    | O(1)   | Drops the key from all four lists          |
//! | `len`       | O(1)   | Live entries: T1 + T2                      |
//! | `clear`     | O(n)   | Empties all four lists; p is kept          |
//!
//! ## Algorithm Properties
//!
//! - **Adaptive**: balances recency vs frequency from observed ghost hits,
//!   no manual tuning
//! - **Scan resistant**: one-time scans flow through T1 without displacing
//!   the frequent set in T2
//! - **Ghost bounded**: at most `2 × capacity` keys tracked across all four
//!   lists (modulo a one-entry transient while a full T1 turns over)
//!
//! ## Thread Safety
//!
//! - [`ArcCore`] is not thread-safe; it is `Send` (so it can live behind a
//!   lock) but offers no interior synchronization.
//! - [`ConcurrentArcCache`] serializes every operation, including reads,
//!   behind a single `parking_lot::Mutex`, because `get` mutates recency
//!   state and the four-list transitions must not interleave.
//!
//! ## References
//!
//! - Megiddo & Modha, "ARC: A Self-Tuning, Low Overhead Replacement Cache",
//!   FAST 2003

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::ds::RecencyList;
use crate::error::{ConfigError, InvariantError};
use crate::traits::{ConcurrentCache, CoreCache, MutableCache, ReadOnlyCache};

/// Shared handle to a ghost list; each live list's eviction callback owns a
/// clone of the matching handle.
type GhostHandle<K> = Arc<Mutex<RecencyList<K, ()>>>;

/// Core Adaptive Replacement Cache implementation.
///
/// Four bounded recency lists cooperate under one adaptation parameter:
/// - **T1**: entries seen once recently (live values)
/// - **T2**: entries seen at least twice (live values)
/// - **B1**: keys recently evicted from T1 (ghost, no values)
/// - **B2**: keys recently evicted from T2 (ghost, no values)
///
/// T1's eviction callback records evicted keys in B1, T2's in B2; the wiring
/// is established in [`new`](Self::new) and immutable afterward. A hit in a
/// ghost list during `insert` is evidence the earlier eviction was premature
/// and moves the target parameter `p` toward the list that would have kept
/// the key.
///
/// # Type Parameters
///
/// - `K`: key type. `Clone + Eq + Hash` for the list indexes; `Send` because
///   the eviction callbacks capture the ghost-list handles.
/// - `V`: value type.
///
/// # Example
///
/// ```
/// use arc_cache::policy::arc::ArcCore;
/// use arc_cache::traits::{CoreCache, ReadOnlyCache};
///
/// let mut cache = ArcCore::new(100).unwrap();
///
/// // New entries land in T1 (recent).
/// cache.insert("page1", "content1");
/// cache.insert("page2", "content2");
/// assert_eq!(cache.t1_len(), 2);
///
/// // A second touch moves the entry to T2 (frequent).
/// assert_eq!(cache.get(&"page1"), Some(&"content1"));
/// assert_eq!(cache.t1_len(), 1);
/// assert_eq!(cache.t2_len(), 1);
/// assert_eq!(cache.len(), 2);
/// ```
pub struct ArcCore<K, V>
where
    K: Clone + Eq + Hash,
{
    /// Total live capacity; every list is built with this bound.
    capacity: usize,
    /// Adaptive target size for T1, in `[0, capacity]`.
    p: usize,
    t1: RecencyList<K, V>,
    t2: RecencyList<K, V>,
    b1: GhostHandle<K>,
    b2: GhostHandle<K>,
}

impl<K, V> ArcCore<K, V>
where
    K: Clone + Eq + Hash + Send + 'static,
{
    /// Creates an ARC cache holding at most `capacity` live entries.
    ///
    /// Builds the ghost lists first, then the live lists with their eviction
    /// callbacks wired to the matching ghost (the evicted value is dropped;
    /// ghosts store only keys). `p` starts at 0.
    ///
    /// Errs with [`ConfigError`] if `capacity` is zero.
    ///
    /// # Example
    ///
    /// ```
    /// use arc_cache::policy::arc::ArcCore;
    /// use arc_cache::traits::ReadOnlyCache;
    ///
    /// let cache: ArcCore<String, i32> = ArcCore::new(100).unwrap();
    /// assert_eq!(cache.capacity(), 100);
    /// assert!(cache.is_empty());
    /// assert_eq!(cache.p_value(), 0);
    ///
    /// assert!(ArcCore::<String, i32>::new(0).is_err());
    /// ```
    pub fn new(capacity: usize) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::new("cache capacity must be > 0"));
        }

        let b1: GhostHandle<K> = Arc::new(Mutex::new(RecencyList::new(capacity)?));
        let b2: GhostHandle<K> = Arc::new(Mutex::new(RecencyList::new(capacity)?));

        let b1_sink = Arc::clone(&b1);
        let t1 = RecencyList::with_evict_callback(
            capacity,
            Box::new(move |key, _value| {
                b1_sink.lock().add(key, ());
            }),
        )?;

        let b2_sink = Arc::clone(&b2);
        let t2 = RecencyList::with_evict_callback(
            capacity,
            Box::new(move |key, _value| {
                b2_sink.lock().add(key, ());
            }),
        )?;

        Ok(Self {
            capacity,
            p: 0,
            t1,
            t2,
            b1,
            b2,
        })
    }

    /// Evicts one live entry, choosing the list by the current value of `p`.
    ///
    /// Shrinks T1 when it is over its target, or exactly at target while the
    /// incoming key's history (a B2 ghost) argues for favoring frequency;
    /// otherwise shrinks T2. The evicted key reaches the matching ghost list
    /// through the wired callback.
    fn replace(&mut self, key: &K) {
        let t1_len = self.t1.len();
        let in_b2 = self.b2.lock().contains(key);
        if t1_len > 0 && (t1_len > self.p || (t1_len == self.p && in_b2)) {
            self.t1.evict_oldest();
        } else {
            self.t2.evict_oldest();
        }
    }

    /// Returns the current value of the adaptation parameter `p`.
    ///
    /// This is the target size for T1: higher favors recency, lower favors
    /// frequency.
    pub fn p_value(&self) -> usize {
        self.p
    }

    /// Returns the number of entries in T1 (seen once recently).
    pub fn t1_len(&self) -> usize {
        self.t1.len()
    }

    /// Returns the number of entries in T2 (seen at least twice).
    pub fn t2_len(&self) -> usize {
        self.t2.len()
    }

    /// Returns the number of keys in the B1 ghost list.
    pub fn b1_len(&self) -> usize {
        self.b1.lock().len()
    }

    /// Returns the number of keys in the B2 ghost list.
    pub fn b2_len(&self) -> usize {
        self.b2.lock().len()
    }

    /// Returns all live keys: T1's keys followed by T2's keys.
    ///
    /// Order within each segment is unspecified; callers must not rely on it.
    pub fn keys(&self) -> Vec<K> {
        let mut keys = Vec::with_capacity(self.t1.len() + self.t2.len());
        keys.extend(self.t1.keys().cloned());
        keys.extend(self.t2.keys().cloned());
        keys
    }

    /// Verifies the cross-list invariants, returning a description of the
    /// first violation found.
    ///
    /// Any `Err` here is an implementation bug, not a runtime condition.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.t1.len() + self.t2.len() > self.capacity {
            return Err(InvariantError::new(format!(
                "live entries ({}) exceed capacity ({})",
                self.t1.len() + self.t2.len(),
                self.capacity
            )));
        }
        if self.p > self.capacity {
            return Err(InvariantError::new(format!(
                "p ({}) exceeds capacity ({})",
                self.p, self.capacity
            )));
        }

        let b1 = self.b1.lock();
        let b2 = self.b2.lock();
        if b1.len() > self.capacity {
            return Err(InvariantError::new(format!(
                "B1 length ({}) exceeds capacity ({})",
                b1.len(),
                self.capacity
            )));
        }
        if b2.len() > self.capacity {
            return Err(InvariantError::new(format!(
                "B2 length ({}) exceeds capacity ({})",
                b2.len(),
                self.capacity
            )));
        }

        for key in self.t1.keys() {
            if self.t2.contains(key) {
                return Err(InvariantError::new("key present in both T1 and T2"));
            }
            if b1.contains(key) || b2.contains(key) {
                return Err(InvariantError::new("T1 key present in a ghost list"));
            }
        }
        for key in self.t2.keys() {
            if b1.contains(key) || b2.contains(key) {
                return Err(InvariantError::new("T2 key present in a ghost list"));
            }
        }
        for key in b1.keys() {
            if b2.contains(key) {
                return Err(InvariantError::new("key present in both B1 and B2"));
            }
        }

        Ok(())
    }

    #[cfg(any(test, debug_assertions))]
    /// Panics if any cross-list invariant is violated.
    pub fn debug_validate_invariants(&self) {
        if let Err(err) = self.check_invariants() {
            panic!("{err}");
        }
    }
}

impl<K, V> fmt::Debug for ArcCore<K, V>
where
    K: Clone + Eq + Hash,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArcCore")
            .field("capacity", &self.capacity)
            .field("p", &self.p)
            .field("t1_len", &self.t1.len())
            .field("t2_len", &self.t2.len())
            .field("b1_len", &self.b1.lock().len())
            .field("b2_len", &self.b2.lock().len())
            .finish()
    }
}

impl<K, V> ReadOnlyCache<K, V> for ArcCore<K, V>
where
    K: Clone + Eq + Hash + Send,
{
    fn contains(&self, key: &K) -> bool {
        self.t1.contains(key) || self.t2.contains(key)
    }

    fn peek(&self, key: &K) -> Option<&V> {
        self.t1.peek(key).or_else(|| self.t2.peek(key))
    }

    fn len(&self) -> usize {
        self.t1.len() + self.t2.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<K, V> CoreCache<K, V> for ArcCore<K, V>
where
    K: Clone + Eq + Hash + Send + 'static,
{
    fn get(&mut self, key: &K) -> Option<&V> {
        // A T1 hit is the entry's second access: it moves to T2. The removal
        // from T1 is silent (the key is migrating, not being evicted), so no
        // B1 ghost appears.
        if self.t1.contains(key) {
            if let Some(value) = self.t1.remove(key) {
                self.t2.add(key.clone(), value);
            }
            return self.t2.peek(key);
        }

        // T2 hit: refresh within T2's own recency order.
        self.t2.get(key)

        // Ghost lists are deliberately not consulted: a ghost hit is an
        // adaptation signal for insert, not a cache hit.
    }

    fn insert(&mut self, key: K, value: V) -> Option<V> {
        // Live in T1: a second touch, even a write, makes the entry frequent.
        if self.t1.contains(&key) {
            let previous = self.t1.remove(&key);
            self.t2.add(key, value);
            return previous;
        }

        // Live in T2: refresh in place.
        if self.t2.contains(&key) {
            return self.t2.add(key, value);
        }

        // Ghost hit in B1: T1's share was too small. Grow its target, free a
        // slot under the new policy, revive the key as frequent.
        if self.b1.lock().contains(&key) {
            let b1_len = self.b1.lock().len();
            let b2_len = self.b2.lock().len();
            let delta = (b2_len / b1_len).max(1);
            self.p = (self.p + delta).min(self.capacity);

            self.replace(&key);

            self.b1.lock().remove(&key);
            self.t2.add(key, value);
            return None;
        }

        // Ghost hit in B2: symmetric, shrink T1's target.
        if self.b2.lock().contains(&key) {
            let b1_len = self.b1.lock().len();
            let b2_len = self.b2.lock().len();
            let delta = (b1_len / b2_len).max(1);
            self.p = self.p.saturating_sub(delta);

            self.replace(&key);

            self.b2.lock().remove(&key);
            self.t2.add(key, value);
            return None;
        }

        // Complete miss: run the capacity ladder, then admit into T1.
        let t1_len = self.t1.len();
        let b1_len = self.b1.lock().len();
        if t1_len + b1_len == self.capacity {
            if t1_len == self.capacity {
                // T1 alone fills the cache: turn over its LRU entry. The
                // eviction goes through the callback so B1 keeps the history.
                self.t1.evict_oldest();
            } else {
                // T1's tracked history is full but B1 holds some of it: age
                // out the oldest ghost, then free a live slot.
                self.b1.lock().remove_oldest();
                self.replace(&key);
            }
        } else {
            let total = t1_len + self.t2.len() + b1_len + self.b2.lock().len();
            if total >= self.capacity {
                if total == 2 * self.capacity {
                    // Combined history is saturated: drop the oldest
                    // frequency ghost before recording new history.
                    self.b2.lock().remove_oldest();
                }
                self.replace(&key);
            }
        }

        self.t1.add(key, value);
        None
    }

    fn clear(&mut self) {
        self.t1.clear();
        self.t2.clear();
        self.b1.lock().clear();
        self.b2.lock().clear();
        // p is intentionally left where adaptation moved it; it only shifts
        // again once new ghost history accumulates.
    }
}

impl<K, V> MutableCache<K, V> for ArcCore<K, V>
where
    K: Clone + Eq + Hash + Send + 'static,
{
    fn remove(&mut self, key: &K) -> Option<V> {
        let from_t1 = self.t1.remove(key);
        let from_t2 = self.t2.remove(key);
        self.b1.lock().remove(key);
        self.b2.lock().remove(key);
        from_t1.or(from_t2)
    }
}

/// Thread-safe ARC cache: a cloneable handle over [`ArcCore`] behind a single
/// exclusive lock.
///
/// Values are wrapped in `Arc<V>` once at insert and cloned out on
/// `get`/`peek`, so no borrow escapes the lock. Every operation, reads
/// included, takes the same `parking_lot::Mutex`: ARC's `get` promotes
/// entries (a mutation), and the size/exclusivity invariants only hold if no
/// other operation interleaves mid-transition.
///
/// # Example
///
/// ```
/// use arc_cache::policy::arc::ConcurrentArcCache;
///
/// let cache: ConcurrentArcCache<u32, String> = ConcurrentArcCache::new(100).unwrap();
///
/// cache.insert(1, "first".to_string());
/// assert_eq!(*cache.get(&1).unwrap(), "first");
///
/// // Handles are cheap clones sharing the same cache.
/// let handle = cache.clone();
/// handle.insert(2, "second".to_string());
/// assert_eq!(cache.len(), 2);
/// ```
pub struct ConcurrentArcCache<K, V>
where
    K: Clone + Eq + Hash,
{
    inner: Arc<Mutex<ArcCore<K, Arc<V>>>>,
}

impl<K, V> Clone for ConcurrentArcCache<K, V>
where
    K: Clone + Eq + Hash,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> ConcurrentArcCache<K, V>
where
    K: Clone + Eq + Hash + Send + 'static,
    V: Send + Sync,
{
    /// Creates a thread-safe ARC cache with the given capacity.
    ///
    /// Errs with [`ConfigError`] if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self, ConfigError> {
        Ok(Self {
            inner: Arc::new(Mutex::new(ArcCore::new(capacity)?)),
        })
    }

    /// Inserts a value, wrapping it in `Arc<V>` internally.
    ///
    /// Returns the previous `Arc<V>` if the key was live.
    pub fn insert(&self, key: K, value: V) -> Option<Arc<V>> {
        let value = Arc::new(value);
        let mut cache = self.inner.lock();
        cache.insert(key, value)
    }

    /// Inserts an `Arc<V>` directly (no re-wrapping if already shared).
    ///
    /// # Example
    ///
    /// ```
    /// use arc_cache::policy::arc::ConcurrentArcCache;
    /// use std::sync::Arc;
    ///
    /// let cache: ConcurrentArcCache<u32, String> = ConcurrentArcCache::new(10).unwrap();
    /// let shared = Arc::new("shared".to_string());
    /// cache.insert_arc(1, Arc::clone(&shared));
    ///
    /// let retrieved = cache.get(&1).unwrap();
    /// assert!(Arc::ptr_eq(&shared, &retrieved));
    /// ```
    pub fn insert_arc(&self, key: K, value: Arc<V>) -> Option<Arc<V>> {
        let mut cache = self.inner.lock();
        cache.insert(key, value)
    }

    /// Gets a value, updating recency/frequency state.
    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        let mut cache = self.inner.lock();
        cache.get(key).cloned()
    }

    /// Inspects a value without updating recency/frequency state.
    ///
    /// # Example
    ///
    /// ```
    /// use arc_cache::policy::arc::ConcurrentArcCache;
    ///
    /// let cache: ConcurrentArcCache<u32, String> = ConcurrentArcCache::new(2).unwrap();
    /// cache.insert(1, "a".to_string());
    /// cache.insert(2, "b".to_string());
    ///
    /// // peek does not promote: key 1 is still the eviction candidate.
    /// assert_eq!(*cache.peek(&1).unwrap(), "a");
    /// cache.insert(3, "c".to_string());
    /// assert!(!cache.contains(&1));
    /// ```
    pub fn peek(&self, key: &K) -> Option<Arc<V>> {
        let cache = self.inner.lock();
        cache.peek(key).cloned()
    }

    /// Returns `true` if the key is live (T1 or T2). No reordering.
    pub fn contains(&self, key: &K) -> bool {
        let cache = self.inner.lock();
        cache.contains(key)
    }

    /// Removes an entry from the cache and its history, returning the live
    /// value if one existed.
    pub fn remove(&self, key: &K) -> Option<Arc<V>> {
        let mut cache = self.inner.lock();
        cache.remove(key)
    }

    /// Returns the number of live entries.
    pub fn len(&self) -> usize {
        let cache = self.inner.lock();
        cache.len()
    }

    /// Returns `true` if the cache holds no live entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the configured capacity.
    pub fn capacity(&self) -> usize {
        let cache = self.inner.lock();
        cache.capacity()
    }

    /// Returns all live keys: T1's keys followed by T2's keys.
    pub fn keys(&self) -> Vec<K> {
        let cache = self.inner.lock();
        cache.keys()
    }

    /// Removes all entries. The adaptation parameter is preserved.
    pub fn clear(&self) {
        let mut cache = self.inner.lock();
        cache.clear();
    }
}

impl<K, V> fmt::Debug for ConcurrentArcCache<K, V>
where
    K: Clone + Eq + Hash + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cache = self.inner.lock();
        f.debug_struct("ConcurrentArcCache")
            .field("len", &(cache.t1.len() + cache.t2.len()))
            .field("capacity", &cache.capacity)
            .finish_non_exhaustive()
    }
}

impl<K, V> ConcurrentCache for ConcurrentArcCache<K, V>
where
    K: Clone + Eq + Hash + Send,
    V: Send + Sync,
{
}
