//! Bounded recency list: the building block every ARC list is made of.
//!
//! A capacity-bounded map ordered by recency of insertion/access, implemented
//! as an [`IntrusiveList`] of entries plus a key index. Accessing or
//! re-adding an entry moves it to the front; overflowing the capacity evicts
//! the back and reports the evicted pair through an optional callback.
//!
//! ## Architecture
//!
//! ```text
//!   index: FxHashMap<K, SlotId>        list: IntrusiveList<Entry<K, V>>
//!   ┌─────────┬─────────┐             head ─► [A] ◄──► [B] ◄──► [C] ◄── tail
//!   │  key A  │  id_1   │                MRU                       LRU
//!   │  key B  │  id_2   │
//!   └─────────┴─────────┘             on_evict: fired only by capacity
//!                                     eviction, never by remove/clear
//! ```
//!
//! ## Behavior
//! - `add(k, v)`: moves the key to MRU (overwriting the value) or inserts it;
//!   evicts the LRU entry through the callback if the insert overflows.
//! - `get(k)`: promotes to MRU. `peek(k)` / `contains(k)`: no reordering.
//! - `remove(k)` / `remove_oldest()` / `clear()`: delete silently.
//! - `evict_oldest()`: deletes the LRU entry and reports it through the
//!   callback, the capacity-eviction path exposed for policy code that
//!   demotes entries into a ghost list.
//!
//! ## Performance
//! - `add` / `get` / `peek` / `contains` / `remove`: O(1) average
//!
//! `debug_validate_invariants()` is available in debug/test builds.

use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::ds::intrusive_list::IntrusiveList;
use crate::ds::slot_arena::SlotId;
use crate::error::ConfigError;

/// Callback invoked with each entry evicted by capacity pressure.
///
/// `Send` so a cache owning callback-wired lists can itself move across
/// threads.
pub type EvictCallback<K, V> = Box<dyn FnMut(K, V) + Send>;

#[derive(Debug)]
struct Entry<K, V> {
    key: K,
    value: V,
}

/// Bounded associative container ordered by recency, with an optional
/// eviction callback.
pub struct RecencyList<K, V> {
    list: IntrusiveList<Entry<K, V>>,
    index: FxHashMap<K, SlotId>,
    capacity: usize,
    on_evict: Option<EvictCallback<K, V>>,
}

impl<K, V> RecencyList<K, V>
where
    K: Clone + Eq + Hash,
{
    /// Creates a list holding at most `capacity` entries.
    ///
    /// Errs with [`ConfigError`] if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self, ConfigError> {
        Self::build(capacity, None)
    }

    /// Creates a list that reports capacity evictions through `on_evict`.
    ///
    /// The callback is fixed for the lifetime of the list. It fires only for
    /// evictions caused by [`add`](Self::add) overflow or
    /// [`evict_oldest`](Self::evict_oldest), and never for
    /// [`remove`](Self::remove), [`remove_oldest`](Self::remove_oldest), or
    /// [`clear`](Self::clear).
    pub fn with_evict_callback(
        capacity: usize,
        on_evict: EvictCallback<K, V>,
    ) -> Result<Self, ConfigError> {
        Self::build(capacity, Some(on_evict))
    }

    fn build(capacity: usize, on_evict: Option<EvictCallback<K, V>>) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::new("capacity must be > 0"));
        }
        Ok(Self {
            // One extra slot: add links the new entry before trimming the tail.
            list: IntrusiveList::with_capacity(capacity + 1),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            capacity,
            on_evict,
        })
    }

    /// Returns the configured capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of entries currently held.
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Returns `true` if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Returns `true` if `key` is present. No reordering.
    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Inserts `key` at the MRU position, or refreshes it there if present.
    ///
    /// Returns the previous value when the key was already present. If the
    /// insertion pushes the list over capacity, the LRU entry is evicted and
    /// reported through the eviction callback.
    pub fn add(&mut self, key: K, value: V) -> Option<V> {
        if let Some(&id) = self.index.get(&key) {
            self.list.move_to_front(id);
            if let Some(entry) = self.list.get_mut(id) {
                return Some(std::mem::replace(&mut entry.value, value));
            }
            return None;
        }

        let id = self.list.push_front(Entry {
            key: key.clone(),
            value,
        });
        self.index.insert(key, id);

        if self.list.len() > self.capacity {
            if let Some(entry) = self.list.pop_back() {
                self.index.remove(&entry.key);
                if let Some(on_evict) = self.on_evict.as_mut() {
                    on_evict(entry.key, entry.value);
                }
            }
        }
        None
    }

    /// Returns the value for `key`, promoting the entry to MRU.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let id = *self.index.get(key)?;
        self.list.move_to_front(id);
        self.list.get(id).map(|entry| &entry.value)
    }

    /// Returns the value for `key` without reordering.
    pub fn peek(&self, key: &K) -> Option<&V> {
        let id = *self.index.get(key)?;
        self.list.get(id).map(|entry| &entry.value)
    }

    /// Deletes `key` if present. Never fires the eviction callback.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let id = self.index.remove(key)?;
        self.list.remove(id).map(|entry| entry.value)
    }

    /// Deletes the LRU entry if any. Never fires the eviction callback.
    pub fn remove_oldest(&mut self) -> Option<(K, V)> {
        let entry = self.list.pop_back()?;
        self.index.remove(&entry.key);
        Some((entry.key, entry.value))
    }

    /// Deletes the LRU entry and reports it through the eviction callback.
    ///
    /// Returns `true` if an entry was evicted.
    pub fn evict_oldest(&mut self) -> bool {
        match self.remove_oldest() {
            Some((key, value)) => {
                if let Some(on_evict) = self.on_evict.as_mut() {
                    on_evict(key, value);
                }
                true
            }
            None => false,
        }
    }

    /// Returns all keys, most recent first.
    ///
    /// Callers must not rely on the order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.list.iter().map(|entry| &entry.key)
    }

    /// Removes all entries without firing callbacks.
    pub fn clear(&mut self) {
        self.list.clear();
        self.index.clear();
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        assert_eq!(self.list.len(), self.index.len());
        assert!(self.list.len() <= self.capacity);
        for (key, &id) in &self.index {
            assert!(self.list.contains(id));
            let entry = self.list.get(id).expect("indexed entry missing");
            assert!(entry.key == *key, "index points at a different key");
        }
        self.list.debug_validate_invariants();
    }
}

impl<K, V> std::fmt::Debug for RecencyList<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecencyList")
            .field("len", &self.list.len())
            .field("capacity", &self.capacity)
            .field("has_evict_callback", &self.on_evict.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::Mutex;

    fn recording_list(capacity: usize) -> (RecencyList<&'static str, u32>, Arc<Mutex<Vec<(&'static str, u32)>>>) {
        let evicted = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&evicted);
        let list = RecencyList::with_evict_callback(
            capacity,
            Box::new(move |key, value| {
                sink.lock().expect("poisoned").push((key, value));
            }),
        )
        .expect("positive capacity");
        (list, evicted)
    }

    #[test]
    fn zero_capacity_is_a_config_error() {
        let err = RecencyList::<u32, u32>::new(0).unwrap_err();
        assert!(err.to_string().contains("capacity"));
    }

    #[test]
    fn add_and_get_promote_to_front() {
        let mut list = RecencyList::new(3).unwrap();
        list.add("a", 1);
        list.add("b", 2);
        list.add("c", 3);

        // Touch "a" so "b" becomes the eviction candidate.
        assert_eq!(list.get(&"a"), Some(&1));
        list.add("d", 4);

        assert!(list.contains(&"a"));
        assert!(!list.contains(&"b"));
        assert!(list.contains(&"c"));
        assert!(list.contains(&"d"));
        list.debug_validate_invariants();
    }

    #[test]
    fn add_existing_overwrites_and_returns_previous() {
        let mut list = RecencyList::new(2).unwrap();
        assert_eq!(list.add("a", 1), None);
        assert_eq!(list.add("a", 10), Some(1));
        assert_eq!(list.len(), 1);
        assert_eq!(list.peek(&"a"), Some(&10));
    }

    #[test]
    fn capacity_eviction_fires_callback_with_entry() {
        let (mut list, evicted) = recording_list(2);
        list.add("a", 1);
        list.add("b", 2);
        list.add("c", 3);

        assert_eq!(*evicted.lock().expect("poisoned"), vec![("a", 1)]);
        assert_eq!(list.len(), 2);
        list.debug_validate_invariants();
    }

    #[test]
    fn refresh_of_existing_key_does_not_evict() {
        let (mut list, evicted) = recording_list(2);
        list.add("a", 1);
        list.add("b", 2);
        list.add("a", 3);

        assert!(evicted.lock().expect("poisoned").is_empty());
        assert_eq!(list.peek(&"a"), Some(&3));
    }

    #[test]
    fn remove_and_remove_oldest_are_silent() {
        let (mut list, evicted) = recording_list(3);
        list.add("a", 1);
        list.add("b", 2);
        list.add("c", 3);

        assert_eq!(list.remove(&"b"), Some(2));
        assert_eq!(list.remove_oldest(), Some(("a", 1)));
        assert_eq!(list.remove(&"missing"), None);
        assert_eq!(list.len(), 1);
        assert!(evicted.lock().expect("poisoned").is_empty());
    }

    #[test]
    fn evict_oldest_reports_through_callback() {
        let (mut list, evicted) = recording_list(3);
        list.add("a", 1);
        list.add("b", 2);

        assert!(list.evict_oldest());
        assert_eq!(*evicted.lock().expect("poisoned"), vec![("a", 1)]);
        assert_eq!(list.len(), 1);

        assert!(list.evict_oldest());
        assert!(!list.evict_oldest());
        assert_eq!(
            *evicted.lock().expect("poisoned"),
            vec![("a", 1), ("b", 2)]
        );
    }

    #[test]
    fn peek_and_contains_do_not_reorder() {
        let mut list = RecencyList::new(2).unwrap();
        list.add("a", 1);
        list.add("b", 2);

        // "a" stays LRU despite the lookups.
        assert_eq!(list.peek(&"a"), Some(&1));
        assert!(list.contains(&"a"));
        list.add("c", 3);

        assert!(!list.contains(&"a"));
        assert!(list.contains(&"b"));
    }

    #[test]
    fn keys_returns_most_recent_first() {
        let mut list = RecencyList::new(3).unwrap();
        list.add("a", 1);
        list.add("b", 2);
        list.add("c", 3);
        list.get(&"a");

        let keys: Vec<_> = list.keys().copied().collect();
        assert_eq!(keys, vec!["a", "c", "b"]);
    }

    #[test]
    fn clear_is_silent_and_resets() {
        let (mut list, evicted) = recording_list(2);
        list.add("a", 1);
        list.add("b", 2);
        list.clear();

        assert!(list.is_empty());
        assert!(!list.contains(&"a"));
        assert!(evicted.lock().expect("poisoned").is_empty());
        list.debug_validate_invariants();
    }

    #[test]
    fn ghost_style_unit_values() {
        // Ghost lists are plain RecencyLists with a unit value type.
        let mut ghost: RecencyList<u32, ()> = RecencyList::new(2).unwrap();
        ghost.add(1, ());
        ghost.add(2, ());
        ghost.add(3, ());
        assert!(!ghost.contains(&1));
        assert!(ghost.contains(&2));
        assert!(ghost.contains(&3));
        assert_eq!(ghost.len(), 2);
    }
}
