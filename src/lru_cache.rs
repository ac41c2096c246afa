use std::borrow::Borrow;
use std::collections::hash_map::RandomState;
use std::collections::HashMap;
use std::fmt::{self, Debug};
use std::hash::{BuildHasher, Hash};

use tracing::{debug, trace};

use crate::error::InvariantError;
use crate::recency_list::{NodeId, RecencyList};

// Upper bound on slots reserved up front; larger caches grow on demand.
const MAX_PREALLOC: usize = 4096;

/// The operation surface shared by the cache types in this crate.
///
/// # Type Parameters
///
/// * `K` - The type of keys used in the cache. Must implement `Hash + Eq + Clone`
/// * `V` - The type of values stored in the cache. Must implement `Clone`
pub trait Cache<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    /// Retrieves a copy of the value stored under `key`.
    ///
    /// On a hit the entry becomes the most recently used one. A miss returns
    /// `None` and changes nothing.
    fn get(&mut self, key: &K) -> Option<V>;

    /// Inserts or updates `key`.
    ///
    /// Updating an existing key replaces its value and marks it most recently
    /// used. Inserting a new key into a full cache first evicts the least
    /// recently used entry.
    ///
    /// # Returns
    ///
    /// * `true` if an entry was evicted to make room
    /// * `false` otherwise, including every update and every insert into a
    ///   zero-capacity cache
    fn put(&mut self, key: K, value: V) -> bool;

    /// Returns `true` if `key` is resident. Does not touch recency.
    fn contains(&self, key: &K) -> bool;

    /// Returns a copy of the value for `key` without touching recency.
    fn peek(&self, key: &K) -> Option<V>;

    /// Removes `key` if present, returning its value.
    fn remove(&mut self, key: &K) -> Option<V>;

    /// Returns the number of entries in the cache.
    fn size(&self) -> usize;

    /// Returns true if the cache is empty.
    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Returns the maximum number of entries the cache may hold.
    fn capacity(&self) -> usize;

    /// Changes the capacity, evicting least recently used entries when shrinking.
    fn resize(&mut self, capacity: usize);

    /// Removes all entries. Capacity is unchanged.
    fn clear(&mut self);
}

struct Entry<V> {
    value: V,
    node: NodeId,
}

/// A fixed-capacity cache with strict least-recently-used eviction.
///
/// A `HashMap` resolves each key to its value plus a [`NodeId`] into an
/// arena-backed recency list, so lookups, recency bumps, removals and
/// evictions are all O(1) expected time. The list head is the most recently
/// used key and the tail is always the next eviction candidate.
///
/// A capacity of 0 is valid: such a cache never retains an entry.
///
/// The cache is a plain single-threaded structure. Wrap it in a lock (or use
/// [`SyncLruCache`](crate::SyncLruCache)) to share it between threads.
///
/// # Examples
///
/// ```rust
/// use strict_lru::LruCache;
///
/// let mut cache = LruCache::new(2);
/// cache.put(1, "one");
/// cache.put(2, "two");
/// cache.get(&1);
///
/// // Key 2 is now least recently used and gets evicted.
/// assert!(cache.put(3, "three"));
/// assert_eq!(cache.get(&2), None);
/// assert_eq!(cache.get(&1), Some("one"));
/// ```
pub struct LruCache<K, V, S = RandomState> {
    capacity: usize,
    index: HashMap<K, Entry<V>, S>,
    order: RecencyList<K>,
}

impl<K, V> LruCache<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    /// Creates an empty cache holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self::with_hasher(capacity, RandomState::new())
    }
}

impl<K, V, S> LruCache<K, V, S>
where
    K: Hash + Eq + Clone,
    V: Clone,
    S: BuildHasher,
{
    /// Creates an empty cache that hashes keys with `hasher`.
    pub fn with_hasher(capacity: usize, hasher: S) -> Self {
        let reserve = capacity.min(MAX_PREALLOC);
        Self {
            capacity,
            index: HashMap::with_capacity_and_hasher(reserve, hasher),
            order: RecencyList::with_capacity(reserve),
        }
    }

    /// Returns a copy of the value for `key` and marks it most recently used.
    pub fn get<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let entry = self.index.get(key)?;
        self.order.move_to_front(entry.node);
        Some(entry.value.clone())
    }

    /// Inserts or updates an entry, returning `true` if another entry was evicted.
    pub fn put(&mut self, key: K, value: V) -> bool {
        if let Some(entry) = self.index.get_mut(&key) {
            entry.value = value;
            self.order.move_to_front(entry.node);
            return false;
        }

        // Nothing can ever be resident, and there is no tail to evict.
        if self.capacity == 0 {
            return false;
        }

        let evicted = self.index.len() >= self.capacity && self.evict_lru();

        let node = self.order.push_front(key.clone());
        self.index.insert(key, Entry { value, node });
        self.debug_assert_consistent();
        evicted
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains_key(key)
    }

    /// Returns a copy of the value for `key` without changing recency order.
    pub fn peek<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.get(key).map(|entry| entry.value.clone())
    }

    /// Removes `key` from the cache. Absent keys are ignored.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let entry = self.index.remove(key)?;
        self.order.remove(entry.node);
        self.debug_assert_consistent();
        Some(entry.value)
    }

    pub fn clear(&mut self) {
        let dropped = self.index.len();
        self.index.clear();
        self.order.clear();
        debug!(dropped, capacity = self.capacity, "cleared cache");
    }

    /// Returns the number of resident entries.
    pub fn size(&self) -> usize {
        self.index.len()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Sets a new capacity.
    ///
    /// Growing never evicts. Shrinking evicts from the least recently used end,
    /// one entry at a time, until `size() <= new_capacity`.
    pub fn resize(&mut self, new_capacity: usize) {
        let previous = self.capacity;
        self.capacity = new_capacity;

        let mut evicted = 0usize;
        while self.index.len() > new_capacity && self.evict_lru() {
            evicted += 1;
        }

        debug!(previous, capacity = new_capacity, evicted, "resized cache");
        self.debug_assert_consistent();
    }

    /// Iterates over entries from most to least recently used.
    ///
    /// Iteration does not change recency order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.order
            .iter()
            .filter_map(move |key| self.index.get(key).map(|entry| (key, &entry.value)))
    }

    /// Verifies that the lookup index and the recency list agree.
    ///
    /// This walks every entry and is meant for tests and debugging.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.index.len() > self.capacity {
            return Err(InvariantError::OverCapacity {
                len: self.index.len(),
                capacity: self.capacity,
            });
        }

        self.order.check_invariants()?;

        if self.index.len() != self.order.len() {
            return Err(InvariantError::LengthMismatch {
                index: self.index.len(),
                list: self.order.len(),
            });
        }

        for (key, entry) in &self.index {
            if self.order.get(entry.node) != Some(key) {
                return Err(InvariantError::StaleNodeRef {
                    node: entry.node.index(),
                });
            }
        }

        if let Some(position) = self
            .order
            .iter()
            .position(|key| !self.index.contains_key(key))
        {
            return Err(InvariantError::MissingIndexEntry { position });
        }

        Ok(())
    }

    // Drop the tail entry from both structures.
    fn evict_lru(&mut self) -> bool {
        let Some(key) = self.order.pop_back() else {
            return false;
        };
        self.index.remove(&key);
        trace!(
            len = self.index.len(),
            capacity = self.capacity,
            "evicted least recently used entry"
        );
        true
    }

    fn debug_assert_consistent(&self) {
        debug_assert!(self.index.len() <= self.capacity);
        debug_assert_eq!(self.index.len(), self.order.len());
    }
}

impl<K, V, S> Cache<K, V> for LruCache<K, V, S>
where
    K: Hash + Eq + Clone,
    V: Clone,
    S: BuildHasher,
{
    fn get(&mut self, key: &K) -> Option<V> {
        LruCache::get(self, key)
    }

    fn put(&mut self, key: K, value: V) -> bool {
        LruCache::put(self, key, value)
    }

    fn contains(&self, key: &K) -> bool {
        LruCache::contains(self, key)
    }

    fn peek(&self, key: &K) -> Option<V> {
        LruCache::peek(self, key)
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        LruCache::remove(self, key)
    }

    fn size(&self) -> usize {
        LruCache::size(self)
    }

    fn is_empty(&self) -> bool {
        LruCache::is_empty(self)
    }

    fn capacity(&self) -> usize {
        LruCache::capacity(self)
    }

    fn resize(&mut self, capacity: usize) {
        LruCache::resize(self, capacity)
    }

    fn clear(&mut self) {
        LruCache::clear(self)
    }
}

impl<K, V, S> Debug for LruCache<K, V, S>
where
    K: Hash + Eq + Clone + Debug,
    V: Clone + Debug,
    S: BuildHasher,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("capacity", &self.capacity)
            .field("len", &self.index.len())
            .field("entries", &self.iter().collect::<Vec<_>>())
            .finish()
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    enum Op {
        Get(u8),
        Put(u8, u32),
        Peek(u8),
        Contains(u8),
        Remove(u8),
        Resize(usize),
        Clear,
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            4 => (0u8..16).prop_map(Op::Get),
            6 => (0u8..16, any::<u32>()).prop_map(|(k, v)| Op::Put(k, v)),
            2 => (0u8..16).prop_map(Op::Peek),
            2 => (0u8..16).prop_map(Op::Contains),
            2 => (0u8..16).prop_map(Op::Remove),
            1 => (0usize..8).prop_map(Op::Resize),
            1 => Just(Op::Clear),
        ]
    }

    // Most recently used first; O(n) everything.
    struct Model {
        capacity: usize,
        entries: Vec<(u8, u32)>,
    }

    impl Model {
        fn position(&self, key: u8) -> Option<usize> {
            self.entries.iter().position(|(k, _)| *k == key)
        }

        fn get(&mut self, key: u8) -> Option<u32> {
            let pos = self.position(key)?;
            let entry = self.entries.remove(pos);
            self.entries.insert(0, entry);
            Some(entry.1)
        }

        fn put(&mut self, key: u8, value: u32) -> bool {
            if let Some(pos) = self.position(key) {
                self.entries.remove(pos);
                self.entries.insert(0, (key, value));
                return false;
            }
            if self.capacity == 0 {
                return false;
            }
            let evicted = self.entries.len() >= self.capacity;
            if evicted {
                self.entries.pop();
            }
            self.entries.insert(0, (key, value));
            evicted
        }

        fn peek(&self, key: u8) -> Option<u32> {
            self.position(key).map(|pos| self.entries[pos].1)
        }

        fn remove(&mut self, key: u8) -> Option<u32> {
            let pos = self.position(key)?;
            Some(self.entries.remove(pos).1)
        }

        fn resize(&mut self, capacity: usize) {
            self.capacity = capacity;
            self.entries.truncate(capacity);
        }
    }

    proptest! {
        /// Property: every operation agrees with a naive recency-ordered model
        #[test]
        fn prop_matches_reference_model(
            capacity in 0usize..8,
            ops in prop::collection::vec(op_strategy(), 0..200)
        ) {
            let mut cache = LruCache::new(capacity);
            let mut model = Model { capacity, entries: Vec::new() };

            for op in ops {
                match op {
                    Op::Get(k) => prop_assert_eq!(cache.get(&k), model.get(k)),
                    Op::Put(k, v) => prop_assert_eq!(cache.put(k, v), model.put(k, v)),
                    Op::Peek(k) => prop_assert_eq!(cache.peek(&k), model.peek(k)),
                    Op::Contains(k) => prop_assert_eq!(cache.contains(&k), model.peek(k).is_some()),
                    Op::Remove(k) => prop_assert_eq!(cache.remove(&k), model.remove(k)),
                    Op::Resize(n) => {
                        cache.resize(n);
                        model.resize(n);
                    }
                    Op::Clear => {
                        cache.clear();
                        model.entries.clear();
                    }
                }

                prop_assert!(cache.size() <= cache.capacity());
                prop_assert_eq!(cache.capacity(), model.capacity);
                let actual: Vec<(u8, u32)> = cache.iter().map(|(k, v)| (*k, *v)).collect();
                prop_assert_eq!(&actual, &model.entries);
                prop_assert!(cache.check_invariants().is_ok());
            }
        }

        /// Property: read-only operations never change which key is evicted next
        #[test]
        fn prop_reads_do_not_change_eviction_order(
            keys in prop::collection::vec(0u8..32, 1..40),
            probes in prop::collection::vec(0u8..32, 0..40)
        ) {
            let mut cache = LruCache::new(8);
            for k in &keys {
                cache.put(*k, u32::from(*k));
            }
            let before: Vec<u8> = cache.iter().map(|(k, _)| *k).collect();

            for p in &probes {
                let _ = cache.peek(p);
                let _ = cache.contains(p);
            }

            let after: Vec<u8> = cache.iter().map(|(k, _)| *k).collect();
            prop_assert_eq!(before, after);
        }

        /// Property: shrinking keeps exactly the most recently used min(n, len) keys
        #[test]
        fn prop_shrink_keeps_most_recent(
            keys in prop::collection::vec(0u8..64, 0..64),
            new_capacity in 0usize..16
        ) {
            let mut cache = LruCache::new(16);
            for k in &keys {
                cache.put(*k, 0u32);
            }
            let before: Vec<u8> = cache.iter().map(|(k, _)| *k).collect();

            cache.resize(new_capacity);

            let expected: Vec<u8> = before.iter().copied().take(new_capacity).collect();
            let after: Vec<u8> = cache.iter().map(|(k, _)| *k).collect();
            prop_assert_eq!(cache.size(), new_capacity.min(before.len()));
            prop_assert_eq!(after, expected);
        }

        /// Property: clear empties the cache and every previous key misses
        #[test]
        fn prop_clear_forgets_everything(
            keys in prop::collection::vec(0u8..64, 0..64)
        ) {
            let mut cache = LruCache::new(10);
            for k in &keys {
                cache.put(*k, 1u32);
            }
            cache.clear();

            prop_assert_eq!(cache.size(), 0);
            for k in &keys {
                prop_assert_eq!(cache.get(k), None);
            }
        }
    }
}
