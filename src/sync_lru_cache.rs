use std::borrow::Borrow;
use std::collections::hash_map::RandomState;
use std::hash::{BuildHasher, Hash};

use parking_lot::Mutex;

use crate::lru_cache::{Cache, LruCache};

/// An [`LruCache`] behind a single `parking_lot::Mutex`.
///
/// Every operation holds the lock for its whole duration, so the cache keeps
/// one global recency order and evicts in strict LRU order even under
/// concurrent use. Operations take `&self`, which makes the cache easy to
/// share through an `Arc`.
///
/// Use [`with_lock`](Self::with_lock) to run several operations atomically.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use std::thread;
///
/// use strict_lru::SyncLruCache;
///
/// let cache = Arc::new(SyncLruCache::new(100));
/// let writer = {
///     let cache = Arc::clone(&cache);
///     thread::spawn(move || {
///         cache.put("answer".to_string(), 42);
///     })
/// };
/// writer.join().unwrap();
/// assert_eq!(cache.get("answer"), Some(42));
/// ```
pub struct SyncLruCache<K, V, S = RandomState> {
    inner: Mutex<LruCache<K, V, S>>,
}

impl<K, V> SyncLruCache<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    /// Creates an empty shared cache holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self::from_cache(LruCache::new(capacity))
    }
}

impl<K, V, S> SyncLruCache<K, V, S>
where
    K: Hash + Eq + Clone,
    V: Clone,
    S: BuildHasher,
{
    /// Wraps an existing cache, keeping its entries and recency order.
    pub fn from_cache(cache: LruCache<K, V, S>) -> Self {
        Self {
            inner: Mutex::new(cache),
        }
    }

    /// Consumes the wrapper and returns the underlying cache.
    pub fn into_inner(self) -> LruCache<K, V, S> {
        self.inner.into_inner()
    }

    /// Runs `f` with exclusive access to the underlying cache.
    pub fn with_lock<R>(&self, f: impl FnOnce(&mut LruCache<K, V, S>) -> R) -> R {
        let mut cache = self.inner.lock();
        f(&mut cache)
    }

    /// Retrieves a copy of the value and marks the entry most recently used.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().get(key)
    }

    /// Inserts or updates an entry, returning `true` if another entry was evicted.
    pub fn put(&self, key: K, value: V) -> bool {
        self.inner.lock().put(key, value)
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().contains(key)
    }

    pub fn peek<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().peek(key)
    }

    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().remove(key)
    }

    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    pub fn size(&self) -> usize {
        self.inner.lock().size()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    /// Changes the capacity, evicting least recently used entries when shrinking.
    pub fn resize(&self, capacity: usize) {
        self.inner.lock().resize(capacity);
    }
}

impl<K, V, S> Cache<K, V> for SyncLruCache<K, V, S>
where
    K: Hash + Eq + Clone,
    V: Clone,
    S: BuildHasher,
{
    fn get(&mut self, key: &K) -> Option<V> {
        SyncLruCache::get(self, key)
    }

    fn put(&mut self, key: K, value: V) -> bool {
        SyncLruCache::put(self, key, value)
    }

    fn contains(&self, key: &K) -> bool {
        SyncLruCache::contains(self, key)
    }

    fn peek(&self, key: &K) -> Option<V> {
        SyncLruCache::peek(self, key)
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        SyncLruCache::remove(self, key)
    }

    fn size(&self) -> usize {
        SyncLruCache::size(self)
    }

    fn is_empty(&self) -> bool {
        SyncLruCache::is_empty(self)
    }

    fn capacity(&self) -> usize {
        SyncLruCache::capacity(self)
    }

    fn resize(&mut self, capacity: usize) {
        SyncLruCache::resize(self, capacity)
    }

    fn clear(&mut self) {
        SyncLruCache::clear(self)
    }
}
