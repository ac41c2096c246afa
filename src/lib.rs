//! A fixed-capacity, in-memory key/value cache with strict LRU eviction.
//!
//! This crate provides:
//!
//! 1. [`LruCache`] - A single-threaded LRU cache with O(1) expected-time operations
//! 2. [`SyncLruCache`] - The same cache behind one mutex, for sharing between threads
//!
//! Both implement the [`Cache`] trait.
//!
//! # Design
//!
//! A hash index maps each key to its value and a stable [`NodeId`] into an
//! arena-backed, doubly linked recency list. The list head is the most recently
//! used key and the tail is the next eviction candidate, so no operation ever
//! scans for the LRU entry or searches for a node to relocate.
//!
//! - `get` and `put` mark the key most recently used
//! - `peek` and `contains` never change recency order
//! - a full cache evicts exactly one entry before inserting a new key
//! - `resize` to a smaller capacity evicts tail-first until the cache fits
//! - capacity 0 is valid and retains nothing
//!
//! # Examples
//!
//! ```rust
//! use strict_lru::LruCache;
//!
//! let mut cache: LruCache<u64, String> = LruCache::new(2);
//! assert!(!cache.put(1, "one".to_string()));
//! assert!(!cache.put(2, "two".to_string()));
//!
//! // Touching 1 makes 2 the least recently used entry.
//! assert_eq!(cache.get(&1), Some("one".to_string()));
//! assert!(cache.put(3, "three".to_string()));
//! assert_eq!(cache.get(&2), None);
//!
//! cache.resize(1);
//! assert_eq!(cache.size(), 1);
//! assert!(cache.contains(&3));
//! ```

pub mod error;
pub mod lru_cache;
pub mod recency_list;
pub mod sync_lru_cache;

pub use error::InvariantError;
pub use lru_cache::{Cache, LruCache};
pub use recency_list::{NodeId, RecencyList};
pub use sync_lru_cache::SyncLruCache;
