//! Error types reported by the cache's internal consistency checks.
//!
//! Regular cache operations are total and never fail. [`InvariantError`] is
//! only produced by [`LruCache::check_invariants`](crate::LruCache::check_invariants),
//! which tests and debug tooling use to verify that the lookup index and the
//! recency list still describe the same set of keys.

use thiserror::Error;

/// A broken internal invariant of an [`LruCache`](crate::LruCache).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantError {
    /// More entries are resident than the configured capacity allows.
    #[error("cache holds {len} entries but capacity is {capacity}")]
    OverCapacity { len: usize, capacity: usize },

    /// The index and the recency list disagree on how many keys exist.
    #[error("index holds {index} keys but recency list holds {list}")]
    LengthMismatch { index: usize, list: usize },

    /// A key reachable from the recency list has no index entry.
    #[error("recency list position {position} has no matching index entry")]
    MissingIndexEntry { position: usize },

    /// An index entry points at a list node holding a different key.
    #[error("index entry points at node {node} which holds another key")]
    StaleNodeRef { node: usize },

    /// The doubly-linked recency list is not well formed.
    #[error("recency list is corrupt: {0}")]
    BrokenLinks(String),
}
