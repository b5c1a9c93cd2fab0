//! Recency Tracking Module
//!
//! Tracks key access order for LRU eviction.

use std::fmt;

use lru::LruCache;

// == Recency List ==
/// Keys-only recency list backed by `lru::LruCache`.
///
/// Touch, remove and pop are all O(1); the list itself is unbounded and
/// never evicts on its own. Capacity enforcement belongs to the cache
/// core, which pops the oldest key explicitly.
pub struct RecencyList {
    order: LruCache<String, ()>,
}

impl fmt::Debug for RecencyList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecencyList")
            .field("len", &self.order.len())
            .finish()
    }
}

impl RecencyList {
    // == Constructor ==
    /// Creates a new empty recency list.
    pub fn new() -> Self {
        Self {
            order: LruCache::unbounded(),
        }
    }

    // == Touch ==
    /// Marks a key as most recently used, inserting it if absent.
    pub fn touch(&mut self, key: &str) {
        // get() promotes an existing key without reallocating it
        if self.order.get(key).is_none() {
            self.order.put(key.to_owned(), ());
        }
    }

    // == Remove ==
    /// Removes a key from the list. Returns whether it was present.
    pub fn remove(&mut self, key: &str) -> bool {
        self.order.pop(key).is_some()
    }

    // == Pop Oldest ==
    /// Removes and returns the least recently used key.
    pub fn pop_oldest(&mut self) -> Option<String> {
        self.order.pop_lru().map(|(key, _)| key)
    }

    // == Peek Oldest ==
    /// Returns the least recently used key without removing it.
    #[allow(dead_code)]
    pub fn peek_oldest(&self) -> Option<&String> {
        self.order.peek_lru().map(|(key, _)| key)
    }

    // == Clear ==
    /// Removes all keys.
    pub fn clear(&mut self) {
        self.order.clear();
    }

    // == Length ==
    /// Returns the number of tracked keys.
    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    // == Is Empty ==
    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    // == Contains ==
    /// Checks if a key is being tracked, without promoting it.
    #[allow(dead_code)]
    pub fn contains(&self, key: &str) -> bool {
        self.order.contains(key)
    }
}

impl Default for RecencyList {
    fn default() -> Self {
        Self::new()
    }
}
