//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with recency tracking and
//! TTL expiration, behind a single mutex.

use std::collections::HashMap;
use std::time::Duration;

use parking_lot::Mutex;

use crate::cache::entry::CacheEntry;
use crate::cache::lru::RecencyList;
use crate::cache::stats::{CacheStats, StatRecorder};
use crate::error::{Result, StoreError};

// == Cache Core ==
/// Unsynchronized cache state: the entry map, the recency list and the
/// counters. Only ever touched while the owning mutex is held.
#[derive(Debug)]
struct CacheCore<V> {
    entries: HashMap<String, CacheEntry<V>>,
    recency: RecencyList,
    stats: StatRecorder,
    max_size: usize,
    default_ttl: Duration,
}

impl<V: Clone> CacheCore<V> {
    fn new(max_size: usize, default_ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            recency: RecencyList::new(),
            stats: StatRecorder::default(),
            max_size,
            default_ttl,
        }
    }

    fn get(&mut self, key: &str) -> Option<V> {
        if let Some(entry) = self.entries.get(key) {
            if entry.is_expired() {
                // Lazy expiry: an expired key found on read is removed
                // as part of the read and counted as a miss
                self.entries.remove(key);
                self.recency.remove(key);
                self.stats.record_miss();
                return None;
            }

            let value = entry.value.clone();
            self.recency.touch(key);
            self.stats.record_hit();
            Some(value)
        } else {
            self.stats.record_miss();
            None
        }
    }

    fn set(&mut self, key: String, value: V, ttl: Option<Duration>) {
        let ttl = ttl.unwrap_or(self.default_ttl);

        // An overwrite counts as a fresh insertion: the old entry is
        // replaced wholesale and the key becomes most recently used
        self.entries.insert(key.clone(), CacheEntry::new(value, ttl));
        self.recency.touch(&key);

        // set grows the map by at most one, so one eviction suffices
        if self.entries.len() > self.max_size {
            if let Some(oldest) = self.recency.pop_oldest() {
                self.entries.remove(&oldest);
                self.stats.record_eviction();
            }
        }
    }

    fn delete(&mut self, key: &str) -> bool {
        if self.entries.remove(key).is_some() {
            self.recency.remove(key);
            true
        } else {
            false
        }
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.recency.clear();
        self.stats.reset();
    }

    fn cleanup_expired(&mut self) -> usize {
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            self.entries.remove(key);
            self.recency.remove(key);
        }

        expired.len()
    }

    fn delete_matching(&mut self, pred: &dyn Fn(&str) -> bool) -> usize {
        let doomed: Vec<String> = self
            .entries
            .keys()
            .filter(|key| pred(key.as_str()))
            .cloned()
            .collect();

        for key in &doomed {
            self.entries.remove(key);
            self.recency.remove(key);
        }

        doomed.len()
    }
}

// == Bounded TTL Cache ==
/// Thread-safe, size-bounded cache with per-entry TTL and LRU eviction.
///
/// All state lives behind one mutex; every public operation is a single
/// scoped lock acquisition, so operations are linearizable and the lock
/// is released on every exit path. Everything except [`cleanup_expired`]
/// is O(1) amortized.
///
/// [`cleanup_expired`]: BoundedTtlCache::cleanup_expired
#[derive(Debug)]
pub struct BoundedTtlCache<V> {
    core: Mutex<CacheCore<V>>,
}

impl<V: Clone> BoundedTtlCache<V> {
    // == Constructor ==
    /// Creates a cache holding at most `max_size` entries.
    ///
    /// `default_ttl` applies to entries stored without an explicit TTL;
    /// a zero duration means those entries never expire by time.
    ///
    /// # Errors
    /// Returns [`StoreError::ZeroCapacity`] if `max_size` is zero. A
    /// cache that can hold no entries while accepting inserts is a
    /// contract violation, rejected at construction rather than coerced.
    pub fn new(max_size: usize, default_ttl: Duration) -> Result<Self> {
        if max_size == 0 {
            return Err(StoreError::ZeroCapacity);
        }

        Ok(Self {
            core: Mutex::new(CacheCore::new(max_size, default_ttl)),
        })
    }

    // == Get ==
    /// Retrieves a clone of the value for `key`.
    ///
    /// A hit promotes the key to most recently used. A miss (absent or
    /// expired) returns None; an expired entry is removed on the spot.
    pub fn get(&self, key: &str) -> Option<V> {
        self.core.lock().get(key)
    }

    // == Set ==
    /// Upserts a value under `key` with an optional TTL.
    ///
    /// `None` uses the cache's default TTL; an explicit zero duration
    /// stores an entry that never expires by time. If the insert pushes
    /// the cache over capacity, the least recently used entry is evicted.
    pub fn set(&self, key: impl Into<String>, value: V, ttl: Option<Duration>) {
        self.core.lock().set(key.into(), value, ttl);
    }

    // == Delete ==
    /// Removes `key` if present. Returns whether it was present.
    ///
    /// Does not touch the hit/miss counters.
    pub fn delete(&self, key: &str) -> bool {
        self.core.lock().delete(key)
    }

    // == Delete Many ==
    /// Removes every listed key under one lock acquisition.
    ///
    /// Returns how many of the keys were actually present.
    pub fn delete_many<I, K>(&self, keys: I) -> usize
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let mut core = self.core.lock();
        keys.into_iter()
            .filter(|key| core.delete(key.as_ref()))
            .count()
    }

    // == Delete Matching ==
    /// Removes every key accepted by `pred` under one lock acquisition.
    ///
    /// Returns the number of removed entries. O(n) over live keys; meant
    /// for maintenance, not the hot path.
    pub fn delete_matching(&self, pred: impl Fn(&str) -> bool) -> usize {
        self.core.lock().delete_matching(&pred)
    }

    // == Clear ==
    /// Empties the cache and resets all counters.
    pub fn clear(&self) {
        self.core.lock().clear();
    }

    // == Cleanup Expired ==
    /// Eagerly removes every expired entry.
    ///
    /// Returns how many entries were removed. Misses are not recorded.
    /// The only O(n) operation besides [`delete_matching`].
    ///
    /// [`delete_matching`]: BoundedTtlCache::delete_matching
    pub fn cleanup_expired(&self) -> usize {
        self.core.lock().cleanup_expired()
    }

    // == Stats ==
    /// Returns a snapshot of current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let core = self.core.lock();
        core.stats.snapshot(core.entries.len(), core.max_size)
    }

    // == Keys ==
    /// Returns a snapshot of all live keys, in no particular order.
    ///
    /// Expired-but-unobserved keys may still appear.
    pub fn keys(&self) -> Vec<String> {
        self.core.lock().entries.keys().cloned().collect()
    }

    // == Length ==
    /// Returns the current number of entries.
    pub fn len(&self) -> usize {
        self.core.lock().entries.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.core.lock().entries.is_empty()
    }

    // == Contains ==
    /// Checks presence without promoting the key or counting a hit/miss.
    ///
    /// Expired-but-unobserved keys still count as present.
    pub fn contains(&self, key: &str) -> bool {
        self.core.lock().entries.contains_key(key)
    }
}
