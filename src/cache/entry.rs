//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// A single cached value plus its expiry instant.
///
/// Entries are owned exclusively by the cache map and replaced wholesale
/// on update.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Expiration instant, None = never expires
    expires_at: Option<Instant>,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry.
    ///
    /// A zero TTL means the entry never expires by time; it is only
    /// removed by LRU pressure or explicit deletion.
    pub fn new(value: V, ttl: Duration) -> Self {
        let expires_at = (ttl > Duration::ZERO).then(|| Instant::now() + ttl);
        Self { value, expires_at }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// Boundary condition: an entry is expired once the current instant is
    /// greater than or equal to the expiry instant.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires) => Instant::now() >= expires,
            None => false,
        }
    }

    // == Time To Live ==
    /// Returns remaining TTL, or None if the entry never expires.
    ///
    /// Expired entries report a remaining TTL of zero.
    pub fn ttl_remaining(&self) -> Option<Duration> {
        self.expires_at
            .map(|expires| expires.saturating_duration_since(Instant::now()))
    }
}
