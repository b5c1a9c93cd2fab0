//! Cacheside - a bounded in-memory cache fronting a user record store
//!
//! Provides a thread-safe cache with TTL expiration and LRU eviction,
//! plus a cache-aside wrapper that keeps derived cache entries
//! consistent with an authoritative user store.

pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;
pub mod users;

pub use cache::{BoundedTtlCache, CacheStats, KeyPattern};
pub use config::Config;
pub use error::{Result, StoreError};
pub use tasks::spawn_cleanup_task;
pub use users::{
    CacheValue, CachedUserStore, InMemoryUserStore, JsonFileUserStore, UserRecord, UserStore,
};
