//! Configuration Module
//!
//! Handles loading and managing runtime configuration from environment
//! variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Runtime configuration parameters.
///
/// All values can be configured via environment variables with sensible
/// defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of entries the cache can hold
    pub cache_max_entries: usize,
    /// Default TTL in seconds for cache entries without an explicit TTL
    pub cache_default_ttl: u64,
    /// Background cleanup task interval in seconds
    pub cleanup_interval: u64,
    /// Path for the JSON user store; None selects the in-memory store
    pub user_store_path: Option<PathBuf>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_MAX_ENTRIES` - Maximum cache entries (default: 1000)
    /// - `CACHE_DEFAULT_TTL` - Default TTL in seconds (default: 300)
    /// - `CLEANUP_INTERVAL` - Cleanup frequency in seconds (default: 1)
    /// - `USER_STORE_PATH` - JSON store file path (default: in-memory)
    pub fn from_env() -> Self {
        Self {
            cache_max_entries: env::var("CACHE_MAX_ENTRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1000),
            cache_default_ttl: env::var("CACHE_DEFAULT_TTL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(300),
            cleanup_interval: env::var("CLEANUP_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1),
            user_store_path: env::var("USER_STORE_PATH").ok().map(PathBuf::from),
        }
    }

    /// The default TTL as a duration.
    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_default_ttl)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_max_entries: 1000,
            cache_default_ttl: 300,
            cleanup_interval: 1,
            user_store_path: None,
        }
    }
}
