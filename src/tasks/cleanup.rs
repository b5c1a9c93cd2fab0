//! TTL Cleanup Task
//!
//! Background task that periodically removes expired cache entries.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::BoundedTtlCache;

/// Spawns a background task that periodically sweeps expired cache
/// entries.
///
/// Expiry is otherwise lazy (checked on access), so without the sweep an
/// expired entry that is never read again would occupy a slot until LRU
/// pressure pushes it out.
///
/// # Arguments
/// * `cache` - Shared handle to the cache to sweep
/// * `cleanup_interval_secs` - Interval in seconds between sweeps
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the
/// task during shutdown.
pub fn spawn_cleanup_task<V>(
    cache: Arc<BoundedTtlCache<V>>,
    cleanup_interval_secs: u64,
) -> JoinHandle<()>
where
    V: Clone + Send + 'static,
{
    let interval = Duration::from_secs(cleanup_interval_secs);

    tokio::spawn(async move {
        info!(
            "Starting TTL cleanup task with interval of {} seconds",
            cleanup_interval_secs
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = cache.cleanup_expired();

            if removed > 0 {
                info!("TTL cleanup: removed {} expired entries", removed);
            } else {
                debug!("TTL cleanup: no expired entries found");
            }
        }
    })
}
