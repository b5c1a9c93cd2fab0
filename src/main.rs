//! Cacheside demo binary
//!
//! Walks the cache-aside user store through its paces: seeding,
//! hit/miss behaviour, warming, pattern invalidation and deletion,
//! with the background TTL sweep running alongside.

use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cacheside::{
    spawn_cleanup_task, CachedUserStore, Config, InMemoryUserStore, JsonFileUserStore,
    UserRecord, UserStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber with env filter
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cacheside=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting cacheside demo");

    let config = Config::from_env();
    info!(
        "Configuration loaded: cache_max_entries={}, default_ttl={}s, cleanup_interval={}s",
        config.cache_max_entries, config.cache_default_ttl, config.cleanup_interval
    );

    let backing: Arc<dyn UserStore> = match &config.user_store_path {
        Some(path) => {
            info!("Using JSON user store at {}", path.display());
            Arc::new(JsonFileUserStore::new(path).context("opening user store file")?)
        }
        None => {
            info!("Using in-memory user store");
            Arc::new(InMemoryUserStore::new())
        }
    };

    let users = CachedUserStore::new(
        backing,
        config.cache_max_entries,
        config.default_ttl(),
    )
    .context("creating cached user store")?;

    let cleanup_handle = spawn_cleanup_task(users.cache(), config.cleanup_interval);

    // Seed a handful of accounts
    for (id, email, name) in [
        ("u1", "alice@example.com", "alice"),
        ("u2", "bob@example.com", "bob"),
        ("u3", "carol@example.com", "carol"),
    ] {
        users.save_user(&UserRecord::new(id, email, name, "hash"))?;
    }
    info!("Seeded {} users", users.get_user_count()?);

    // First lookup is served from the save-time populate; the
    // duplicate check flag was cached the same way
    let alice = users.get_user_by_email("Alice@Example.com")?;
    info!("Lookup by email (case-folded): {:?}", alice.map(|u| u.username));
    info!("Duplicate check: {}", users.check_duplicate("alice@example.com")?);

    // Bulk invalidation drops the email index, leaving id and dup keys
    let removed = users.invalidate_pattern("email:*");
    info!("Invalidated {} email keys", removed);

    // The next email read misses and repopulates from the backing store
    let bob = users.get_user_by_email("bob@example.com")?;
    info!("Lookup after invalidation: {:?}", bob.map(|u| u.username));

    // Warm the remaining accounts back in
    let warmed = users.warm_cache(&["alice@example.com", "carol@example.com"], &[])?;
    info!("Warmed {} records", warmed);

    users.delete_user("bob@example.com")?;
    info!(
        "Deleted bob; store now holds {} users",
        users.get_user_count()?
    );

    let stats = users.cache_stats();
    info!(
        "Cache stats: size={} hits={} misses={} evictions={} hit_rate={}%",
        stats.size, stats.hits, stats.misses, stats.evictions, stats.hit_rate
    );

    cleanup_handle.abort();
    info!("Demo complete");

    Ok(())
}
