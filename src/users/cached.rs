//! Cached User Store
//!
//! Cache-aside wrapper keeping a bounded TTL/LRU cache consistent with
//! an authoritative user store.
//!
//! Reads populate the cache on a miss; writes go to the backing store
//! first and then invalidate and refresh the affected entries. Three
//! cache keys are derived per record: `email:{email}`, `id:{user_id}`
//! and `dup:{email}`, with emails lowercased throughout.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::cache::{BoundedTtlCache, CacheStats, KeyPattern};
use crate::error::Result;
use crate::users::{UserRecord, UserStore};

// == Cache Value ==
/// What a derived key maps to: a full record or a duplicate-check flag.
#[derive(Debug, Clone)]
pub enum CacheValue {
    /// Full record, under `email:` and `id:` keys
    Record(UserRecord),
    /// Duplicate-check result, under `dup:` keys
    Flag(bool),
}

// == Derived Keys ==
fn email_key(email: &str) -> String {
    format!("email:{}", email.to_lowercase())
}

fn id_key(user_id: &str) -> String {
    format!("id:{}", user_id)
}

fn duplicate_key(email: &str) -> String {
    format!("dup:{}", email.to_lowercase())
}

// == Cached User Store ==
/// Cache-aside front for any [`UserStore`].
///
/// The cache lock is never held across a backing-store call: every
/// round trip is cache read, then store call, then cache write, as
/// three separate acquisitions. Two racing readers of a cold key may
/// therefore both query the store and both populate the cache; the
/// last write wins, which is the accepted cache-aside model.
///
/// Positive lookups and duplicate flags are cached; "record not found"
/// is never cached, so a record created moments later is visible to
/// the next read.
#[derive(Debug)]
pub struct CachedUserStore<S> {
    store: S,
    cache: Arc<BoundedTtlCache<CacheValue>>,
}

impl<S: UserStore> CachedUserStore<S> {
    // == Constructor ==
    /// Wraps `store` with a cache of `cache_size` entries and the given
    /// default TTL.
    ///
    /// # Errors
    /// Returns [`StoreError::ZeroCapacity`] for a zero `cache_size`.
    ///
    /// [`StoreError::ZeroCapacity`]: crate::error::StoreError::ZeroCapacity
    pub fn new(store: S, cache_size: usize, ttl: Duration) -> Result<Self> {
        Ok(Self {
            store,
            cache: Arc::new(BoundedTtlCache::new(cache_size, ttl)?),
        })
    }

    // == Cache Handle ==
    /// Shared handle to the underlying cache, e.g. for the background
    /// cleanup task.
    pub fn cache(&self) -> Arc<BoundedTtlCache<CacheValue>> {
        Arc::clone(&self.cache)
    }

    // == Check Duplicate ==
    /// Checks whether a record exists for this email, consulting the
    /// cached flag first.
    pub fn check_duplicate(&self, email: &str) -> Result<bool> {
        let key = duplicate_key(email);

        if let Some(CacheValue::Flag(flag)) = self.cache.get(&key) {
            return Ok(flag);
        }

        let exists = self.store.check_duplicate(email)?;
        self.cache.set(key, CacheValue::Flag(exists), None);

        Ok(exists)
    }

    // == Get By Email ==
    /// Looks up a record by email.
    ///
    /// A backing-store hit populates both the `email:` and `id:` keys;
    /// a miss populates nothing.
    pub fn get_user_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        let key = email_key(email);

        if let Some(CacheValue::Record(record)) = self.cache.get(&key) {
            return Ok(Some(record));
        }

        let found = self.store.get_user_by_email(email)?;

        if let Some(record) = &found {
            self.cache
                .set(key, CacheValue::Record(record.clone()), None);
            self.cache.set(
                id_key(&record.user_id),
                CacheValue::Record(record.clone()),
                None,
            );
        }

        Ok(found)
    }

    // == Get By Id ==
    /// Looks up a record by id, populating both derived keys on a
    /// backing-store hit.
    pub fn get_user_by_id(&self, user_id: &str) -> Result<Option<UserRecord>> {
        let key = id_key(user_id);

        if let Some(CacheValue::Record(record)) = self.cache.get(&key) {
            return Ok(Some(record));
        }

        let found = self.store.get_user_by_id(user_id)?;

        if let Some(record) = &found {
            self.cache
                .set(key, CacheValue::Record(record.clone()), None);
            self.cache.set(
                email_key(&record.email),
                CacheValue::Record(record.clone()),
                None,
            );
        }

        Ok(found)
    }

    // == Save ==
    /// Writes a record to the backing store, then refreshes all three
    /// derived keys.
    ///
    /// On a failed write (`Ok(false)` or `Err`) the cache is left
    /// untouched; no speculative cache writes happen before the store
    /// accepts the record.
    pub fn save_user(&self, record: &UserRecord) -> Result<bool> {
        let saved = self.store.save_user(record)?;

        if saved {
            self.invalidate_user(&record.email, &record.user_id);

            self.cache.set(
                email_key(&record.email),
                CacheValue::Record(record.clone()),
                None,
            );
            self.cache.set(
                id_key(&record.user_id),
                CacheValue::Record(record.clone()),
                None,
            );
            self.cache
                .set(duplicate_key(&record.email), CacheValue::Flag(true), None);
        }

        Ok(saved)
    }

    // == Delete ==
    /// Deletes a record from the backing store and drops its cache
    /// entries.
    ///
    /// The record is fetched first, because its id is only recoverable
    /// while the row still exists. If the store had no record for the
    /// email, the deletion result is returned with no invalidation.
    pub fn delete_user(&self, email: &str) -> Result<bool> {
        let previous = self.store.get_user_by_email(email)?;

        let deleted = self.store.delete_user(email)?;

        if deleted {
            if let Some(record) = previous {
                self.invalidate_user(&record.email, &record.user_id);
            }
        }

        Ok(deleted)
    }

    /// Drops all three derived keys for one record, in a single cache
    /// lock acquisition.
    fn invalidate_user(&self, email: &str, user_id: &str) {
        self.cache.delete_many([
            email_key(email),
            id_key(user_id),
            duplicate_key(email),
        ]);
    }

    // == Invalidate Pattern ==
    /// Removes every cache key matching a wildcard pattern; see
    /// [`KeyPattern`] for the supported forms. Returns how many entries
    /// were dropped.
    ///
    /// Maintenance operation, not meant for the hot path.
    pub fn invalidate_pattern(&self, pattern: &str) -> usize {
        let parsed = KeyPattern::parse(pattern);
        let removed = self.cache.delete_matching(|key| parsed.matches(key));

        debug!(pattern, removed, "bulk cache invalidation");
        removed
    }

    // == Warm Cache ==
    /// Pre-populates cache entries for the given emails and ids.
    ///
    /// Keys with no upstream record are skipped silently. Returns how
    /// many lookups found a record to warm with.
    pub fn warm_cache(&self, emails: &[&str], user_ids: &[&str]) -> Result<usize> {
        let mut warmed = 0;

        for email in emails {
            if let Some(record) = self.store.get_user_by_email(email)? {
                self.cache.set(
                    email_key(email),
                    CacheValue::Record(record.clone()),
                    None,
                );
                self.cache
                    .set(id_key(&record.user_id), CacheValue::Record(record), None);
                warmed += 1;
            }
        }

        for user_id in user_ids {
            if let Some(record) = self.store.get_user_by_id(user_id)? {
                self.cache.set(
                    id_key(user_id),
                    CacheValue::Record(record.clone()),
                    None,
                );
                self.cache
                    .set(email_key(&record.email), CacheValue::Record(record), None);
                warmed += 1;
            }
        }

        debug!(warmed, "cache warmed");
        Ok(warmed)
    }

    // == Uncached Passthroughs ==
    /// Returns every record, straight from the backing store.
    ///
    /// Never cached: the result set changes on every write, so staleness
    /// here would be highly visible.
    pub fn get_all_users(&self) -> Result<Vec<UserRecord>> {
        self.store.get_all_users()
    }

    /// Returns the record count, straight from the backing store.
    pub fn get_user_count(&self) -> Result<usize> {
        self.store.get_user_count()
    }

    // == Clear All ==
    /// Empties the backing store and the cache together.
    pub fn clear_all(&self) -> Result<()> {
        self.store.clear_all()?;
        self.cache.clear();
        Ok(())
    }

    // == Cache Maintenance ==
    /// Snapshot of the cache's performance counters.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Eagerly sweeps expired cache entries; returns how many were
    /// removed.
    pub fn cleanup_expired_cache(&self) -> usize {
        self.cache.cleanup_expired()
    }
}
