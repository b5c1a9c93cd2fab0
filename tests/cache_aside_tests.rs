//! Integration Tests for the Cache-Aside User Store
//!
//! Exercises the full stack: cached wrapper, backing stores, failure
//! propagation and concurrent access.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use cacheside::{
    BoundedTtlCache, CachedUserStore, InMemoryUserStore, JsonFileUserStore, Result, StoreError,
    UserRecord, UserStore,
};

const TTL: Duration = Duration::from_secs(300);

fn record(id: &str, email: &str) -> UserRecord {
    UserRecord::new(id, email, "user", "hash")
}

// == Test Doubles ==

/// Counts backing-store lookups so tests can tell hits from misses.
struct CountingStore {
    inner: InMemoryUserStore,
    email_lookups: AtomicUsize,
    id_lookups: AtomicUsize,
    duplicate_checks: AtomicUsize,
}

impl CountingStore {
    fn new() -> Self {
        Self {
            inner: InMemoryUserStore::new(),
            email_lookups: AtomicUsize::new(0),
            id_lookups: AtomicUsize::new(0),
            duplicate_checks: AtomicUsize::new(0),
        }
    }
}

impl UserStore for CountingStore {
    fn check_duplicate(&self, email: &str) -> Result<bool> {
        self.duplicate_checks.fetch_add(1, Ordering::SeqCst);
        self.inner.check_duplicate(email)
    }

    fn save_user(&self, record: &UserRecord) -> Result<bool> {
        self.inner.save_user(record)
    }

    fn get_user_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        self.email_lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.get_user_by_email(email)
    }

    fn get_user_by_id(&self, user_id: &str) -> Result<Option<UserRecord>> {
        self.id_lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.get_user_by_id(user_id)
    }

    fn delete_user(&self, email: &str) -> Result<bool> {
        self.inner.delete_user(email)
    }

    fn get_all_users(&self) -> Result<Vec<UserRecord>> {
        self.inner.get_all_users()
    }

    fn get_user_count(&self) -> Result<usize> {
        self.inner.get_user_count()
    }

    fn clear_all(&self) -> Result<()> {
        self.inner.clear_all()
    }
}

/// Fails every operation once `failing` is flipped on.
struct FlakyStore {
    inner: InMemoryUserStore,
    failing: AtomicBool,
}

impl FlakyStore {
    fn new() -> Self {
        Self {
            inner: InMemoryUserStore::new(),
            failing: AtomicBool::new(false),
        }
    }

    fn fail_from_now_on(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    fn check(&self) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            Err(StoreError::Backend("store offline".to_string()))
        } else {
            Ok(())
        }
    }
}

impl UserStore for FlakyStore {
    fn check_duplicate(&self, email: &str) -> Result<bool> {
        self.check()?;
        self.inner.check_duplicate(email)
    }

    fn save_user(&self, record: &UserRecord) -> Result<bool> {
        self.check()?;
        self.inner.save_user(record)
    }

    fn get_user_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        self.check()?;
        self.inner.get_user_by_email(email)
    }

    fn get_user_by_id(&self, user_id: &str) -> Result<Option<UserRecord>> {
        self.check()?;
        self.inner.get_user_by_id(user_id)
    }

    fn delete_user(&self, email: &str) -> Result<bool> {
        self.check()?;
        self.inner.delete_user(email)
    }

    fn get_all_users(&self) -> Result<Vec<UserRecord>> {
        self.check()?;
        self.inner.get_all_users()
    }

    fn get_user_count(&self) -> Result<usize> {
        self.check()?;
        self.inner.get_user_count()
    }

    fn clear_all(&self) -> Result<()> {
        self.check()?;
        self.inner.clear_all()
    }
}

// == Cache-Aside Round Trips ==

#[test]
fn save_read_delete_leaves_nothing_behind() {
    let backing = Arc::new(InMemoryUserStore::new());
    let users = CachedUserStore::new(backing.clone(), 100, TTL).unwrap();

    users.save_user(&record("u1", "a@x.com")).unwrap();
    assert!(users.get_user_by_email("a@x.com").unwrap().is_some());

    assert!(users.delete_user("a@x.com").unwrap());

    // Both the cache and the backing store must report "not found"
    assert!(users.get_user_by_email("a@x.com").unwrap().is_none());
    assert!(backing.get_user_by_email("a@x.com").unwrap().is_none());
    assert!(users.get_user_by_id("u1").unwrap().is_none());
}

#[test]
fn cached_reads_do_not_touch_the_backing_store() {
    let backing = Arc::new(CountingStore::new());
    backing.save_user(&record("u1", "a@x.com")).unwrap();
    let users = CachedUserStore::new(backing.clone(), 100, TTL).unwrap();

    for _ in 0..5 {
        users.get_user_by_email("a@x.com").unwrap().unwrap();
    }

    // One cold miss, four cache hits
    assert_eq!(backing.email_lookups.load(Ordering::SeqCst), 1);

    // The by-email populate also primed the id index
    users.get_user_by_id("u1").unwrap().unwrap();
    assert_eq!(backing.id_lookups.load(Ordering::SeqCst), 0);
}

#[test]
fn duplicate_flag_is_cached_per_email() {
    let backing = Arc::new(CountingStore::new());
    let users = CachedUserStore::new(backing.clone(), 100, TTL).unwrap();

    assert!(!users.check_duplicate("a@x.com").unwrap());
    assert!(!users.check_duplicate("A@X.COM").unwrap());
    assert!(!users.check_duplicate("b@x.com").unwrap());

    // Case variants share one cached flag
    assert_eq!(backing.duplicate_checks.load(Ordering::SeqCst), 2);
}

#[test]
fn negative_lookups_hit_the_store_every_time() {
    let backing = Arc::new(CountingStore::new());
    let users = CachedUserStore::new(backing.clone(), 100, TTL).unwrap();

    assert!(users.get_user_by_email("ghost@x.com").unwrap().is_none());
    assert!(users.get_user_by_email("ghost@x.com").unwrap().is_none());

    // "Not found" is never cached, so a record created later is
    // visible immediately
    assert_eq!(backing.email_lookups.load(Ordering::SeqCst), 2);

    backing.save_user(&record("u9", "ghost@x.com")).unwrap();
    assert!(users.get_user_by_email("ghost@x.com").unwrap().is_some());
}

#[test]
fn case_insensitive_round_trip() {
    let users = CachedUserStore::new(Arc::new(InMemoryUserStore::new()), 100, TTL).unwrap();

    users
        .save_user(&record("u1", "Test@Example.com"))
        .unwrap();

    let found = users.get_user_by_email("test@example.com").unwrap();
    assert_eq!(found.unwrap().user_id, "u1");

    assert!(users.check_duplicate("TEST@EXAMPLE.COM").unwrap());
    assert!(users.delete_user("tesT@exAmple.cOm").unwrap());
    assert!(users.get_user_by_email("Test@Example.com").unwrap().is_none());
}

#[test]
fn pattern_invalidation_spares_other_key_families() {
    let users = CachedUserStore::new(Arc::new(InMemoryUserStore::new()), 100, TTL).unwrap();

    users.save_user(&record("u1", "a@x.com")).unwrap();
    users.save_user(&record("u2", "b@x.com")).unwrap();

    assert_eq!(users.invalidate_pattern("email:*"), 2);

    let cache = users.cache();
    let mut keys = cache.keys();
    keys.sort();
    assert_eq!(
        keys,
        vec!["dup:a@x.com", "dup:b@x.com", "id:u1", "id:u2"]
    );
}

#[test]
fn warming_then_reading_skips_the_store() {
    let backing = Arc::new(CountingStore::new());
    backing.save_user(&record("u1", "a@x.com")).unwrap();
    backing.save_user(&record("u2", "b@x.com")).unwrap();
    let users = CachedUserStore::new(backing.clone(), 100, TTL).unwrap();

    let warmed = users.warm_cache(&["a@x.com"], &["u2"]).unwrap();
    assert_eq!(warmed, 2);
    let lookups_after_warming = backing.email_lookups.load(Ordering::SeqCst)
        + backing.id_lookups.load(Ordering::SeqCst);

    users.get_user_by_email("a@x.com").unwrap().unwrap();
    users.get_user_by_id("u2").unwrap().unwrap();
    users.get_user_by_email("b@x.com").unwrap().unwrap();

    assert_eq!(
        backing.email_lookups.load(Ordering::SeqCst)
            + backing.id_lookups.load(Ordering::SeqCst),
        lookups_after_warming
    );
}

// == Failure Propagation ==

#[test]
fn read_failure_is_an_error_not_a_miss() {
    let backing = Arc::new(FlakyStore::new());
    let users = CachedUserStore::new(backing.clone(), 100, TTL).unwrap();

    backing.fail_from_now_on();

    let result = users.get_user_by_email("a@x.com");
    assert!(matches!(result, Err(StoreError::Backend(_))));

    let result = users.check_duplicate("a@x.com");
    assert!(matches!(result, Err(StoreError::Backend(_))));
}

#[test]
fn failed_save_leaves_the_cache_untouched() {
    let backing = Arc::new(FlakyStore::new());
    let users = CachedUserStore::new(backing.clone(), 100, TTL).unwrap();

    backing.fail_from_now_on();

    let result = users.save_user(&record("u1", "a@x.com"));
    assert!(result.is_err());

    let cache = users.cache();
    assert!(cache.is_empty());
}

#[test]
fn stale_cache_entry_survives_failed_save() {
    let backing = Arc::new(FlakyStore::new());
    let users = CachedUserStore::new(backing.clone(), 100, TTL).unwrap();

    users.save_user(&record("u1", "a@x.com")).unwrap();
    backing.fail_from_now_on();

    let mut updated = record("u1", "a@x.com");
    updated.username = "renamed".to_string();
    assert!(users.save_user(&updated).is_err());

    // No speculative invalidation happened before the store accepted
    // the write, so the old entry still serves
    let cached = users.get_user_by_email("a@x.com").unwrap().unwrap();
    assert_eq!(cached.username, "user");
}

// == File Store End To End ==

#[test]
fn cache_aside_over_the_json_file_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("users.json");
    let backing = Arc::new(JsonFileUserStore::new(&path).unwrap());
    let users = CachedUserStore::new(backing, 100, TTL).unwrap();

    users.save_user(&record("u1", "a@x.com")).unwrap();
    assert!(users.get_user_by_email("A@x.com").unwrap().is_some());
    assert!(users.delete_user("a@x.com").unwrap());
    assert!(users.get_user_by_email("a@x.com").unwrap().is_none());

    // A fresh store over the same file sees the final state
    let reopened = JsonFileUserStore::new(&path).unwrap();
    assert_eq!(reopened.get_user_count().unwrap(), 0);
}

// == Concurrency ==

#[test]
fn concurrent_set_get_on_disjoint_keys_keeps_size_consistent() {
    const THREADS: usize = 8;
    const KEYS_PER_THREAD: usize = 50;

    let cache = Arc::new(BoundedTtlCache::new(1000, TTL).unwrap());

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for i in 0..KEYS_PER_THREAD {
                    let key = format!("t{}:k{}", t, i);
                    cache.set(key.clone(), i, None);
                    assert_eq!(cache.get(&key), Some(i));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    // All keys are disjoint and fit under max_size, so nothing was
    // evicted and the map holds exactly one entry per set key
    let stats = cache.stats();
    assert_eq!(stats.size, THREADS * KEYS_PER_THREAD);
    assert_eq!(stats.evictions, 0);
    assert_eq!(stats.hits, (THREADS * KEYS_PER_THREAD) as u64);
}

#[test]
fn concurrent_churn_never_exceeds_capacity() {
    const THREADS: usize = 4;
    const OPS: usize = 200;
    const MAX_SIZE: usize = 32;

    let cache = Arc::new(BoundedTtlCache::new(MAX_SIZE, TTL).unwrap());

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for i in 0..OPS {
                    cache.set(format!("t{}:k{}", t, i % 40), i, None);
                    let _ = cache.get(&format!("t{}:k{}", t, (i + 7) % 40));
                    assert!(cache.len() <= MAX_SIZE);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert!(cache.len() <= MAX_SIZE);
}

#[test]
fn concurrent_cache_aside_readers_agree() {
    const THREADS: usize = 8;

    let backing = Arc::new(InMemoryUserStore::new());
    backing.save_user(&record("u1", "a@x.com")).unwrap();
    let users = Arc::new(CachedUserStore::new(backing, 200, TTL).unwrap());

    // Cold key: several readers race through the miss path; every one
    // must come back with the same record
    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let users = Arc::clone(&users);
            thread::spawn(move || {
                let found = users.get_user_by_email("a@x.com").unwrap().unwrap();
                assert_eq!(found.user_id, "u1");
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert!(users.cache().contains("email:a@x.com"));
}
