//! User Storage Module
//!
//! The backing user stores and the cache-aside wrapper that fronts them.

mod cached;
mod file;
mod memory;
mod record;

use std::sync::Arc;

use crate::error::Result;

// Re-export public types
pub use cached::{CacheValue, CachedUserStore};
pub use file::JsonFileUserStore;
pub use memory::InMemoryUserStore;
pub use record::UserRecord;

// == User Store Trait ==
/// Capability surface of an authoritative user store.
///
/// Lookups return `Ok(None)` for missing records; `Err` is reserved for
/// genuine backend failures, so callers can always tell "not found" from
/// "lookup failed". `save_user` reports success as a boolean and keeps
/// `Err` for the same backend failures.
pub trait UserStore: Send + Sync {
    /// Checks whether a record exists for this email (case-insensitive).
    fn check_duplicate(&self, email: &str) -> Result<bool>;

    /// Upserts a record, indexed by lowercased email and by id.
    fn save_user(&self, record: &UserRecord) -> Result<bool>;

    /// Looks up a record by email (case-insensitive).
    fn get_user_by_email(&self, email: &str) -> Result<Option<UserRecord>>;

    /// Looks up a record by id.
    fn get_user_by_id(&self, user_id: &str) -> Result<Option<UserRecord>>;

    /// Deletes the record for this email. Returns whether one existed.
    fn delete_user(&self, email: &str) -> Result<bool>;

    /// Returns every stored record.
    fn get_all_users(&self) -> Result<Vec<UserRecord>>;

    /// Returns the number of stored records.
    fn get_user_count(&self) -> Result<usize>;

    /// Removes every stored record.
    fn clear_all(&self) -> Result<()>;
}

// Shared handles delegate, so a store can be owned by the cache-aside
// wrapper and still be reachable for direct access (or by other services)
impl<T: UserStore + ?Sized> UserStore for Arc<T> {
    fn check_duplicate(&self, email: &str) -> Result<bool> {
        (**self).check_duplicate(email)
    }

    fn save_user(&self, record: &UserRecord) -> Result<bool> {
        (**self).save_user(record)
    }

    fn get_user_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        (**self).get_user_by_email(email)
    }

    fn get_user_by_id(&self, user_id: &str) -> Result<Option<UserRecord>> {
        (**self).get_user_by_id(user_id)
    }

    fn delete_user(&self, email: &str) -> Result<bool> {
        (**self).delete_user(email)
    }

    fn get_all_users(&self) -> Result<Vec<UserRecord>> {
        (**self).get_all_users()
    }

    fn get_user_count(&self) -> Result<usize> {
        (**self).get_user_count()
    }

    fn clear_all(&self) -> Result<()> {
        (**self).clear_all()
    }
}
