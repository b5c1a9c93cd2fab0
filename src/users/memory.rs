//! In-Memory User Store
//!
//! HashMap-backed store for tests, development and single-process use.

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::error::Result;
use crate::users::{UserRecord, UserStore};

// == Tables ==
/// The two indexes, kept consistent under one lock.
#[derive(Debug, Default)]
struct Tables {
    by_email: HashMap<String, UserRecord>,
    by_id: HashMap<String, UserRecord>,
}

// == In-Memory User Store ==
/// Thread-safe in-memory user store.
///
/// Never fails: every operation returns `Ok`.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    tables: Mutex<Tables>,
}

impl InMemoryUserStore {
    // == Constructor ==
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserStore for InMemoryUserStore {
    fn check_duplicate(&self, email: &str) -> Result<bool> {
        let tables = self.tables.lock();
        Ok(tables.by_email.contains_key(&email.to_lowercase()))
    }

    fn save_user(&self, record: &UserRecord) -> Result<bool> {
        let mut tables = self.tables.lock();
        let email = record.normalized_email();

        // Drop a stale id index if this email was previously saved
        // under a different id
        let stale_id = tables
            .by_email
            .get(&email)
            .filter(|previous| previous.user_id != record.user_id)
            .map(|previous| previous.user_id.clone());
        if let Some(stale_id) = stale_id {
            tables.by_id.remove(&stale_id);
        }

        tables.by_email.insert(email, record.clone());
        tables.by_id.insert(record.user_id.clone(), record.clone());
        Ok(true)
    }

    fn get_user_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        let tables = self.tables.lock();
        Ok(tables.by_email.get(&email.to_lowercase()).cloned())
    }

    fn get_user_by_id(&self, user_id: &str) -> Result<Option<UserRecord>> {
        let tables = self.tables.lock();
        Ok(tables.by_id.get(user_id).cloned())
    }

    fn delete_user(&self, email: &str) -> Result<bool> {
        let mut tables = self.tables.lock();

        if let Some(record) = tables.by_email.remove(&email.to_lowercase()) {
            tables.by_id.remove(&record.user_id);
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn get_all_users(&self) -> Result<Vec<UserRecord>> {
        let tables = self.tables.lock();
        Ok(tables.by_email.values().cloned().collect())
    }

    fn get_user_count(&self) -> Result<usize> {
        let tables = self.tables.lock();
        Ok(tables.by_email.len())
    }

    fn clear_all(&self) -> Result<()> {
        let mut tables = self.tables.lock();
        tables.by_email.clear();
        tables.by_id.clear();
        Ok(())
    }
}
