//! JSON File User Store
//!
//! File-backed store persisting records as a single JSON document.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::users::{UserRecord, UserStore};

// == File Tables ==
/// On-disk document: both indexes, serialized together.
#[derive(Debug, Default, Serialize, Deserialize)]
struct FileTables {
    users: HashMap<String, UserRecord>,
    users_by_id: HashMap<String, UserRecord>,
}

// == JSON File User Store ==
/// User store persisted to a JSON file.
///
/// Every operation loads the document, applies the change and writes it
/// back under one lock, so the file always holds a complete document.
/// Built for modest data sets; each write rewrites the whole file.
#[derive(Debug)]
pub struct JsonFileUserStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileUserStore {
    // == Constructor ==
    /// Opens a store at `path`, creating an empty document if the file
    /// does not exist yet.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let store = Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        };

        if !store.path.exists() {
            debug!(path = %store.path.display(), "initializing user store file");
            store.write_tables(&FileTables::default())?;
        }

        Ok(store)
    }

    fn read_tables(&self) -> Result<FileTables> {
        // A vanished file degrades to the empty state; malformed JSON
        // is a real backend failure and propagates
        if !self.path.exists() {
            return Ok(FileTables::default());
        }

        let raw = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    fn write_tables(&self, tables: &FileTables) -> Result<()> {
        let raw = serde_json::to_string_pretty(tables)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }
}

impl UserStore for JsonFileUserStore {
    fn check_duplicate(&self, email: &str) -> Result<bool> {
        let _guard = self.lock.lock();
        let tables = self.read_tables()?;
        Ok(tables.users.contains_key(&email.to_lowercase()))
    }

    fn save_user(&self, record: &UserRecord) -> Result<bool> {
        let _guard = self.lock.lock();
        let mut tables = self.read_tables()?;
        let email = record.normalized_email();

        if let Some(previous) = tables.users.get(&email) {
            if previous.user_id != record.user_id {
                let stale_id = previous.user_id.clone();
                tables.users_by_id.remove(&stale_id);
            }
        }

        tables.users.insert(email, record.clone());
        tables
            .users_by_id
            .insert(record.user_id.clone(), record.clone());

        self.write_tables(&tables)?;
        Ok(true)
    }

    fn get_user_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        let _guard = self.lock.lock();
        let tables = self.read_tables()?;
        Ok(tables.users.get(&email.to_lowercase()).cloned())
    }

    fn get_user_by_id(&self, user_id: &str) -> Result<Option<UserRecord>> {
        let _guard = self.lock.lock();
        let tables = self.read_tables()?;
        Ok(tables.users_by_id.get(user_id).cloned())
    }

    fn delete_user(&self, email: &str) -> Result<bool> {
        let _guard = self.lock.lock();
        let mut tables = self.read_tables()?;

        if let Some(record) = tables.users.remove(&email.to_lowercase()) {
            tables.users_by_id.remove(&record.user_id);
            self.write_tables(&tables)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn get_all_users(&self) -> Result<Vec<UserRecord>> {
        let _guard = self.lock.lock();
        let tables = self.read_tables()?;
        Ok(tables.users.into_values().collect())
    }

    fn get_user_count(&self) -> Result<usize> {
        let _guard = self.lock.lock();
        let tables = self.read_tables()?;
        Ok(tables.users.len())
    }

    fn clear_all(&self) -> Result<()> {
        let _guard = self.lock.lock();
        self.write_tables(&FileTables::default())
    }
}
