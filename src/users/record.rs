//! User Record Module
//!
//! The account record persisted by the user stores.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// == User Record ==
/// A stored user account.
///
/// Email lookup is case-insensitive everywhere; stores index records by
/// the lowercased address while preserving the address as entered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Stable unique identifier
    pub user_id: String,
    /// Email address as entered at registration
    pub email: String,
    /// Display name
    pub username: String,
    /// Salted password hash, opaque to the storage layer
    pub password_hash: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Soft-delete / suspension flag
    pub is_active: bool,
}

impl UserRecord {
    // == Constructor ==
    /// Creates an active record stamped with the current time.
    pub fn new(
        user_id: impl Into<String>,
        email: impl Into<String>,
        username: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            email: email.into(),
            username: username.into(),
            password_hash: password_hash.into(),
            created_at: Utc::now(),
            is_active: true,
        }
    }

    // == Normalized Email ==
    /// The lowercased form of the email, used as the index key.
    pub fn normalized_email(&self) -> String {
        self.email.to_lowercase()
    }
}
