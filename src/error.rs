//! Error types for the cache and user storage layers
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Store Error Enum ==
/// Unified error type for the cache-aside storage stack.
///
/// Cache reads and deletes never fail; a missing or expired key is an
/// `Option`/`bool` result, not an error. Every variant here originates
/// either from a construction-time contract violation or from the
/// backing store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Cache constructed with a capacity of zero entries
    #[error("cache capacity must be at least 1 entry")]
    ZeroCapacity,

    /// Backing store I/O failure
    #[error("storage backend failure: {0}")]
    Backend(String),

    /// Backing store data could not be serialized or deserialized
    #[error("storage format error: {0}")]
    Format(#[from] serde_json::Error),
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Backend(err.to_string())
    }
}

// == Result Type Alias ==
/// Convenience Result type for the storage stack.
pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_capacity_message() {
        let err = StoreError::ZeroCapacity;
        assert!(err.to_string().contains("capacity"));
    }

    #[test]
    fn test_io_error_converts_to_backend() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: StoreError = io.into();
        assert!(matches!(err, StoreError::Backend(_)));
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn test_json_error_converts_to_format() {
        let bad = serde_json::from_str::<serde_json::Value>("{not json");
        let err: StoreError = bad.unwrap_err().into();
        assert!(matches!(err, StoreError::Format(_)));
    }
}
