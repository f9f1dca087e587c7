//! Storage port used by the task and user repositories.

use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

/// Storage key holding the serialised task list.
pub const TASKS_KEY: &str = "tasks";

/// Storage key holding the serialised user list.
pub const USERS_KEY: &str = "users";

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Key-value persistence contract.
///
/// Implementations store one JSON document per key. There is no schema
/// versioning; callers own the shape of the stored value.
#[cfg_attr(test, mockall::automock)]
pub trait EntityStore: Send + Sync {
    /// Loads the value stored under `key`.
    ///
    /// Returns `Ok(None)` when nothing has been saved under the key yet.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the backing medium cannot be read or
    /// holds a value that is not valid JSON.
    fn load(&self, key: &str) -> StorageResult<Option<Value>>;

    /// Replaces the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the value cannot be written.
    fn save(&self, key: &str, value: Value) -> StorageResult<()>;

    /// Loads the value stored under `key`, falling back to `default`.
    ///
    /// # Errors
    ///
    /// Propagates any error returned by [`EntityStore::load`].
    fn load_or(&self, key: &str, default: Value) -> StorageResult<Value> {
        Ok(self.load(key)?.unwrap_or(default))
    }
}

/// Errors returned by storage adapters.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    /// The backing medium could not be read or written.
    #[error("storage i/o error for key '{key}': {source}")]
    Io {
        /// Key being accessed.
        key: String,
        /// Underlying I/O failure.
        source: Arc<std::io::Error>,
    },

    /// A stored value is not valid JSON, or a value could not be encoded.
    #[error("storage serialisation error for key '{key}': {source}")]
    Serialization {
        /// Key being accessed.
        key: String,
        /// Underlying serde failure.
        source: Arc<serde_json::Error>,
    },

    /// A lock guarding shared state was poisoned.
    #[error("storage lock poisoned: {0}")]
    Poisoned(String),
}

impl StorageError {
    /// Wraps an I/O error for the given key.
    #[must_use]
    pub fn io(key: &str, err: std::io::Error) -> Self {
        Self::Io {
            key: key.to_owned(),
            source: Arc::new(err),
        }
    }

    /// Wraps a serde error for the given key.
    #[must_use]
    pub fn serialization(key: &str, err: serde_json::Error) -> Self {
        Self::Serialization {
            key: key.to_owned(),
            source: Arc::new(err),
        }
    }

    /// Wraps a lock-poisoning message.
    #[must_use]
    pub fn poisoned(err: impl std::fmt::Display) -> Self {
        Self::Poisoned(err.to_string())
    }
}
