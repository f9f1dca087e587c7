//! In-memory storage adapter.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::storage::ports::{EntityStore, StorageError, StorageResult};

/// Thread-safe in-memory key-value store.
///
/// Clones share the same underlying map, so a repository built from a clone
/// observes everything written through the original.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    entries: Arc<RwLock<HashMap<String, Value>>>,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with a single key.
    #[must_use]
    pub fn with_entry(key: impl Into<String>, value: Value) -> Self {
        let entries = HashMap::from([(key.into(), value)]);
        Self {
            entries: Arc::new(RwLock::new(entries)),
        }
    }
}

impl EntityStore for InMemoryStore {
    fn load(&self, key: &str) -> StorageResult<Option<Value>> {
        let entries = self.entries.read().map_err(StorageError::poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn save(&self, key: &str, value: Value) -> StorageResult<()> {
        let mut entries = self.entries.write().map_err(StorageError::poisoned)?;
        entries.insert(key.to_owned(), value);
        Ok(())
    }
}
