//! Storage selection.

use camino::Utf8PathBuf;
use serde_json::Value;

use crate::storage::{EntityStore, InMemoryStore, JsonDirStore, StorageResult};

/// Which storage adapter repositories should mirror into.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StorageConfig {
    /// Keep everything in process memory.
    #[default]
    InMemory,
    /// Keep one JSON file per entity kind in this directory, creating it if
    /// needed.
    JsonDir(Utf8PathBuf),
}

impl StorageConfig {
    /// Opens the configured adapter.
    ///
    /// # Errors
    ///
    /// Returns [`crate::storage::StorageError`] when the data directory
    /// cannot be created or opened.
    pub fn open(&self) -> StorageResult<ConfiguredStore> {
        match self {
            Self::InMemory => Ok(ConfiguredStore::Memory(InMemoryStore::new())),
            Self::JsonDir(root) => Ok(ConfiguredStore::JsonDir(JsonDirStore::create(root)?)),
        }
    }
}

/// Store opened from a [`StorageConfig`].
#[derive(Debug)]
pub enum ConfiguredStore {
    /// In-memory adapter.
    Memory(InMemoryStore),
    /// Directory-backed adapter.
    JsonDir(JsonDirStore),
}

impl EntityStore for ConfiguredStore {
    fn load(&self, key: &str) -> StorageResult<Option<Value>> {
        match self {
            Self::Memory(store) => store.load(key),
            Self::JsonDir(store) => store.load(key),
        }
    }

    fn save(&self, key: &str, value: Value) -> StorageResult<()> {
        match self {
            Self::Memory(store) => store.save(key, value),
            Self::JsonDir(store) => store.save(key, value),
        }
    }
}
