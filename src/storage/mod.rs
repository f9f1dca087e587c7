//! Key-value persistence for serialised entity lists.
//!
//! Repositories keep their in-memory index as the source of truth and mirror
//! it through an [`ports::EntityStore`] after every mutation. The store only
//! ever sees whole JSON arrays keyed by entity kind.

pub mod adapters;
pub mod ports;

pub use adapters::{InMemoryStore, JsonDirStore};
pub use ports::{EntityStore, StorageError, StorageResult, TASKS_KEY, USERS_KEY};
