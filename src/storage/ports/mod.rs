//! Port contracts for entity persistence.

mod store;

pub use store::{EntityStore, StorageError, StorageResult, TASKS_KEY, USERS_KEY};

#[cfg(test)]
pub use store::MockEntityStore;
