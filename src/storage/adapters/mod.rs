//! Storage adapter implementations.

mod json_dir;
mod memory;

pub use json_dir::JsonDirStore;
pub use memory::InMemoryStore;
