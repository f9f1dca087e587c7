//! Taskboard: single-user task and account management core.
//!
//! Users and tasks live in in-memory indexes owned by their repositories.
//! Every mutation is written through to a pluggable key-value store, and a
//! session-scoped controller enforces ownership rules on top.
//!
//! # Architecture
//!
//! Taskboard follows hexagonal architecture principles:
//!
//! - **Domain**: entity types and validation with no infrastructure
//!   dependencies
//! - **Ports**: the [`storage::EntityStore`] trait
//! - **Adapters**: in-memory and JSON-directory stores
//!
//! # Modules
//!
//! - [`user`]: user accounts with unique usernames and emails
//! - [`task`]: tasks, filtering, sorting and statistics
//! - [`controller`]: authorization and response shaping for one session
//! - [`storage`]: the persistence port and its adapters
//! - [`config`]: storage selection

pub mod config;
pub mod controller;
pub mod storage;
pub mod task;
pub mod user;

#[cfg(test)]
mod test_support;
