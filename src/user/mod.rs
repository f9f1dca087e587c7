//! User accounts and their persistence.
//!
//! - Domain types in [`domain`]
//! - The write-through repository in [`repository`]

pub mod domain;
pub mod repository;
