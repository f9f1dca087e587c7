//! Task management: domain model, querying, statistics and persistence.
//!
//! - Domain types in [`domain`]
//! - Filtering and ordering in [`query`]
//! - Aggregate counts in [`stats`]
//! - The write-through repository in [`repository`]

pub mod domain;
pub mod query;
pub mod repository;
pub mod stats;

#[cfg(test)]
mod tests;
