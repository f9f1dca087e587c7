//! Step definitions for task controller scenarios.

pub mod given;
pub mod then;
pub mod when;
pub mod world;
