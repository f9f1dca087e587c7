//! Error types for user domain validation.

use thiserror::Error;

/// Errors returned while constructing or mutating users.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserDomainError {
    /// The username is empty after trimming.
    #[error("username must not be empty")]
    EmptyUsername,

    /// The username contains whitespace.
    #[error("invalid username '{0}', whitespace is not allowed")]
    InvalidUsername(String),

    /// The email address is not of the form `local@domain`.
    #[error("invalid email address '{0}'")]
    InvalidEmail(String),
}
