//! Error types for task domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing or mutating tasks.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The priority value is not one of the supported priorities.
    #[error("invalid task priority '{0}', expected one of low, medium, high, urgent")]
    InvalidPriority(String),

    /// The status value is not one of the supported statuses.
    #[error(
        "invalid task status '{0}', expected one of pending, in-progress, blocked, completed, cancelled"
    )]
    InvalidStatus(String),

    /// The category value is not one of the supported categories.
    #[error(
        "invalid task category '{0}', expected one of work, personal, study, health, finance, other"
    )]
    InvalidCategory(String),

    /// An hour quantity is negative or not finite.
    #[error("invalid {field} '{value}', expected a non-negative number of hours")]
    InvalidHours {
        /// Name of the rejected field.
        field: &'static str,
        /// Rejected value, formatted for display.
        value: String,
    },

    /// A tag is empty after trimming.
    #[error("task tag must not be empty")]
    EmptyTag,

    /// A note is empty after trimming.
    #[error("task note must not be empty")]
    EmptyNote,
}

/// Error returned while parsing a task priority.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task priority: {0}")]
pub struct ParseTaskPriorityError(pub String);

/// Error returned while parsing a task status.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

/// Error returned while parsing a task category.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task category: {0}")]
pub struct ParseTaskCategoryError(pub String);

impl From<ParseTaskPriorityError> for TaskDomainError {
    fn from(err: ParseTaskPriorityError) -> Self {
        Self::InvalidPriority(err.0)
    }
}

impl From<ParseTaskStatusError> for TaskDomainError {
    fn from(err: ParseTaskStatusError) -> Self {
        Self::InvalidStatus(err.0)
    }
}

impl From<ParseTaskCategoryError> for TaskDomainError {
    fn from(err: ParseTaskCategoryError) -> Self {
        Self::InvalidCategory(err.0)
    }
}
