//! Failures reported by the task controller.

use crate::task::repository::TaskRepositoryError;
use crate::user::repository::UserRepositoryError;
use thiserror::Error;

/// Result type for controller internals.
pub type ControllerResult<T> = Result<T, ControllerError>;

/// Reasons a controller operation fails. The display text is the message
/// placed in [`super::Response::error`].
#[derive(Debug, Clone, Error)]
pub enum ControllerError {
    /// No user is bound to the session.
    #[error("User harus login terlebih dahulu")]
    NotLoggedIn,

    /// The user to bind does not exist.
    #[error("User tidak ditemukan")]
    UserNotFound,

    /// A task was submitted without a title.
    #[error("Judul task wajib diisi")]
    EmptyTitle,

    /// The requested assignee does not exist.
    #[error("User yang ditugaskan tidak ditemukan")]
    AssigneeNotFound,

    /// The task does not exist.
    #[error("Task tidak ditemukan")]
    TaskNotFound,

    /// The current user neither owns nor is assigned to the task.
    #[error("Anda tidak memiliki akses ke task ini")]
    AccessDenied,

    /// Only the owner may update the task.
    #[error("Hanya owner yang bisa mengubah task")]
    OwnerOnlyUpdate,

    /// Only the owner may delete the task.
    #[error("Hanya owner yang bisa menghapus task")]
    OwnerOnlyDelete,

    /// The task repository rejected the operation.
    #[error(transparent)]
    Task(#[from] TaskRepositoryError),

    /// The user repository rejected the operation.
    #[error(transparent)]
    User(#[from] UserRepositoryError),
}
