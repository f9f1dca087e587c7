//! Session-scoped task controller.
//!
//! The controller binds a current user, checks ownership and assignment
//! rules for every task operation, and reports each outcome as a
//! [`Response`] envelope. It is the only recovery boundary: nothing it calls
//! can make it return an error or panic to its caller.

mod error;
mod request;
mod response;
mod task_controller;

pub use error::ControllerError;
pub use request::{CreateTaskRequest, TaskQuery};
pub use response::Response;
pub use task_controller::TaskController;
