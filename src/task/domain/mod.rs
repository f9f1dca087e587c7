//! Domain model for tasks.
//!
//! Priority, status and category are closed enumerations; each exposes an
//! `ALL` constant that statistics iterate so every value is always reported.

mod category;
mod error;
mod ids;
mod input;
mod priority;
mod status;
mod task;

pub use category::TaskCategory;
pub use error::{
    ParseTaskCategoryError, ParseTaskPriorityError, ParseTaskStatusError, TaskDomainError,
};
pub use ids::TaskId;
pub use input::{NewTask, TaskUpdate};
pub use priority::TaskPriority;
pub use status::TaskStatus;
pub use task::{Task, TaskNote};
