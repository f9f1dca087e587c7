//! Behaviour tests for task controller authorization.

#[path = "task_controller_steps/mod.rs"]
mod task_controller_steps_defs;

use rstest_bdd_macros::scenario;
use task_controller_steps_defs::world::{ControllerWorld, world};

#[scenario(
    path = "tests/features/task_controller.feature",
    name = "Toggling a task twice returns it to pending"
)]
fn toggle_twice_returns_to_pending(world: ControllerWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/task_controller.feature",
    name = "Task operations require a logged-in user"
)]
fn operations_require_login(world: ControllerWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/task_controller.feature",
    name = "The assignee cannot update a delegated task"
)]
fn assignee_cannot_update(world: ControllerWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/task_controller.feature",
    name = "The assignee can complete a delegated task"
)]
fn assignee_can_complete(world: ControllerWorld) {
    let _ = world;
}
