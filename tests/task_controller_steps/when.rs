//! When steps for task controller BDD scenarios.

use super::world::ControllerWorld;
use rstest_bdd_macros::when;
use taskboard::{controller::CreateTaskRequest, task::domain::TaskUpdate};

#[when(r#"a task titled "{title}" is created"#)]
fn create_task(world: &mut ControllerWorld, title: String) {
    let response = world.controller.create_task(CreateTaskRequest::new(title));
    world.record(response);
}

#[when(r#"a task titled "{title}" is delegated to "{assignee}""#)]
fn create_delegated_task(
    world: &mut ControllerWorld,
    title: String,
    assignee: String,
) -> Result<(), eyre::Report> {
    let assignee_id = world.user(&assignee)?.id();
    let response = world
        .controller
        .create_task(CreateTaskRequest::new(title).with_assignee(assignee_id));
    world.record(response);
    Ok(())
}

#[when(r#"a task titled "{title}" is created without logging in"#)]
fn create_task_anonymously(world: &mut ControllerWorld, title: String) {
    world.controller.logout();
    let response = world.controller.create_task(CreateTaskRequest::new(title));
    world.record(response);
}

#[when(r#""{username}" logs in"#)]
fn user_logs_in(world: &mut ControllerWorld, username: String) -> Result<(), eyre::Report> {
    world.log_in(&username)
}

#[when("the task status is toggled")]
fn toggle_status(world: &mut ControllerWorld) -> Result<(), eyre::Report> {
    let task_id = world
        .last_task
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing task in scenario world"))?
        .id();
    let response = world.controller.toggle_task_status(task_id);
    world.record(response);
    Ok(())
}

#[when(r#"the task title is changed to "{title}""#)]
fn change_title(world: &mut ControllerWorld, title: String) -> Result<(), eyre::Report> {
    let task_id = world
        .last_task
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing task in scenario world"))?
        .id();
    let response = world
        .controller
        .update_task(task_id, &TaskUpdate::new().with_title(title));
    world.record(response);
    Ok(())
}
