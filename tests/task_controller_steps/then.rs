//! Then steps for task controller BDD scenarios.

use super::world::ControllerWorld;
use rstest_bdd_macros::then;
use taskboard::{controller::Response, task::domain::{Task, TaskStatus}};

fn last_response(world: &ControllerWorld) -> Result<&Response<Task>, eyre::Report> {
    world
        .last_response
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing controller response"))
}

#[then("the response succeeds")]
fn response_succeeds(world: &ControllerWorld) -> Result<(), eyre::Report> {
    let response = last_response(world)?;
    if !response.success {
        return Err(eyre::eyre!("expected success, got {:?}", response.error));
    }
    Ok(())
}

#[then(r#"the response fails with "{message}""#)]
fn response_fails_with(world: &ControllerWorld, message: String) -> Result<(), eyre::Report> {
    let response = last_response(world)?;
    if response.success || response.error_message() != Some(message.as_str()) {
        return Err(eyre::eyre!(
            "expected failure '{message}', got success={} error={:?}",
            response.success,
            response.error
        ));
    }
    Ok(())
}

#[then(r#"the task status is "{status}""#)]
fn task_status_is(world: &ControllerWorld, status: String) -> Result<(), eyre::Report> {
    let expected = TaskStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let task = world
        .last_task
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing task in scenario world"))?;

    if task.status() != expected {
        return Err(eyre::eyre!(
            "expected status {}, found {}",
            expected.as_str(),
            task.status().as_str()
        ));
    }
    Ok(())
}
