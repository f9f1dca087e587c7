//! Shared world state for task controller BDD scenarios.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use taskboard::{
    controller::{Response, TaskController},
    storage::InMemoryStore,
    task::{domain::Task, repository::TaskRepository},
    user::{domain::User, repository::UserRepository},
};

/// Controller type used by the BDD world.
pub type TestController = TaskController<InMemoryStore, DefaultClock>;

/// Scenario world for controller behaviour tests.
pub struct ControllerWorld {
    pub controller: TestController,
    pub users: UserRepository<InMemoryStore, DefaultClock>,
    pub last_task: Option<Task>,
    pub last_response: Option<Response<Task>>,
}

impl ControllerWorld {
    /// Creates a world over empty repositories with nobody logged in.
    #[must_use]
    pub fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let clock = Arc::new(DefaultClock);
        let users = UserRepository::load(Arc::clone(&store), Arc::clone(&clock));
        let tasks = TaskRepository::load(store, clock);

        Self {
            controller: TaskController::new(tasks, users.clone()),
            users,
            last_task: None,
            last_response: None,
        }
    }

    /// Looks up a registered user by username.
    pub fn user(&self, username: &str) -> Result<User, eyre::Report> {
        self.users
            .find_by_username(username)?
            .ok_or_else(|| eyre::eyre!("user '{username}' is not registered in scenario"))
    }

    /// Binds `username` as the controller's current user.
    pub fn log_in(&mut self, username: &str) -> Result<(), eyre::Report> {
        let user = self.user(username)?;
        let response = self.controller.set_current_user(user.id());
        if !response.success {
            return Err(eyre::eyre!("login failed: {:?}", response.error));
        }
        Ok(())
    }

    /// Records a task response, remembering the task on success.
    pub fn record(&mut self, response: Response<Task>) {
        if let Some(task) = &response.data {
            self.last_task = Some(task.clone());
        }
        self.last_response = Some(response);
    }
}

impl Default for ControllerWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> ControllerWorld {
    ControllerWorld::default()
}
