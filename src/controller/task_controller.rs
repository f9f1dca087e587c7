//! Task controller with session-bound authorization.

use mockable::Clock;
use tracing::{debug, info};

use super::error::{ControllerError, ControllerResult};
use super::request::{CreateTaskRequest, TaskQuery};
use super::response::Response;
use crate::storage::EntityStore;
use crate::task::domain::{Task, TaskId, TaskUpdate};
use crate::task::query::sort_tasks;
use crate::task::repository::{TaskRepository, TaskRepositoryResult};
use crate::task::stats::TaskStats;
use crate::user::domain::{User, UserId};
use crate::user::repository::UserRepository;

const TASK_CREATED: &str = "Task berhasil dibuat";
const TASK_UPDATED: &str = "Task berhasil diperbarui";
const TASK_DELETED: &str = "Task berhasil dihapus";
const STATUS_TOGGLED: &str = "Status task berhasil diubah";

/// Mediates task operations on behalf of a single logged-in user.
///
/// Owners may do everything with their tasks. Assignees may read a task and
/// toggle its completion but not update or delete it. Listing and
/// statistics via [`TaskController::get_tasks`] and
/// [`TaskController::get_task_stats`] cover owned tasks only, while search,
/// overdue and due-soon listings also include assigned tasks.
pub struct TaskController<S, C>
where
    S: EntityStore,
    C: Clock,
{
    tasks: TaskRepository<S, C>,
    users: UserRepository<S, C>,
    current_user: Option<User>,
}

impl<S, C> TaskController<S, C>
where
    S: EntityStore,
    C: Clock,
{
    /// Creates a controller with no user bound.
    #[must_use]
    pub const fn new(tasks: TaskRepository<S, C>, users: UserRepository<S, C>) -> Self {
        Self {
            tasks,
            users,
            current_user: None,
        }
    }

    /// Returns the user bound to the session, if any.
    #[must_use]
    pub const fn current_user(&self) -> Option<&User> {
        self.current_user.as_ref()
    }

    /// Binds `user_id` as the current user.
    ///
    /// Fails without changing the session when the user does not exist.
    pub fn set_current_user(&mut self, user_id: UserId) -> Response<User> {
        let result = match self.users.find_by_id(user_id) {
            Ok(Some(user)) => {
                info!(user_id = %user.id(), username = user.username(), "session bound");
                self.current_user = Some(user.clone());
                Ok(Response::ok(user))
            }
            Ok(None) => Err(ControllerError::UserNotFound),
            Err(err) => Err(err.into()),
        };
        respond(result)
    }

    /// Clears the current user.
    pub fn logout(&mut self) {
        if let Some(user) = self.current_user.take() {
            info!(user_id = %user.id(), "session cleared");
        }
    }

    /// Creates a task owned by the current user.
    ///
    /// An explicit assignee other than the current user must exist.
    #[must_use]
    pub fn create_task(&self, request: CreateTaskRequest) -> Response<Task> {
        respond(self.try_create_task(request))
    }

    /// Returns a task the current user owns or is assigned to.
    #[must_use]
    pub fn get_task(&self, task_id: TaskId) -> Response<Task> {
        respond(self.visible_task(task_id).map(Response::ok))
    }

    /// Updates a task owned by the current user.
    ///
    /// A changed assignee must exist.
    #[must_use]
    pub fn update_task(&self, task_id: TaskId, update: &TaskUpdate) -> Response<Task> {
        respond(self.try_update_task(task_id, update))
    }

    /// Deletes a task owned by the current user.
    #[must_use]
    pub fn delete_task(&self, task_id: TaskId) -> Response<()> {
        respond(self.try_delete_task(task_id))
    }

    /// Flips a task between `completed` and `pending`.
    ///
    /// Any status other than `completed` is toggled to `completed`.
    #[must_use]
    pub fn toggle_task_status(&self, task_id: TaskId) -> Response<Task> {
        respond(self.try_toggle_task_status(task_id))
    }

    /// Searches tasks the current user owns or is assigned to.
    #[must_use]
    pub fn search_tasks(&self, query: &str) -> Response<Vec<Task>> {
        respond(self.involved_tasks(|tasks| tasks.search(query)))
    }

    /// Lists the current user's own tasks, filtered and sorted.
    #[must_use]
    pub fn get_tasks(&self, query: &TaskQuery) -> Response<Vec<Task>> {
        respond(self.try_get_tasks(query))
    }

    /// Counts the current user's own tasks.
    #[must_use]
    pub fn get_task_stats(&self) -> Response<TaskStats> {
        let result = self
            .require_user()
            .and_then(|user_id| {
                self.tasks
                    .stats(Some(user_id))
                    .map_err(ControllerError::from)
            })
            .map(Response::ok);
        respond(result)
    }

    /// Lists overdue tasks the current user owns or is assigned to.
    #[must_use]
    pub fn get_overdue_tasks(&self) -> Response<Vec<Task>> {
        respond(self.involved_tasks(|tasks| tasks.find_overdue()))
    }

    /// Lists tasks due within `days` that the current user owns or is
    /// assigned to.
    #[must_use]
    pub fn get_tasks_due_soon(&self, days: u32) -> Response<Vec<Task>> {
        respond(self.involved_tasks(|tasks| tasks.find_due_soon(days)))
    }

    fn try_create_task(&self, request: CreateTaskRequest) -> ControllerResult<Response<Task>> {
        let user_id = self.require_user()?;
        if request.title.trim().is_empty() {
            return Err(ControllerError::EmptyTitle);
        }
        if let Some(assignee_id) = request.assignee_id.filter(|id| *id != user_id) {
            self.ensure_assignee_exists(assignee_id)?;
        }
        let task = self.tasks.create(request.into_new_task(user_id))?;
        Ok(Response::ok(task).with_message(TASK_CREATED))
    }

    fn try_update_task(
        &self,
        task_id: TaskId,
        update: &TaskUpdate,
    ) -> ControllerResult<Response<Task>> {
        let user_id = self.require_user()?;
        let task = self.existing_task(task_id)?;
        if !task.is_owned_by(user_id) {
            return Err(denied(ControllerError::OwnerOnlyUpdate, user_id, task_id));
        }
        if let Some(assignee_id) = update.assignee_id.filter(|id| *id != task.assignee_id()) {
            self.ensure_assignee_exists(assignee_id)?;
        }
        let updated = self
            .tasks
            .update(task_id, update)?
            .ok_or(ControllerError::TaskNotFound)?;
        Ok(Response::ok(updated).with_message(TASK_UPDATED))
    }

    fn try_delete_task(&self, task_id: TaskId) -> ControllerResult<Response<()>> {
        let user_id = self.require_user()?;
        let task = self.existing_task(task_id)?;
        if !task.is_owned_by(user_id) {
            return Err(denied(ControllerError::OwnerOnlyDelete, user_id, task_id));
        }
        if !self.tasks.delete(task_id)? {
            return Err(ControllerError::TaskNotFound);
        }
        Ok(Response::done(TASK_DELETED))
    }

    fn try_toggle_task_status(&self, task_id: TaskId) -> ControllerResult<Response<Task>> {
        let task = self.visible_task(task_id)?;
        let next = task.status().toggled();
        let updated = self
            .tasks
            .update(task_id, &TaskUpdate::new().with_status(next.as_str()))?
            .ok_or(ControllerError::TaskNotFound)?;
        Ok(Response::ok(updated).with_message(STATUS_TOGGLED))
    }

    fn try_get_tasks(&self, query: &TaskQuery) -> ControllerResult<Response<Vec<Task>>> {
        let user_id = self.require_user()?;
        let filter = query.filter.clone().owned_by(user_id);
        let tasks = self.tasks.filter(&filter)?;
        Ok(Response::list(sort_tasks(
            tasks,
            query.sort_by,
            query.sort_order,
        )))
    }

    /// Runs a repository listing and keeps tasks involving the current user.
    fn involved_tasks<F>(&self, list: F) -> ControllerResult<Response<Vec<Task>>>
    where
        F: FnOnce(&TaskRepository<S, C>) -> TaskRepositoryResult<Vec<Task>>,
    {
        let user_id = self.require_user()?;
        let tasks = list(&self.tasks)?
            .into_iter()
            .filter(|task| task.involves(user_id))
            .collect();
        Ok(Response::list(tasks))
    }

    fn visible_task(&self, task_id: TaskId) -> ControllerResult<Task> {
        let user_id = self.require_user()?;
        let task = self.existing_task(task_id)?;
        if !task.involves(user_id) {
            return Err(denied(ControllerError::AccessDenied, user_id, task_id));
        }
        Ok(task)
    }

    fn existing_task(&self, task_id: TaskId) -> ControllerResult<Task> {
        self.tasks
            .find_by_id(task_id)?
            .ok_or(ControllerError::TaskNotFound)
    }

    fn ensure_assignee_exists(&self, assignee_id: UserId) -> ControllerResult<()> {
        if self.users.exists(assignee_id)? {
            Ok(())
        } else {
            Err(ControllerError::AssigneeNotFound)
        }
    }

    fn require_user(&self) -> ControllerResult<UserId> {
        self.current_user
            .as_ref()
            .map(User::id)
            .ok_or(ControllerError::NotLoggedIn)
    }
}

fn denied(err: ControllerError, user_id: UserId, task_id: TaskId) -> ControllerError {
    debug!(%user_id, %task_id, reason = %err, "task access denied");
    err
}

fn respond<T>(result: ControllerResult<Response<T>>) -> Response<T> {
    result.unwrap_or_else(|err| Response::failure(err.to_string()))
}
