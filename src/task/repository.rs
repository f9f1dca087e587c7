//! Write-through repository for tasks.

use mockable::Clock;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use thiserror::Error;
use tracing::{debug, warn};

use crate::storage::{EntityStore, StorageError, TASKS_KEY};
use crate::task::domain::{
    NewTask, Task, TaskCategory, TaskDomainError, TaskId, TaskPriority, TaskStatus, TaskUpdate,
};
use crate::task::query::TaskFilter;
use crate::task::stats::TaskStats;
use crate::user::domain::UserId;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Errors returned by [`TaskRepository`].
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),

    /// The storage port rejected a read or write.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Debug, Default)]
struct TaskIndex {
    tasks: HashMap<TaskId, Task>,
    order: Vec<TaskId>,
}

impl TaskIndex {
    fn from_tasks(tasks: Vec<Task>) -> Self {
        let mut index = Self::default();
        for task in tasks {
            index.insert(task);
        }
        index
    }

    fn insert(&mut self, task: Task) {
        let id = task.id();
        if self.tasks.insert(id, task).is_none() {
            self.order.push(id);
        }
    }

    fn remove(&mut self, id: TaskId) -> bool {
        if self.tasks.remove(&id).is_none() {
            return false;
        }
        self.order.retain(|existing| *existing != id);
        true
    }

    fn iter(&self) -> impl Iterator<Item = &Task> {
        self.order.iter().filter_map(|id| self.tasks.get(id))
    }
}

/// In-memory task index mirrored to an [`EntityStore`] after every mutation.
///
/// Each call holds the index lock for its whole duration, so no caller sees
/// a partially applied update. Owner existence is not checked here.
pub struct TaskRepository<S, C>
where
    S: EntityStore,
    C: Clock,
{
    state: Arc<RwLock<TaskIndex>>,
    store: Arc<S>,
    clock: Arc<C>,
}

impl<S, C> Clone for TaskRepository<S, C>
where
    S: EntityStore,
    C: Clock,
{
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            store: Arc::clone(&self.store),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<S, C> TaskRepository<S, C>
where
    S: EntityStore,
    C: Clock,
{
    /// Hydrates a repository from the tasks saved in `store`.
    ///
    /// Unreadable or malformed stored data is logged and the repository
    /// starts empty.
    #[must_use]
    pub fn load(store: Arc<S>, clock: Arc<C>) -> Self {
        let tasks = match store.load(TASKS_KEY) {
            Ok(Some(value)) => serde_json::from_value::<Vec<Task>>(value).unwrap_or_else(|err| {
                warn!(key = TASKS_KEY, error = %err, "discarding malformed stored tasks");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(err) => {
                warn!(key = TASKS_KEY, error = %err, "failed to load stored tasks");
                Vec::new()
            }
        };
        Self {
            state: Arc::new(RwLock::new(TaskIndex::from_tasks(tasks))),
            store,
            clock,
        }
    }

    /// Returns the current instant according to the injected clock.
    #[must_use]
    pub fn now(&self) -> chrono::DateTime<chrono::Utc> {
        self.clock.utc()
    }

    /// Builds, indexes and stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Domain`] for invalid input or
    /// [`TaskRepositoryError::Storage`] when the write-through fails.
    pub fn create(&self, data: NewTask) -> TaskRepositoryResult<Task> {
        let task = Task::new(data, &*self.clock)?;
        let mut state = self.write()?;
        state.insert(task.clone());
        self.persist(&state)?;
        Ok(task)
    }

    /// Finds a task by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Storage`] when the index lock is
    /// poisoned.
    pub fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        Ok(self.read()?.tasks.get(&id).cloned())
    }

    /// Returns every task in creation order.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Storage`] when the index lock is
    /// poisoned.
    pub fn find_all(&self) -> TaskRepositoryResult<Vec<Task>> {
        self.find_where(|_| true)
    }

    /// Returns tasks created by `owner_id`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Storage`] when the index lock is
    /// poisoned.
    pub fn find_by_owner(&self, owner_id: UserId) -> TaskRepositoryResult<Vec<Task>> {
        self.find_where(|task| task.owner_id() == owner_id)
    }

    /// Returns tasks assigned to `assignee_id`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Storage`] when the index lock is
    /// poisoned.
    pub fn find_by_assignee(&self, assignee_id: UserId) -> TaskRepositoryResult<Vec<Task>> {
        self.find_where(|task| task.assignee_id() == assignee_id)
    }

    /// Returns tasks in `category`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Storage`] when the index lock is
    /// poisoned.
    pub fn find_by_category(&self, category: TaskCategory) -> TaskRepositoryResult<Vec<Task>> {
        self.find_where(|task| task.category() == category)
    }

    /// Returns tasks with `status`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Storage`] when the index lock is
    /// poisoned.
    pub fn find_by_status(&self, status: TaskStatus) -> TaskRepositoryResult<Vec<Task>> {
        self.find_where(|task| task.status() == status)
    }

    /// Returns tasks with `priority`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Storage`] when the index lock is
    /// poisoned.
    pub fn find_by_priority(&self, priority: TaskPriority) -> TaskRepositoryResult<Vec<Task>> {
        self.find_where(|task| task.priority() == priority)
    }

    /// Returns open tasks whose due date has passed.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Storage`] when the index lock is
    /// poisoned.
    pub fn find_overdue(&self) -> TaskRepositoryResult<Vec<Task>> {
        let now = self.now();
        self.find_where(|task| task.is_overdue_at(now))
    }

    /// Returns tasks due between today and `days` days from now, inclusive.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Storage`] when the index lock is
    /// poisoned.
    pub fn find_due_soon(&self, days: u32) -> TaskRepositoryResult<Vec<Task>> {
        let now = self.now();
        self.find_where(|task| task.is_due_within(now, days))
    }

    /// Returns tasks carrying `tag`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Storage`] when the index lock is
    /// poisoned.
    pub fn find_by_tag(&self, tag: &str) -> TaskRepositoryResult<Vec<Task>> {
        self.find_where(|task| task.has_tag(tag))
    }

    /// Case-insensitive substring search over title, description and tags.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Storage`] when the index lock is
    /// poisoned.
    pub fn search(&self, query: &str) -> TaskRepositoryResult<Vec<Task>> {
        let needle = query.to_lowercase();
        self.find_where(|task| {
            task.title().to_lowercase().contains(&needle)
                || task.description().to_lowercase().contains(&needle)
                || task
                    .tags()
                    .iter()
                    .any(|tag| tag.to_lowercase().contains(&needle))
        })
    }

    /// Returns tasks matching every option of `filter`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Storage`] when the index lock is
    /// poisoned.
    pub fn filter(&self, filter: &TaskFilter) -> TaskRepositoryResult<Vec<Task>> {
        let now = self.now();
        self.find_where(|task| filter.matches(task, now))
    }

    /// Counts tasks, scoped to one owner when `owner_id` is given.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Storage`] when the index lock is
    /// poisoned.
    pub fn stats(&self, owner_id: Option<UserId>) -> TaskRepositoryResult<TaskStats> {
        let now = self.now();
        let state = self.read()?;
        let scoped = state
            .iter()
            .filter(|task| owner_id.is_none_or(|id| task.owner_id() == id));
        Ok(TaskStats::collect(scoped, now))
    }

    /// Applies `update` to a task. Returns `Ok(None)` when the task is absent.
    ///
    /// Mutations run against a draft copy; the stored task is replaced only
    /// when every named mutation succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Domain`] for the first rejected field
    /// (leaving the task untouched) or [`TaskRepositoryError::Storage`] when
    /// the write-through fails.
    pub fn update(&self, id: TaskId, update: &TaskUpdate) -> TaskRepositoryResult<Option<Task>> {
        let mut state = self.write()?;
        let Some(current) = state.tasks.get(&id) else {
            return Ok(None);
        };
        let mut draft = current.clone();
        draft.apply_update(update, &*self.clock)?;
        state.insert(draft.clone());
        self.persist(&state)?;
        Ok(Some(draft))
    }

    /// Removes a task. Returns `Ok(false)` when the task is absent.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Storage`] when the write-through fails.
    pub fn delete(&self, id: TaskId) -> TaskRepositoryResult<bool> {
        let mut state = self.write()?;
        if !state.remove(id) {
            return Ok(false);
        }
        self.persist(&state)?;
        Ok(true)
    }

    fn find_where(&self, predicate: impl Fn(&Task) -> bool) -> TaskRepositoryResult<Vec<Task>> {
        Ok(self
            .read()?
            .iter()
            .filter(|task| predicate(task))
            .cloned()
            .collect())
    }

    fn persist(&self, state: &TaskIndex) -> TaskRepositoryResult<()> {
        let tasks: Vec<&Task> = state.iter().collect();
        let value: Value = serde_json::to_value(&tasks)
            .map_err(|err| StorageError::serialization(TASKS_KEY, err))?;
        self.store.save(TASKS_KEY, value)?;
        debug!(key = TASKS_KEY, count = tasks.len(), "persisted tasks");
        Ok(())
    }

    fn read(&self) -> TaskRepositoryResult<RwLockReadGuard<'_, TaskIndex>> {
        self.state
            .read()
            .map_err(|err| StorageError::poisoned(err).into())
    }

    fn write(&self) -> TaskRepositoryResult<RwLockWriteGuard<'_, TaskIndex>> {
        self.state
            .write()
            .map_err(|err| StorageError::poisoned(err).into())
    }
}
