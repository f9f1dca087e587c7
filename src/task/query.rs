//! Task filtering and ordering.

use crate::task::domain::{Task, TaskCategory, TaskPriority, TaskStatus};
use crate::user::domain::UserId;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::cmp::Ordering;

/// Window, in calendar days, used wherever "due soon" is not parameterised.
pub const DEFAULT_DUE_SOON_DAYS: u32 = 3;

/// Conjunctive task filter. Unset options impose no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskFilter {
    /// Only tasks created by this user.
    pub owner_id: Option<UserId>,
    /// Only tasks assigned to this user.
    pub assignee_id: Option<UserId>,
    /// Only tasks in this category.
    pub category: Option<TaskCategory>,
    /// Only tasks with this status.
    pub status: Option<TaskStatus>,
    /// Only tasks with this priority.
    pub priority: Option<TaskPriority>,
    /// Only overdue tasks.
    pub overdue: bool,
    /// Only tasks due within [`DEFAULT_DUE_SOON_DAYS`].
    pub due_soon: bool,
    /// Only tasks carrying at least one of these tags.
    pub tags: Vec<String>,
}

impl TaskFilter {
    /// Creates a filter matching every task.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts to tasks owned by `owner_id`.
    #[must_use]
    pub const fn owned_by(mut self, owner_id: UserId) -> Self {
        self.owner_id = Some(owner_id);
        self
    }

    /// Restricts to tasks assigned to `assignee_id`.
    #[must_use]
    pub const fn assigned_to(mut self, assignee_id: UserId) -> Self {
        self.assignee_id = Some(assignee_id);
        self
    }

    /// Restricts to one category.
    #[must_use]
    pub const fn with_category(mut self, category: TaskCategory) -> Self {
        self.category = Some(category);
        self
    }

    /// Restricts to one status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Restricts to one priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Restricts to overdue tasks.
    #[must_use]
    pub const fn overdue_only(mut self) -> Self {
        self.overdue = true;
        self
    }

    /// Restricts to tasks due soon.
    #[must_use]
    pub const fn due_soon_only(mut self) -> Self {
        self.due_soon = true;
        self
    }

    /// Restricts to tasks carrying any of `tags`.
    #[must_use]
    pub fn with_any_tag(mut self, tags: impl IntoIterator<Item = String>) -> Self {
        self.tags = tags.into_iter().collect();
        self
    }

    /// Returns whether `task` satisfies every configured option.
    #[must_use]
    pub fn matches(&self, task: &Task, now: DateTime<Utc>) -> bool {
        self.owner_id.is_none_or(|id| task.owner_id() == id)
            && self.assignee_id.is_none_or(|id| task.assignee_id() == id)
            && self.category.is_none_or(|category| task.category() == category)
            && self.status.is_none_or(|status| task.status() == status)
            && self.priority.is_none_or(|priority| task.priority() == priority)
            && (!self.overdue || task.is_overdue_at(now))
            && (!self.due_soon || task.is_due_within(now, DEFAULT_DUE_SOON_DAYS))
            && (self.tags.is_empty() || self.tags.iter().any(|tag| task.has_tag(tag)))
    }
}

/// Field used to order tasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    /// Case-insensitive title.
    Title,
    /// Priority rank, `low` lowest.
    Priority,
    /// Due date; tasks without one sort as if due in the far future.
    DueDate,
    /// Creation time.
    #[default]
    CreatedAt,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Smallest first.
    Asc,
    /// Largest first.
    #[default]
    Desc,
}

/// Returns `tasks` ordered by `key` in `order`.
///
/// The sort is stable: tasks with equal keys keep their relative order in
/// both directions.
#[must_use]
pub fn sort_tasks(mut tasks: Vec<Task>, key: SortKey, order: SortOrder) -> Vec<Task> {
    tasks.sort_by(|left, right| {
        let ordering = compare_by(left, right, key);
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
    tasks
}

fn compare_by(left: &Task, right: &Task, key: SortKey) -> Ordering {
    match key {
        SortKey::Title => left.title().to_lowercase().cmp(&right.title().to_lowercase()),
        SortKey::Priority => left.priority().rank().cmp(&right.priority().rank()),
        SortKey::DueDate => due_key(left).cmp(&due_key(right)),
        SortKey::CreatedAt => left.created_at().cmp(&right.created_at()),
    }
}

fn due_key(task: &Task) -> (bool, Option<DateTime<Utc>>) {
    (task.due_date().is_none(), task.due_date())
}
