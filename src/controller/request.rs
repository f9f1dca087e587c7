//! Request payloads accepted by the task controller.

use crate::task::domain::NewTask;
use crate::task::query::{SortKey, SortOrder, TaskFilter};
use crate::user::domain::UserId;
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Request to create a task owned by the current user.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateTaskRequest {
    /// Task title; must not be blank.
    pub title: String,
    /// Free-text description.
    pub description: String,
    /// Delegate; defaults to the current user.
    pub assignee_id: Option<UserId>,
    /// Category name.
    pub category: Option<String>,
    /// Priority name.
    pub priority: Option<String>,
    /// Due date.
    pub due_date: Option<DateTime<Utc>>,
    /// Effort estimate in hours.
    pub estimated_hours: Option<f64>,
    /// Initial tags.
    pub tags: Vec<String>,
}

impl CreateTaskRequest {
    /// Creates a request with a title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Delegates the task to another user.
    #[must_use]
    pub const fn with_assignee(mut self, assignee_id: UserId) -> Self {
        self.assignee_id = Some(assignee_id);
        self
    }

    /// Sets the category by name.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Sets the priority by name.
    #[must_use]
    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    /// Sets the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Sets the estimated effort in hours.
    #[must_use]
    pub const fn with_estimated_hours(mut self, hours: f64) -> Self {
        self.estimated_hours = Some(hours);
        self
    }

    /// Sets the initial tags.
    #[must_use]
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = String>) -> Self {
        self.tags = tags.into_iter().collect();
        self
    }

    /// Converts the request into a domain payload owned by `owner_id`.
    pub(crate) fn into_new_task(self, owner_id: UserId) -> NewTask {
        let Self {
            title,
            description,
            assignee_id,
            category,
            priority,
            due_date,
            estimated_hours,
            tags,
        } = self;

        let mut task = NewTask::new(title, owner_id)
            .with_description(description)
            .with_assignee(assignee_id.unwrap_or(owner_id))
            .with_tags(tags);
        task.category = category;
        task.priority = priority;
        task.due_date = due_date;
        task.estimated_hours = estimated_hours;
        task
    }
}

/// Filter and ordering options for listing the current user's tasks.
///
/// Any owner given in the filter is replaced by the current user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskQuery {
    /// Conjunctive filter options.
    #[serde(flatten)]
    pub filter: TaskFilter,
    /// Field to order by.
    pub sort_by: SortKey,
    /// Ordering direction.
    pub sort_order: SortOrder,
}

impl TaskQuery {
    /// Creates a query with default ordering (newest first).
    #[must_use]
    pub fn new(filter: TaskFilter) -> Self {
        Self {
            filter,
            ..Self::default()
        }
    }

    /// Sets the ordering.
    #[must_use]
    pub const fn sorted_by(mut self, sort_by: SortKey, sort_order: SortOrder) -> Self {
        self.sort_by = sort_by;
        self.sort_order = sort_order;
        self
    }
}
