//! Task aggregate root.

use super::{
    NewTask, TaskCategory, TaskDomainError, TaskId, TaskPriority, TaskStatus, TaskUpdate,
};
use crate::user::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// A timestamped free-text note attached to a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskNote {
    content: String,
    created_at: DateTime<Utc>,
}

impl TaskNote {
    /// Returns the note text.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns when the note was added.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Task aggregate root.
///
/// The owner is fixed at creation. Overdue and due-soon state are derived
/// from the due date against a caller-supplied instant and never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    id: TaskId,
    title: String,
    description: String,
    owner_id: UserId,
    assignee_id: UserId,
    category: TaskCategory,
    priority: TaskPriority,
    status: TaskStatus,
    due_date: Option<DateTime<Utc>>,
    estimated_hours: f64,
    time_spent: f64,
    tags: Vec<String>,
    notes: Vec<TaskNote>,
    completed_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Task {
    /// Builds a pending task from validated input.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError`] when the title is blank, an enumerated
    /// field is unrecognised, the estimate is negative, or a tag is blank.
    pub fn new(data: NewTask, clock: &impl Clock) -> Result<Self, TaskDomainError> {
        let timestamp = clock.utc();
        let category = data
            .category
            .as_deref()
            .map(TaskCategory::try_from)
            .transpose()?
            .unwrap_or_default();
        let priority = data
            .priority
            .as_deref()
            .map(TaskPriority::try_from)
            .transpose()?
            .unwrap_or_default();
        let estimated_hours = data
            .estimated_hours
            .map(|hours| validate_hours("estimatedHours", hours))
            .transpose()?
            .unwrap_or_default();

        let mut task = Self {
            id: TaskId::new(),
            title: validate_title(&data.title)?,
            description: data.description.trim().to_owned(),
            owner_id: data.owner_id,
            assignee_id: data.assignee_id.unwrap_or(data.owner_id),
            category,
            priority,
            status: TaskStatus::Pending,
            due_date: data.due_date,
            estimated_hours,
            time_spent: 0.0,
            tags: Vec::new(),
            notes: Vec::new(),
            completed_at: None,
            created_at: timestamp,
            updated_at: timestamp,
        };
        for tag in &data.tags {
            task.insert_tag(tag)?;
        }
        Ok(task)
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the user who created the task.
    #[must_use]
    pub const fn owner_id(&self) -> UserId {
        self.owner_id
    }

    /// Returns the user the task is delegated to.
    #[must_use]
    pub const fn assignee_id(&self) -> UserId {
        self.assignee_id
    }

    /// Returns the category.
    #[must_use]
    pub const fn category(&self) -> TaskCategory {
        self.category
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> TaskPriority {
        self.priority
    }

    /// Returns the workflow status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the due date, if any.
    #[must_use]
    pub const fn due_date(&self) -> Option<DateTime<Utc>> {
        self.due_date
    }

    /// Returns the effort estimate in hours.
    #[must_use]
    pub const fn estimated_hours(&self) -> f64 {
        self.estimated_hours
    }

    /// Returns the hours logged so far.
    #[must_use]
    pub const fn time_spent(&self) -> f64 {
        self.time_spent
    }

    /// Returns the tags in insertion order.
    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Returns the notes in the order they were added.
    #[must_use]
    pub fn notes(&self) -> &[TaskNote] {
        &self.notes
    }

    /// Returns when the task was last marked completed.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns whether `user_id` owns the task.
    #[must_use]
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.owner_id == user_id
    }

    /// Returns whether `user_id` owns the task or is assigned to it.
    #[must_use]
    pub fn involves(&self, user_id: UserId) -> bool {
        self.owner_id == user_id || self.assignee_id == user_id
    }

    /// Returns whether the due date has passed while the task is still open.
    #[must_use]
    pub fn is_overdue_at(&self, now: DateTime<Utc>) -> bool {
        !self.status.is_closed() && self.due_date.is_some_and(|due| due < now)
    }

    /// Returns the number of calendar days from `now` until the due date.
    ///
    /// Negative once the due date has passed; `None` without a due date.
    #[must_use]
    pub fn days_until_due_at(&self, now: DateTime<Utc>) -> Option<i64> {
        self.due_date
            .map(|due| (due.date_naive() - now.date_naive()).num_days())
    }

    /// Returns whether the task is due within `days` calendar days of `now`.
    #[must_use]
    pub fn is_due_within(&self, now: DateTime<Utc>, days: u32) -> bool {
        self.days_until_due_at(now)
            .is_some_and(|remaining| (0..=i64::from(days)).contains(&remaining))
    }

    /// Returns whether any tag equals `tag`.
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|existing| existing == tag)
    }

    /// Applies every mutation named by `update`, in a fixed order.
    ///
    /// Stops at the first rejected field; fields before it have already been
    /// applied, so callers wanting atomicity apply to a copy.
    ///
    /// # Errors
    ///
    /// Returns the [`TaskDomainError`] of the first rejected field.
    pub fn apply_update(
        &mut self,
        update: &TaskUpdate,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        if let Some(title) = &update.title {
            self.set_title(title, clock)?;
        }
        if let Some(description) = &update.description {
            self.set_description(description, clock);
        }
        if let Some(category) = &update.category {
            self.set_category(TaskCategory::try_from(category.as_str())?, clock);
        }
        if let Some(priority) = &update.priority {
            self.set_priority(TaskPriority::try_from(priority.as_str())?, clock);
        }
        if let Some(status) = &update.status {
            self.set_status(TaskStatus::try_from(status.as_str())?, clock);
        }
        if let Some(due_date) = update.due_date {
            self.set_due_date(due_date, clock);
        }
        if let Some(assignee_id) = update.assignee_id {
            self.assign_to(assignee_id, clock);
        }
        if let Some(hours) = update.estimated_hours {
            self.set_estimated_hours(hours, clock)?;
        }
        if let Some(hours) = update.add_time_spent {
            self.add_time_spent(hours, clock)?;
        }
        if let Some(tag) = &update.add_tag {
            self.add_tag(tag, clock)?;
        }
        if let Some(tag) = &update.remove_tag {
            self.remove_tag(tag, clock);
        }
        if let Some(note) = &update.add_note {
            self.add_note(note, clock)?;
        }
        Ok(())
    }

    /// Replaces the title.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] for a blank title.
    pub fn set_title(&mut self, title: &str, clock: &impl Clock) -> Result<(), TaskDomainError> {
        self.title = validate_title(title)?;
        self.touch(clock);
        Ok(())
    }

    /// Replaces the description.
    pub fn set_description(&mut self, description: &str, clock: &impl Clock) {
        description.trim().clone_into(&mut self.description);
        self.touch(clock);
    }

    /// Replaces the category.
    pub fn set_category(&mut self, category: TaskCategory, clock: &impl Clock) {
        self.category = category;
        self.touch(clock);
    }

    /// Replaces the priority.
    pub fn set_priority(&mut self, priority: TaskPriority, clock: &impl Clock) {
        self.priority = priority;
        self.touch(clock);
    }

    /// Moves the task to `status`, stamping or clearing the completion time.
    pub fn set_status(&mut self, status: TaskStatus, clock: &impl Clock) {
        let now = clock.utc();
        self.completed_at = match status {
            TaskStatus::Completed if self.status != TaskStatus::Completed => Some(now),
            TaskStatus::Completed => self.completed_at,
            _ => None,
        };
        self.status = status;
        self.updated_at = now;
    }

    /// Replaces or clears the due date.
    pub fn set_due_date(&mut self, due_date: Option<DateTime<Utc>>, clock: &impl Clock) {
        self.due_date = due_date;
        self.touch(clock);
    }

    /// Delegates the task to another user.
    pub fn assign_to(&mut self, assignee_id: UserId, clock: &impl Clock) {
        self.assignee_id = assignee_id;
        self.touch(clock);
    }

    /// Replaces the effort estimate.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidHours`] for negative or non-finite
    /// values.
    pub fn set_estimated_hours(
        &mut self,
        hours: f64,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.estimated_hours = validate_hours("estimatedHours", hours)?;
        self.touch(clock);
        Ok(())
    }

    /// Adds logged hours to the time-spent accumulator.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidHours`] for negative or non-finite
    /// values.
    #[expect(
        clippy::float_arithmetic,
        reason = "time spent is a fractional hour accumulator"
    )]
    pub fn add_time_spent(&mut self, hours: f64, clock: &impl Clock) -> Result<(), TaskDomainError> {
        self.time_spent += validate_hours("addTimeSpent", hours)?;
        self.touch(clock);
        Ok(())
    }

    /// Adds a tag unless it is already present.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTag`] for a blank tag.
    pub fn add_tag(&mut self, tag: &str, clock: &impl Clock) -> Result<(), TaskDomainError> {
        self.insert_tag(tag)?;
        self.touch(clock);
        Ok(())
    }

    /// Removes a tag if present.
    pub fn remove_tag(&mut self, tag: &str, clock: &impl Clock) {
        let trimmed = tag.trim();
        self.tags.retain(|existing| existing != trimmed);
        self.touch(clock);
    }

    /// Appends a note stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyNote`] for a blank note.
    pub fn add_note(&mut self, note: &str, clock: &impl Clock) -> Result<(), TaskDomainError> {
        let content = note.trim();
        if content.is_empty() {
            return Err(TaskDomainError::EmptyNote);
        }
        let now = clock.utc();
        self.notes.push(TaskNote {
            content: content.to_owned(),
            created_at: now,
        });
        self.updated_at = now;
        Ok(())
    }

    fn insert_tag(&mut self, tag: &str) -> Result<(), TaskDomainError> {
        let trimmed = tag.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptyTag);
        }
        if !self.has_tag(trimmed) {
            self.tags.push(trimmed.to_owned());
        }
        Ok(())
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}

fn validate_title(raw: &str) -> Result<String, TaskDomainError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TaskDomainError::EmptyTitle);
    }
    Ok(trimmed.to_owned())
}

fn validate_hours(field: &'static str, hours: f64) -> Result<f64, TaskDomainError> {
    if !hours.is_finite() || hours < 0.0 {
        return Err(TaskDomainError::InvalidHours {
            field,
            value: hours.to_string(),
        });
    }
    Ok(hours)
}
