//! Input payloads for creating and updating tasks.

use crate::user::domain::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

/// Input payload for creating a task.
///
/// Enumerated fields are carried as strings and validated when the task is
/// built, so malformed caller input surfaces as a [`super::TaskDomainError`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) owner_id: UserId,
    pub(crate) assignee_id: Option<UserId>,
    pub(crate) category: Option<String>,
    pub(crate) priority: Option<String>,
    pub(crate) due_date: Option<DateTime<Utc>>,
    pub(crate) estimated_hours: Option<f64>,
    pub(crate) tags: Vec<String>,
}

impl NewTask {
    /// Creates a payload with the required fields.
    #[must_use]
    pub fn new(title: impl Into<String>, owner_id: UserId) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            owner_id,
            assignee_id: None,
            category: None,
            priority: None,
            due_date: None,
            estimated_hours: None,
            tags: Vec::new(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Delegates the task. Defaults to the owner.
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

    /// Returns the owner the task will be created for.
    #[must_use]
    pub const fn owner_id(&self) -> UserId {
        self.owner_id
    }
}

/// Partial update for a task.
///
/// Each present field maps to one named mutation, applied in declaration
/// order. Unknown keys in a JSON payload are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskUpdate {
    /// Replacement title.
    pub title: Option<String>,
    /// Replacement description.
    pub description: Option<String>,
    /// Replacement category name.
    pub category: Option<String>,
    /// Replacement priority name.
    pub priority: Option<String>,
    /// Replacement status name.
    pub status: Option<String>,
    /// Replacement due date; `Some(None)` clears it.
    ///
    /// An explicit JSON `null` deserialises to `Some(None)`, while an absent
    /// key stays `None`.
    #[expect(
        clippy::option_option,
        reason = "absent and explicit null are distinct update intents"
    )]
    #[serde(default, deserialize_with = "present_or_null")]
    pub due_date: Option<Option<DateTime<Utc>>>,
    /// Replacement assignee.
    pub assignee_id: Option<UserId>,
    /// Replacement effort estimate in hours.
    pub estimated_hours: Option<f64>,
    /// Hours to add to the time-spent accumulator.
    pub add_time_spent: Option<f64>,
    /// Tag to add.
    pub add_tag: Option<String>,
    /// Tag to remove.
    pub remove_tag: Option<String>,
    /// Note to append.
    pub add_note: Option<String>,
}

impl TaskUpdate {
    /// Creates an empty update.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a replacement title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets a replacement description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets a replacement category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Sets a replacement priority.
    #[must_use]
    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    /// Sets a replacement status.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Sets a replacement due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(Some(due_date));
        self
    }

    /// Clears the due date.
    #[must_use]
    pub const fn without_due_date(mut self) -> Self {
        self.due_date = Some(None);
        self
    }

    /// Reassigns the task.
    #[must_use]
    pub const fn with_assignee(mut self, assignee_id: UserId) -> Self {
        self.assignee_id = Some(assignee_id);
        self
    }

    /// Sets a replacement effort estimate.
    #[must_use]
    pub const fn with_estimated_hours(mut self, hours: f64) -> Self {
        self.estimated_hours = Some(hours);
        self
    }

    /// Adds hours to the time spent so far.
    #[must_use]
    pub const fn with_time_spent(mut self, hours: f64) -> Self {
        self.add_time_spent = Some(hours);
        self
    }

    /// Adds a tag.
    #[must_use]
    pub fn with_added_tag(mut self, tag: impl Into<String>) -> Self {
        self.add_tag = Some(tag.into());
        self
    }

    /// Removes a tag.
    #[must_use]
    pub fn with_removed_tag(mut self, tag: impl Into<String>) -> Self {
        self.remove_tag = Some(tag.into());
        self
    }

    /// Appends a note.
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.add_note = Some(note.into());
        self
    }
}

/// Distinguishes a key set to `null` from a missing key.
#[expect(
    clippy::option_option,
    reason = "absent and explicit null are distinct update intents"
)]
fn present_or_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
