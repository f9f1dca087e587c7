//! Aggregate task statistics.

use crate::task::domain::{Task, TaskCategory, TaskPriority, TaskStatus};
use crate::task::query::DEFAULT_DUE_SOON_DAYS;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Counts over a set of tasks.
///
/// The per-status, per-priority and per-category maps always hold every
/// enumerated value, with zero for values no task uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    /// Number of tasks counted.
    pub total: usize,
    /// Count per status.
    pub by_status: BTreeMap<TaskStatus, usize>,
    /// Count per priority.
    pub by_priority: BTreeMap<TaskPriority, usize>,
    /// Count per category.
    pub by_category: BTreeMap<TaskCategory, usize>,
    /// Open tasks whose due date has passed.
    pub overdue: usize,
    /// Tasks due within [`DEFAULT_DUE_SOON_DAYS`].
    pub due_soon: usize,
    /// Completed tasks.
    pub completed: usize,
}

impl TaskStats {
    /// Counts `tasks` as of `now`.
    #[must_use]
    pub fn collect<'a>(tasks: impl IntoIterator<Item = &'a Task>, now: DateTime<Utc>) -> Self {
        let mut stats = Self {
            total: 0,
            by_status: TaskStatus::ALL.into_iter().map(|status| (status, 0)).collect(),
            by_priority: TaskPriority::ALL
                .into_iter()
                .map(|priority| (priority, 0))
                .collect(),
            by_category: TaskCategory::ALL
                .into_iter()
                .map(|category| (category, 0))
                .collect(),
            overdue: 0,
            due_soon: 0,
            completed: 0,
        };
        for task in tasks {
            stats.total += 1;
            *stats.by_status.entry(task.status()).or_default() += 1;
            *stats.by_priority.entry(task.priority()).or_default() += 1;
            *stats.by_category.entry(task.category()).or_default() += 1;
            if task.is_overdue_at(now) {
                stats.overdue += 1;
            }
            if task.is_due_within(now, DEFAULT_DUE_SOON_DAYS) {
                stats.due_soon += 1;
            }
            if task.status() == TaskStatus::Completed {
                stats.completed += 1;
            }
        }
        stats
    }

    /// Returns the count for one status.
    #[must_use]
    pub fn status_count(&self, status: TaskStatus) -> usize {
        self.by_status.get(&status).copied().unwrap_or_default()
    }

    /// Returns the count for one priority.
    #[must_use]
    pub fn priority_count(&self, priority: TaskPriority) -> usize {
        self.by_priority.get(&priority).copied().unwrap_or_default()
    }

    /// Returns the count for one category.
    #[must_use]
    pub fn category_count(&self, category: TaskCategory) -> usize {
        self.by_category.get(&category).copied().unwrap_or_default()
    }
}
