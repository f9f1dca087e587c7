//! Task categories.

use super::ParseTaskCategoryError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Area of life or work a task belongs to.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum TaskCategory {
    /// Job-related work.
    Work,
    /// Personal errands.
    #[default]
    Personal,
    /// Learning and coursework.
    Study,
    /// Health and fitness.
    Health,
    /// Money matters.
    Finance,
    /// Anything else.
    Other,
}

impl TaskCategory {
    /// Every category.
    pub const ALL: [Self; 6] = [
        Self::Work,
        Self::Personal,
        Self::Study,
        Self::Health,
        Self::Finance,
        Self::Other,
    ];

    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Work => "work",
            Self::Personal => "personal",
            Self::Study => "study",
            Self::Health => "health",
            Self::Finance => "finance",
            Self::Other => "other",
        }
    }
}

impl TryFrom<&str> for TaskCategory {
    type Error = ParseTaskCategoryError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == normalized)
            .ok_or_else(|| ParseTaskCategoryError(value.to_owned()))
    }
}

impl fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
