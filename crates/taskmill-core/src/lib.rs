//! Domain types for taskmill: the task record and its pluggable strategies.

/// Declarative task filters.
pub mod filter;
/// Single-method strategy traits consumed by the query and pipeline layers.
pub mod functional;
/// Identifier types.
pub mod id;
/// Status and priority enumerations.
pub mod state;
/// Case-insensitive text search over tasks.
pub mod text_matcher;

pub use crate::filter::{TaskFilter, TaskFilterBuilder};
pub use crate::functional::{TaskPredicate, TaskProcessor, TaskTransformer};
pub use crate::id::TaskId;
pub use crate::state::{ParseTokenError, Priority, Status};
pub use crate::text_matcher::TextMatcher;

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;
use time::OffsetDateTime;

/// Reasons a task record is rejected by [`Task::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskValidationError {
    /// Title is empty or whitespace only.
    #[error("task {id} has a blank title")]
    BlankTitle {
        /// Offending task.
        id: TaskId,
    },
    /// Due date precedes the creation timestamp.
    #[error("task {id} is due before it was created")]
    DueBeforeCreated {
        /// Offending task.
        id: TaskId,
    },
}

/// A unit of work tracked by the query and pipeline layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Identifier of the task.
    pub id: TaskId,
    /// Human-readable title.
    pub title: String,
    /// Optional free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Current lifecycle state.
    pub status: Status,
    /// Urgency.
    pub priority: Priority,
    /// Free-form tags.
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// Estimated effort in hours; `None` when not yet estimated.
    #[serde(default)]
    pub estimated_hours: Option<u32>,
    /// Creation timestamp.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// Optional deadline.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub due_date: Option<OffsetDateTime>,
}

impl Task {
    /// Create a `Todo`/`Medium` task stamped with the current time.
    #[must_use]
    pub fn new(id: impl Into<TaskId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            status: Status::Todo,
            priority: Priority::Medium,
            tags: BTreeSet::new(),
            estimated_hours: None,
            created_at: OffsetDateTime::now_utc(),
            due_date: None,
        }
    }

    /// Replace the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Replace the status.
    #[must_use]
    pub const fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    /// Replace the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Add tags to the existing set.
    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Set or clear the estimate.
    #[must_use]
    pub const fn with_estimated_hours(mut self, hours: Option<u32>) -> Self {
        self.estimated_hours = hours;
        self
    }

    /// Override the creation timestamp.
    #[must_use]
    pub const fn with_created_at(mut self, created_at: OffsetDateTime) -> Self {
        self.created_at = created_at;
        self
    }

    /// Set or clear the deadline.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: Option<OffsetDateTime>) -> Self {
        self.due_date = due_date;
        self
    }

    /// Whether the task is past its deadline right now.
    #[must_use]
    pub fn is_overdue(&self) -> bool {
        self.is_overdue_at(OffsetDateTime::now_utc())
    }

    /// Whether the task is past its deadline at `now`.
    ///
    /// Closed tasks are never overdue, nor are tasks without a deadline.
    #[must_use]
    pub fn is_overdue_at(&self, now: OffsetDateTime) -> bool {
        !self.status.is_closed() && self.due_date.is_some_and(|due| due < now)
    }

    /// Check the record's own invariants.
    ///
    /// # Errors
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.title.trim().is_empty() {
            return Err(TaskValidationError::BlankTitle { id: self.id });
        }
        if self.due_date.is_some_and(|due| due < self.created_at) {
            return Err(TaskValidationError::DueBeforeCreated { id: self.id });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Duration;
    use time::macros::datetime;

    #[test]
    fn overdue_requires_open_task_with_past_deadline() {
        let now = datetime!(2025-03-01 12:00 UTC);
        let late = Task::new(1, "late").with_due_date(Some(now - Duration::hours(1)));
        assert!(late.is_overdue_at(now));

        let done = late.clone().with_status(Status::Completed);
        assert!(!done.is_overdue_at(now));

        let cancelled = late.clone().with_status(Status::Cancelled);
        assert!(!cancelled.is_overdue_at(now));

        let undated = Task::new(2, "undated");
        assert!(!undated.is_overdue_at(now));

        let exactly_due = Task::new(3, "boundary").with_due_date(Some(now));
        assert!(!exactly_due.is_overdue_at(now));
    }

    #[test]
    fn validate_rejects_blank_title_and_inverted_dates() {
        let created = datetime!(2025-03-01 00:00 UTC);
        let blank = Task::new(1, "   ").with_created_at(created);
        assert_eq!(
            blank.validate(),
            Err(TaskValidationError::BlankTitle { id: TaskId::new(1) })
        );

        let inverted = Task::new(2, "Ship")
            .with_created_at(created)
            .with_due_date(Some(created - Duration::days(1)));
        assert_eq!(
            inverted.validate(),
            Err(TaskValidationError::DueBeforeCreated { id: TaskId::new(2) })
        );

        let fine = Task::new(3, "Ship")
            .with_created_at(created)
            .with_due_date(Some(created + Duration::days(1)));
        assert_eq!(fine.validate(), Ok(()));
    }

    #[test]
    fn deserializes_with_optional_fields_missing() {
        let json = r#"{
            "id": 9,
            "title": "Write docs",
            "status": "IN_PROGRESS",
            "priority": "HIGH",
            "created_at": "2025-01-01T09:00:00Z"
        }"#;
        let task: Task =
            serde_json::from_str(json).unwrap_or_else(|err| panic!("task must decode: {err}"));
        assert_eq!(task.id, TaskId::new(9));
        assert_eq!(task.status, Status::InProgress);
        assert_eq!(task.priority, Priority::High);
        assert!(task.tags.is_empty());
        assert_eq!(task.estimated_hours, None);
        assert_eq!(task.due_date, None);
    }
}
