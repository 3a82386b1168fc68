use std::collections::BTreeSet;

use time::OffsetDateTime;

use crate::{Priority, Status, Task, TaskPredicate, TextMatcher};

/// Declarative conjunction of task criteria.
///
/// Empty criteria match every task. Statuses and priorities are OR-ed within
/// their own set; every listed tag must be present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Accepted statuses.
    pub statuses: BTreeSet<Status>,
    /// Accepted priorities.
    pub priorities: BTreeSet<Priority>,
    /// Tags that must all be present.
    pub tags: BTreeSet<String>,
    /// Case-insensitive search text.
    pub text: Option<TextMatcher>,
    /// Required overdue-ness.
    pub overdue: Option<bool>,
    /// Instant used for the overdue check; the current time when unset.
    pub as_of: Option<OffsetDateTime>,
}

impl TaskFilter {
    /// Start building a filter.
    #[must_use]
    pub fn builder() -> TaskFilterBuilder {
        TaskFilterBuilder::default()
    }

    /// Whether the filter places no restriction at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
            && self.priorities.is_empty()
            && self.tags.is_empty()
            && self.text.is_none()
            && self.overdue.is_none()
    }

    /// Evaluate every criterion against `task`.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        if !self.statuses.is_empty() && !self.statuses.contains(&task.status) {
            return false;
        }
        if !self.priorities.is_empty() && !self.priorities.contains(&task.priority) {
            return false;
        }
        if !self.tags.is_subset(&task.tags) {
            return false;
        }
        if let Some(matcher) = &self.text
            && !matcher.matches(task)
        {
            return false;
        }
        if let Some(expected) = self.overdue {
            let now = self.as_of.unwrap_or_else(OffsetDateTime::now_utc);
            if task.is_overdue_at(now) != expected {
                return false;
            }
        }
        true
    }
}

impl TaskPredicate for TaskFilter {
    fn test(&self, task: &Task) -> bool {
        self.matches(task)
    }
}

/// Builder for [`TaskFilter`] over already typed values.
#[derive(Debug, Clone, Default)]
pub struct TaskFilterBuilder {
    filter: TaskFilter,
}

impl TaskFilterBuilder {
    /// Accept any of these statuses.
    #[must_use]
    pub fn statuses<I>(mut self, statuses: I) -> Self
    where
        I: IntoIterator<Item = Status>,
    {
        self.filter.statuses.extend(statuses);
        self
    }

    /// Accept any of these priorities.
    #[must_use]
    pub fn priorities<I>(mut self, priorities: I) -> Self
    where
        I: IntoIterator<Item = Priority>,
    {
        self.filter.priorities.extend(priorities);
        self
    }

    /// Require every one of these tags.
    #[must_use]
    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filter.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Require the search text; blank input clears it.
    #[must_use]
    pub fn text(mut self, query: &str) -> Self {
        self.filter.text = TextMatcher::new(query);
        self
    }

    /// Require the given overdue-ness.
    #[must_use]
    pub const fn overdue(mut self, overdue: bool) -> Self {
        self.filter.overdue = Some(overdue);
        self
    }

    /// Evaluate overdue-ness at a fixed instant.
    #[must_use]
    pub const fn as_of(mut self, now: OffsetDateTime) -> Self {
        self.filter.as_of = Some(now);
        self
    }

    /// Finish the filter.
    #[must_use]
    pub fn build(self) -> TaskFilter {
        self.filter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Duration;
    use time::macros::datetime;

    #[test]
    fn empty_filter_matches_everything() {
        let filter = TaskFilter::default();
        assert!(filter.is_empty());
        assert!(filter.matches(&Task::new(1, "anything")));
    }

    #[test]
    fn criteria_are_combined() {
        let now = datetime!(2025-06-01 00:00 UTC);
        let filter = TaskFilter::builder()
            .statuses([Status::Todo, Status::InProgress])
            .priorities([Priority::High])
            .tags(["backend"])
            .text("cache")
            .overdue(true)
            .as_of(now)
            .build();
        assert!(!filter.is_empty());

        let hit = Task::new(1, "Cache warmup")
            .with_status(Status::InProgress)
            .with_priority(Priority::High)
            .with_tags(["backend", "perf"])
            .with_due_date(Some(now - Duration::days(1)));
        assert!(filter.matches(&hit));

        assert!(!filter.matches(&hit.clone().with_status(Status::Completed)));
        assert!(!filter.matches(&hit.clone().with_priority(Priority::Low)));
        assert!(!filter.matches(&hit.clone().with_due_date(None)));

        let mut untagged = hit.clone();
        untagged.tags.remove("backend");
        assert!(!filter.matches(&untagged));

        let mut renamed = hit;
        renamed.title = "Warmup".into();
        assert!(!filter.matches(&renamed));
    }

    #[test]
    fn blank_text_clears_search() {
        let filter = TaskFilter::builder().text("  ").build();
        assert!(filter.text.is_none());
        assert!(filter.is_empty());
    }
}
