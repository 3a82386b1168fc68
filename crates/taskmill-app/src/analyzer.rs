//! Read-only queries and aggregations over a fixed task snapshot.

use std::collections::{BTreeMap, BTreeSet};

use taskmill_core::{Priority, Status, Task, TaskId, TaskPredicate};
use time::OffsetDateTime;
use tracing::{debug, warn};

use crate::config::QueryConfig;

/// Summary returned by [`TaskAnalyzer::summary`] when no task has the requested id.
pub const TASK_NOT_FOUND: &str = "Task not found";

/// Tasks split by overdue-ness. Both groups always exist, possibly empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverduePartition {
    /// Tasks past their deadline.
    pub overdue: Vec<Task>,
    /// Everything else.
    pub on_time: Vec<Task>,
}

impl OverduePartition {
    /// Group keyed by overdue-ness.
    #[must_use]
    pub fn get(&self, overdue: bool) -> &[Task] {
        if overdue { &self.overdue } else { &self.on_time }
    }

    /// Convert into a map that always holds both `true` and `false`.
    #[must_use]
    pub fn into_map(self) -> BTreeMap<bool, Vec<Task>> {
        BTreeMap::from([(true, self.overdue), (false, self.on_time)])
    }
}

/// Query component over a private copy of a task collection.
#[derive(Debug, Clone)]
pub struct TaskAnalyzer {
    tasks: Vec<Task>,
    config: QueryConfig,
}

impl TaskAnalyzer {
    /// Snapshot `tasks` with default query settings.
    #[must_use]
    pub fn new(tasks: &[Task]) -> Self {
        Self::with_config(tasks, QueryConfig::default())
    }

    /// Snapshot `tasks` with explicit query settings.
    ///
    /// The slice is copied; later changes to the caller's collection are not observed.
    #[must_use]
    pub fn with_config(tasks: &[Task], config: QueryConfig) -> Self {
        let analyzer = Self {
            tasks: tasks.to_vec(),
            config,
        };
        let duplicates = analyzer.duplicate_ids();
        if !duplicates.is_empty() {
            warn!(?duplicates, "Snapshot contains duplicate task ids; lookups return the first match");
        }
        debug!(task_count = analyzer.tasks.len(), "Captured task snapshot");
        analyzer
    }

    /// The snapshot in original order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Number of tasks in the snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the snapshot is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Tasks satisfying `predicate`, in snapshot order.
    pub fn filter<P>(&self, predicate: P) -> Vec<Task>
    where
        P: TaskPredicate,
    {
        self.tasks
            .iter()
            .filter(|task| predicate.test(task))
            .cloned()
            .collect()
    }

    /// First task carrying `id`.
    #[must_use]
    pub fn find_by_id(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// The `limit` most urgent tasks; equal priorities keep snapshot order.
    #[must_use]
    pub fn top_priority(&self, limit: usize) -> Vec<Task> {
        let mut ranked: Vec<&Task> = self.tasks.iter().collect();
        // `sort_by` is stable, which is what keeps ties in snapshot order.
        ranked.sort_by(|a, b| b.priority.cmp(&a.priority));
        ranked.into_iter().take(limit).cloned().collect()
    }

    /// [`top_priority`](Self::top_priority) with the configured default limit.
    #[must_use]
    pub fn top_priority_default(&self) -> Vec<Task> {
        self.top_priority(self.config.default_top_limit)
    }

    /// Tasks grouped by status. Statuses without tasks are absent.
    #[must_use]
    pub fn group_by_status(&self) -> BTreeMap<Status, Vec<Task>> {
        let mut groups: BTreeMap<Status, Vec<Task>> = BTreeMap::new();
        for task in &self.tasks {
            groups.entry(task.status).or_default().push(task.clone());
        }
        groups
    }

    /// Split by overdue-ness as of now.
    #[must_use]
    pub fn partition_by_overdue(&self) -> OverduePartition {
        self.partition_by_overdue_at(OffsetDateTime::now_utc())
    }

    /// Split by overdue-ness as of `now`.
    #[must_use]
    pub fn partition_by_overdue_at(&self, now: OffsetDateTime) -> OverduePartition {
        let (overdue, on_time) = self
            .tasks
            .iter()
            .cloned()
            .partition(|task| task.is_overdue_at(now));
        OverduePartition { overdue, on_time }
    }

    /// Every distinct tag.
    #[must_use]
    pub fn unique_tags(&self) -> BTreeSet<String> {
        self.tasks
            .iter()
            .flat_map(|task| task.tags.iter().cloned())
            .collect()
    }

    /// Every tag of every task, duplicates across tasks included, ascending.
    #[must_use]
    pub fn all_tags_sorted(&self) -> Vec<String> {
        let mut tags: Vec<String> = self
            .tasks
            .iter()
            .flat_map(|task| task.tags.iter().cloned())
            .collect();
        tags.sort_unstable();
        tags
    }

    /// Sum of all present estimates; `None` when no task is estimated.
    #[must_use]
    pub fn total_estimated_hours(&self) -> Option<u64> {
        self.estimates().map(u64::from).reduce(|total, hours| total + hours)
    }

    /// Mean of all present estimates; `None` when no task is estimated.
    #[must_use]
    pub fn average_estimated_hours(&self) -> Option<f64> {
        let (total, count) = self
            .estimates()
            .fold((0_u64, 0_u64), |(total, count), hours| (total + u64::from(hours), count + 1));
        mean(total, count)
    }

    /// Every title in snapshot order.
    #[must_use]
    pub fn titles(&self) -> Vec<&str> {
        self.tasks.iter().map(|task| task.title.as_str()).collect()
    }

    /// Number of tasks per priority. Priorities without tasks are absent.
    #[must_use]
    pub fn count_by_priority(&self) -> BTreeMap<Priority, usize> {
        let mut counts = BTreeMap::new();
        for task in &self.tasks {
            *counts.entry(task.priority).or_insert(0) += 1;
        }
        counts
    }

    /// `"<title> - <STATUS>"` for the task with `id`, or [`TASK_NOT_FOUND`].
    #[must_use]
    pub fn summary(&self, id: TaskId) -> String {
        self.find_by_id(id).map_or_else(
            || TASK_NOT_FOUND.to_owned(),
            |task| format!("{} - {}", task.title, task.status),
        )
    }

    /// Whether any task is overdue now.
    #[must_use]
    pub fn has_overdue_tasks(&self) -> bool {
        self.has_overdue_tasks_at(OffsetDateTime::now_utc())
    }

    /// Whether any task is overdue at `now`.
    #[must_use]
    pub fn has_overdue_tasks_at(&self, now: OffsetDateTime) -> bool {
        self.tasks.iter().any(|task| task.is_overdue_at(now))
    }

    /// Whether every task has left `Todo`. True for an empty snapshot.
    #[must_use]
    pub fn all_assigned(&self) -> bool {
        self.tasks.iter().all(|task| task.status != Status::Todo)
    }

    /// Ids that occur more than once, ascending.
    #[must_use]
    pub fn duplicate_ids(&self) -> Vec<TaskId> {
        let mut seen = BTreeSet::new();
        let mut duplicates = BTreeSet::new();
        for task in &self.tasks {
            if !seen.insert(task.id) {
                duplicates.insert(task.id);
            }
        }
        duplicates.into_iter().collect()
    }

    fn estimates(&self) -> impl Iterator<Item = u32> {
        self.tasks.iter().filter_map(|task| task.estimated_hours)
    }
}

#[allow(clippy::cast_precision_loss)]
fn mean(total: u64, count: u64) -> Option<f64> {
    (count > 0).then(|| total as f64 / count as f64)
}
