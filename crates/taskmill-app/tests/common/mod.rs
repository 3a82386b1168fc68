#![allow(dead_code)]

use proptest::prelude::*;
use taskmill_app::{Priority, Status, Task};
use time::macros::datetime;
use time::{Duration, OffsetDateTime};
use tracing_subscriber::EnvFilter;

pub const NOW: OffsetDateTime = datetime!(2025-05-01 12:00 UTC);

/// Install a compact subscriber honoring `RUST_LOG`; repeated calls are no-ops.
pub fn install_tracing() {
    let filter = EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_test_writer()
        .compact()
        .try_init();
}

pub fn status_strategy() -> impl Strategy<Value = Status> {
    prop_oneof![
        Just(Status::Todo),
        Just(Status::InProgress),
        Just(Status::Completed),
        Just(Status::Cancelled),
    ]
}

pub fn priority_strategy() -> impl Strategy<Value = Priority> {
    prop_oneof![
        Just(Priority::Low),
        Just(Priority::Medium),
        Just(Priority::High),
        Just(Priority::Critical),
    ]
}

pub fn task_strategy() -> impl Strategy<Value = Task> {
    (
        0_u64..24,
        prop::sample::select(vec!["Deploy", "Review", "Fix", "Plan"]),
        status_strategy(),
        priority_strategy(),
        prop::collection::btree_set(prop::sample::select(vec!["api", "ui", "db", "ops"]), 0..3),
        prop::option::of(0_u32..40),
        prop::option::of(-10_i64..10),
    )
        .prop_map(|(id, title, status, priority, tags, hours, due_in)| {
            Task::new(id, title)
                .with_status(status)
                .with_priority(priority)
                .with_tags(tags)
                .with_estimated_hours(hours)
                .with_created_at(NOW - Duration::days(30))
                .with_due_date(due_in.map(|days| NOW + Duration::days(days)))
        })
}

pub fn tasks_strategy() -> impl Strategy<Value = Vec<Task>> {
    prop::collection::vec(task_strategy(), 0..32)
}

pub fn ids(tasks: &[Task]) -> Vec<u64> {
    tasks.iter().map(|task| task.id.get()).collect()
}

/// Multiset comparison on full task values.
pub fn same_multiset(left: &[Task], right: &[Task]) -> bool {
    let mut a: Vec<String> = left.iter().map(|task| format!("{task:?}")).collect();
    let mut b: Vec<String> = right.iter().map(|task| format!("{task:?}")).collect();
    a.sort();
    b.sort();
    a == b
}
