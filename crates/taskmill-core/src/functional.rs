use crate::Task;

/// Boolean test over a single task.
///
/// Implemented for every `Fn(&Task) -> bool`, so closures plug in directly.
pub trait TaskPredicate {
    /// Evaluate the predicate.
    fn test(&self, task: &Task) -> bool;

    /// Both predicates must hold. `other` is skipped when `self` fails.
    fn and<P>(self, other: P) -> impl TaskPredicate
    where
        Self: Sized,
        P: TaskPredicate,
    {
        move |task: &Task| self.test(task) && other.test(task)
    }

    /// Either predicate may hold. `other` is skipped when `self` passes.
    fn or<P>(self, other: P) -> impl TaskPredicate
    where
        Self: Sized,
        P: TaskPredicate,
    {
        move |task: &Task| self.test(task) || other.test(task)
    }

    /// Logical complement.
    fn negate(self) -> impl TaskPredicate
    where
        Self: Sized,
    {
        move |task: &Task| !self.test(task)
    }
}

impl<F> TaskPredicate for F
where
    F: Fn(&Task) -> bool,
{
    fn test(&self, task: &Task) -> bool {
        self(task)
    }
}

/// One-to-one rewrite of a task.
pub trait TaskTransformer {
    /// Produce the rewritten task.
    fn transform(&self, task: Task) -> Task;

    /// Apply `self`, then `next`.
    fn and_then<T>(self, next: T) -> impl TaskTransformer
    where
        Self: Sized,
        T: TaskTransformer,
    {
        move |task: Task| next.transform(self.transform(task))
    }
}

impl<F> TaskTransformer for F
where
    F: Fn(Task) -> Task,
{
    fn transform(&self, task: Task) -> Task {
        self(task)
    }
}

/// Consumer of one contiguous batch of tasks.
pub trait TaskProcessor {
    /// Handle a batch.
    fn process(&mut self, batch: &[Task]);
}

impl<F> TaskProcessor for F
where
    F: FnMut(&[Task]),
{
    fn process(&mut self, batch: &[Task]) {
        self(batch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Priority, Status};

    fn high(task: &Task) -> bool {
        task.priority == Priority::High
    }

    #[test]
    fn predicates_combine() {
        let open_high = high.and(|task: &Task| task.status == Status::Todo);
        let task = Task::new(1, "a").with_priority(Priority::High);
        assert!(open_high.test(&task));
        assert!(!open_high.test(&task.clone().with_status(Status::Completed)));

        let high_or_tagged = high.or(|task: &Task| task.tags.contains("urgent"));
        assert!(high_or_tagged.test(&Task::new(2, "b").with_tags(["urgent"])));
        assert!(!high_or_tagged.test(&Task::new(3, "c")));

        let not_high = high.negate();
        assert!(not_high.test(&Task::new(4, "d")));
    }

    #[test]
    fn and_short_circuits() {
        let calls = std::cell::Cell::new(0);
        let never = |_: &Task| false;
        let counted = |_: &Task| {
            calls.set(calls.get() + 1);
            true
        };
        assert!(!never.and(counted).test(&Task::new(1, "a")));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn transformers_chain_in_order() {
        let rename = |mut task: Task| {
            task.title = format!("{}!", task.title);
            task
        };
        let escalate = |task: Task| task.with_priority(Priority::Critical);
        let chained = rename.and_then(escalate).and_then(rename);
        let out = chained.transform(Task::new(1, "ship"));
        assert_eq!(out.title, "ship!!");
        assert_eq!(out.priority, Priority::Critical);
    }

    #[test]
    fn processors_accept_mutable_closures() {
        let mut seen = Vec::new();
        let mut processor = |batch: &[Task]| seen.push(batch.len());
        processor.process(&[Task::new(1, "a"), Task::new(2, "b")]);
        processor.process(&[]);
        assert_eq!(seen, vec![2, 0]);
    }
}
