//! Stateless transformation pipeline over task collections.
//!
//! Every operation receives its tasks and strategies as arguments and returns a
//! fresh result. The engine only carries immutable defaults from
//! [`PipelineConfig`].

use std::cmp::Ordering;
use std::fmt;

use taskmill_core::{Task, TaskPredicate, TaskProcessor, TaskTransformer};
use tracing::debug;

use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::sort::{self, SortSpec};

/// A boxed pipeline stage.
pub type Stage = Box<dyn Fn(Vec<Task>) -> Vec<Task>>;

/// Ordered list of stages that can be stored, extended and rerun.
#[derive(Default)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    /// Pipeline without stages; running it returns its input.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a stage.
    #[must_use]
    pub fn stage<F>(mut self, stage: F) -> Self
    where
        F: Fn(Vec<Task>) -> Vec<Task> + 'static,
    {
        self.stages.push(Box::new(stage));
        self
    }

    /// Append every stage of `next` after the stages of `self`.
    #[must_use]
    pub fn then(mut self, next: Self) -> Self {
        self.stages.extend(next.stages);
        self
    }

    /// Number of stages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Whether the pipeline is the identity.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Feed `tasks` through every stage in order.
    #[must_use]
    pub fn run(&self, tasks: Vec<Task>) -> Vec<Task> {
        fold_stages(tasks, &self.stages)
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("stages", &self.stages.len())
            .finish()
    }
}

/// Pipeline/transformation component.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskProcessingEngine {
    config: PipelineConfig,
}

#[allow(clippy::unused_self)]
impl TaskProcessingEngine {
    /// Engine with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine with explicit settings.
    #[must_use]
    pub const fn with_config(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Active settings.
    #[must_use]
    pub const fn config(&self) -> PipelineConfig {
        self.config
    }

    /// Run `stages` left to right, each receiving the previous stage's full output.
    ///
    /// No stages means `tasks` comes back unchanged.
    pub fn run_pipeline<S>(&self, tasks: Vec<Task>, stages: &[S]) -> Vec<Task>
    where
        S: Fn(Vec<Task>) -> Vec<Task>,
    {
        fold_stages(tasks, stages)
    }

    /// Like [`run_pipeline`](Self::run_pipeline) with fallible stages.
    ///
    /// # Errors
    /// Returns the first stage error unchanged; later stages do not run.
    pub fn try_run_pipeline<S, E>(&self, tasks: Vec<Task>, stages: &[S]) -> std::result::Result<Vec<Task>, E>
    where
        S: Fn(Vec<Task>) -> std::result::Result<Vec<Task>, E>,
    {
        stages
            .iter()
            .enumerate()
            .try_fold(tasks, |current, (index, stage)| {
                debug!(stage = index, input = current.len(), "Running fallible pipeline stage");
                stage(current)
            })
    }

    /// Return `task` when present, otherwise the supplier's value.
    ///
    /// The supplier is not called when a task is present.
    pub fn or_else_create<F>(&self, task: Option<Task>, supplier: F) -> Task
    where
        F: FnOnce() -> Task,
    {
        task.unwrap_or_else(supplier)
    }

    /// Call `effect` on every task in order.
    pub fn for_each_with_effect<F>(&self, tasks: &[Task], effect: F)
    where
        F: FnMut(&Task),
    {
        tasks.iter().for_each(effect);
    }

    /// Combine two tasks with `merger`.
    pub fn merge<F>(&self, first: Task, second: Task, merger: F) -> Task
    where
        F: FnOnce(Task, Task) -> Task,
    {
        merger(first, second)
    }

    /// Transform every task, keeping order and count.
    pub fn map_all<T>(&self, tasks: &[Task], transformer: T) -> Vec<Task>
    where
        T: TaskTransformer,
    {
        tasks
            .iter()
            .cloned()
            .map(|task| transformer.transform(task))
            .collect()
    }

    /// Keep tasks passing `predicate`, then transform only those.
    pub fn filter_then_map<P, T>(&self, tasks: &[Task], predicate: P, transformer: T) -> Vec<Task>
    where
        P: TaskPredicate,
        T: TaskTransformer,
    {
        tasks
            .iter()
            .filter(|task| predicate.test(task))
            .cloned()
            .map(|task| transformer.transform(task))
            .collect()
    }

    /// Hand contiguous batches of at most `batch_size` tasks to `processor`, in order.
    ///
    /// # Errors
    /// [`PipelineError::InvalidBatchSize`] when `batch_size` is zero; no batch is processed then.
    pub fn batch_process<P>(&self, tasks: &[Task], batch_size: usize, mut processor: P) -> Result<()>
    where
        P: TaskProcessor,
    {
        let batches = batches(tasks, batch_size)?;
        debug!(tasks = tasks.len(), batch_size, "Dispatching batches");
        for (index, batch) in batches.enumerate() {
            debug!(batch = index, size = batch.len(), "Processing batch");
            processor.process(batch);
        }
        Ok(())
    }

    /// [`batch_process`](Self::batch_process) with the configured batch size.
    ///
    /// # Errors
    /// Only when the configured batch size is zero.
    pub fn batch_process_default<P>(&self, tasks: &[Task], processor: P) -> Result<()>
    where
        P: TaskProcessor,
    {
        self.batch_process(tasks, self.config.default_batch_size, processor)
    }

    /// Batch processing with a fallible processor.
    ///
    /// # Errors
    /// An invalid batch size converted into `E`, or the first processor error unchanged.
    pub fn try_batch_process<F, E>(
        &self,
        tasks: &[Task],
        batch_size: usize,
        mut processor: F,
    ) -> std::result::Result<(), E>
    where
        F: FnMut(&[Task]) -> std::result::Result<(), E>,
        E: From<PipelineError>,
    {
        for (index, batch) in batches(tasks, batch_size)?.enumerate() {
            debug!(batch = index, size = batch.len(), "Processing fallible batch");
            processor(batch)?;
        }
        Ok(())
    }

    /// Title of the first task holding the highest priority.
    #[must_use]
    pub fn highest_priority_title<'a>(&self, tasks: &'a [Task]) -> Option<&'a str> {
        tasks
            .iter()
            .reduce(|best, task| if task.priority > best.priority { task } else { best })
            .map(|task| task.title.as_str())
    }

    /// Endless lazy sequence calling `supplier` once per pulled element.
    pub fn generate<F>(&self, supplier: F) -> impl Iterator<Item = Task> + use<F>
    where
        F: FnMut() -> Task,
    {
        std::iter::repeat_with(supplier)
    }

    /// Stable sort by `comparators` composed left to right.
    ///
    /// The first comparator is the primary key. An empty list keeps the input order.
    pub fn sort_by_criteria<C>(&self, tasks: &[Task], comparators: &[C]) -> Vec<Task>
    where
        C: Fn(&Task, &Task) -> Ordering,
    {
        let mut sorted = tasks.to_vec();
        if comparators.is_empty() {
            return sorted;
        }
        debug!(tasks = sorted.len(), criteria = comparators.len(), "Sorting tasks");
        sorted.sort_by(|a, b| sort::compose(comparators, a, b));
        sorted
    }

    /// Stable sort by declarative criteria.
    #[must_use]
    pub fn sort_by_specs(&self, tasks: &[Task], specs: &[SortSpec]) -> Vec<Task> {
        let comparators: Vec<_> = specs
            .iter()
            .map(|spec| move |a: &Task, b: &Task| spec.compare(a, b))
            .collect();
        self.sort_by_criteria(tasks, &comparators)
    }
}

fn fold_stages<S>(tasks: Vec<Task>, stages: &[S]) -> Vec<Task>
where
    S: Fn(Vec<Task>) -> Vec<Task>,
{
    stages
        .iter()
        .enumerate()
        .fold(tasks, |current, (index, stage)| {
            debug!(stage = index, input = current.len(), "Running pipeline stage");
            stage(current)
        })
}

fn batches(tasks: &[Task], batch_size: usize) -> Result<std::slice::Chunks<'_, Task>> {
    if batch_size == 0 {
        return Err(PipelineError::InvalidBatchSize(batch_size));
    }
    Ok(tasks.chunks(batch_size))
}
