//! Query and pipeline layer for taskmill.
//!
//! [`TaskAnalyzer`] answers read-only questions about a copied task snapshot.
//! [`TaskProcessingEngine`] composes caller-supplied stages, batches, merges and
//! sort criteria without holding task state of its own.

pub mod analyzer;
pub mod config;
pub mod engine;
pub mod error;
pub mod sort;

// Re-exports for convenience
pub use analyzer::{OverduePartition, TASK_NOT_FOUND, TaskAnalyzer};
pub use config::{PipelineConfig, ProjectConfig, QueryConfig};
pub use engine::{Pipeline, Stage, TaskProcessingEngine};
pub use error::PipelineError;
pub use sort::{Comparator, SortDirection, SortKey, SortSpec, SortSpecError, parse_sort_specs};
pub use taskmill_core::{Priority, Status, Task, TaskFilter, TaskFilterBuilder, TaskId};
