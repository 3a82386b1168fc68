//! Error types for pipeline operations.

use thiserror::Error;

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Errors raised by the pipeline engine itself, never by caller-supplied functions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    /// Batch size must be at least one.
    #[error("batch size must be positive, got {0}")]
    InvalidBatchSize(usize),
}
