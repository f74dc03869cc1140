//! Error type shared by the model, the parser and the store.

/// Failures raised by a single model operation.
///
/// A rejected operation never leaves the target partially updated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TodoError {
    /// A description or tag name was empty
    #[error("description cannot be empty")]
    EmptyDescription,

    /// A required value was absent
    #[error("required argument is missing: {0}")]
    NullArgument(&'static str),

    /// Progress outside 0..=100
    #[error("progress must be between 0 and 100, got {0}")]
    InvalidProgress(i32),

    /// Estimated time below zero
    #[error("estimated time to complete cannot be negative, got {0}")]
    NegativeEstimate(i32),

    /// Priority rank outside 1..=4
    #[error("priority rank must be between 1 and 4, got {0}")]
    InvalidPriority(i32),

    /// The priority iterator has already yielded every child
    #[error("no more todos in this project")]
    Exhausted,

    /// Postponing was requested for a task without a due date
    #[error("task has no due date to postpone")]
    NoDueDate,

    /// A persisted field had the wrong shape
    #[error("malformed field: {0}")]
    Malformed(String),
}

pub type Result<T> = std::result::Result<T, TodoError>;
