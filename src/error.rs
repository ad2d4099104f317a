//! Error types.
//!
//! Every fallible public operation returns [`EvoResult`]. Problems report
//! evaluation failures through [`ProblemError`]; the evaluator wraps them
//! into [`EvoError::Evaluation`] together with the offending index.

use thiserror::Error;

/// Failure reported by a [`Problem`](crate::solution::Problem) while
/// evaluating a single solution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ProblemError {
    message: String,
}

impl ProblemError {
    /// Creates an error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The message supplied by the problem.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors produced by this crate.
#[derive(Debug, Error)]
pub enum EvoError {
    /// A population, front or point set that must be non-empty was empty.
    #[error("{what} must not be empty")]
    Empty {
        /// What was empty.
        what: &'static str,
    },

    /// Vectors that must share a length did not.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Length implied by the first vector, the problem or the reference.
        expected: usize,
        /// Offending length.
        found: usize,
    },

    /// A coordinate was NaN or infinite where a finite value is required.
    #[error("non-finite value in {what}")]
    NonFinite {
        /// Where the value was found.
        what: &'static str,
    },

    /// Fewer solutions were available than a strategy needs.
    #[error("{what} needs {requested} solutions but only {available} are available")]
    InsufficientPopulation {
        /// Which strategy ran short.
        what: &'static str,
        /// Solutions requested.
        requested: usize,
        /// Solutions available.
        available: usize,
    },

    /// A configuration or operator parameter is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The problem failed to evaluate a solution.
    #[error("evaluation of solution {index} failed: {source}")]
    Evaluation {
        /// Position of the failing solution in the evaluated batch.
        index: usize,
        /// Error returned by the problem.
        #[source]
        source: ProblemError,
    },

    /// The evaluation worker pool could not be created.
    #[error("failed to build worker pool: {0}")]
    WorkerPool(String),

    /// Writing results failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type EvoResult<T> = Result<T, EvoError>;
