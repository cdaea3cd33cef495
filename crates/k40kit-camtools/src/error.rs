//! Error types for the CAM tools crate.
//!
//! Operation generation itself never fails; these cover the spooler and
//! conversions of user input into operation types.

use thiserror::Error;

/// Errors that can occur while managing laser operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OperationError {
    /// An operation type name was not recognised.
    #[error("Unknown operation type: {0}")]
    UnknownType(String),

    /// No job exists at the requested queue position.
    #[error("No job at queue position {index} (queue holds {len})")]
    JobNotFound { index: usize, len: usize },

    /// The spooler queue has no job to run.
    #[error("Spooler queue is empty")]
    EmptyQueue,
}

/// Result type for operation and spooler calls.
pub type OperationResult<T> = Result<T, OperationError>;
