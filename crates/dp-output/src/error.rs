//! Error types for dp-output.

use dp_core::AgentId;
use thiserror::Error;

/// Errors that can occur when writing or reading the transition log.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("line {line}: philosopher {id} is not seated at a table of {size}")]
    UnknownAgent {
        line: usize,
        id:   AgentId,
        size: usize,
    },
}

/// Alias for `Result<T, OutputError>`.
pub type OutputResult<T> = Result<T, OutputError>;
