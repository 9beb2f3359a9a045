//! Error types for the `nourai-eval` crate.

use thiserror::Error;

/// Errors that can occur while loading cases or writing reports.
#[derive(Debug, Error)]
pub enum EvalError {
    /// A test-case or report file could not be read or written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A test-case file or report could not be (de)serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A convenience result type for evaluation operations.
pub type Result<T> = std::result::Result<T, EvalError>;
