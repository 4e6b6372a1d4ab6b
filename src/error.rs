//! Error types for the benchmark harness.
//!
//! Every failure is fatal to the run: transport errors, unexpected HTTP
//! statuses, malformed bodies and invariant violations all propagate to the
//! caller unchanged. Nothing is retried.

use thiserror::Error;

use crate::metrics::OperationKind;

/// Result type alias for harness operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while driving the message store.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Invalid or inconsistent configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Transport-level failure (connect, timeout, broken body stream).
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("{operation} returned HTTP {status}: {body}")]
    Status {
        /// Operation that received the status.
        operation: OperationKind,
        /// Numeric HTTP status.
        status: u16,
        /// Response body, as received.
        body: String,
    },

    /// The response body was not the JSON shape we expected.
    #[error("Malformed response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// A consistency check failed after a scenario.
    #[error("Invariant violated: {0}")]
    Invariant(#[from] InvariantViolation),

    /// A concurrent worker panicked or was cancelled.
    #[error("Worker failed: {0}")]
    Worker(String),

    /// I/O error while reading config or writing the report.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A failed count or content check.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InvariantViolation {
    /// The count after the scenario is not the count before plus the posts.
    #[error("message count is {actual}, expected {initial} + {posted}")]
    CountMismatch {
        /// Count observed before the scenario.
        initial: i64,
        /// Messages posted by the scenario.
        posted: usize,
        /// Count observed after the scenario.
        actual: i64,
    },

    /// A posted text is missing from the read (or appears too few times).
    #[error("text {text:?} found {found} time(s), expected at least {expected}")]
    MissingText {
        /// The posted text.
        text: String,
        /// How many times it was posted in this scenario.
        expected: usize,
        /// How many times it occurs in the read.
        found: usize,
    },
}

impl From<tokio::task::JoinError> for Error {
    fn from(err: tokio::task::JoinError) -> Self {
        Error::Worker(err.to_string())
    }
}
