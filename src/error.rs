//! Error types for surreal-sql.

use std::time::Duration;

use thiserror::Error;

/// Opaque error produced by a [`Transport`](crate::transport::Transport).
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The main error type for driver operations.
#[derive(Debug, Error)]
pub enum SurrealError {
    /// The transport collaborator failed to deliver the call.
    #[error("Transport error: {0}")]
    Transport(#[source] BoxError),

    /// The transport call did not finish within the configured timeout.
    #[error("Transport call timed out after {0:?}")]
    Timeout(Duration),

    /// The response envelope did not have the expected shape.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// The store answered with status `ERR`.
    #[error("Query error: {detail}")]
    Query { detail: String },

    /// The store answered with a status outside `OK`/`ERR`.
    #[error("Unknown response status: {status}")]
    UnknownStatus { status: String },

    /// A wire value could not be converted into the requested type.
    #[error("Decode error: expected {expected}, got {got}")]
    Decode { expected: &'static str, got: String },

    /// A Rust value has no exact wire representation.
    #[error("Encode error: {0}")]
    Encode(String),

    /// A requested column is absent from the row.
    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    /// Scan was called without a current row.
    #[error("No current row; call next() before scanning")]
    NoRow,

    /// The store has no equivalent for the requested operation.
    #[error("Unsupported operation: {0}")]
    Unsupported(&'static str),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SurrealError {
    /// Create a decode error.
    pub fn decode(expected: &'static str, got: impl Into<String>) -> Self {
        Self::Decode {
            expected,
            got: got.into(),
        }
    }

    /// Create a malformed response error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse(message.into())
    }
}

/// Result type alias for driver operations.
pub type SurrealResult<T> = Result<T, SurrealError>;
