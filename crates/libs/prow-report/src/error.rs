//! Report error types.

/// Report errors.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed.
    #[error(transparent)]
    IO(#[from] std::io::Error),

    /// JSON serialization/deserialization failed.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Unknown test status keyword.
    #[error("Invalid test status {0}")]
    InvalidStatus(String),

    /// A JUnit document could not be read back.
    #[error("Malformed JUnit document: {0}")]
    MalformedJunit(String),
}
