//! Version flag error types.

/// Version flag errors.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed.
    #[error(transparent)]
    IO(#[from] std::io::Error),

    /// The manifest is not valid Godeps JSON.
    #[error(transparent)]
    Manifest(#[from] serde_json::Error),

    /// `SOURCE_DATE_EPOCH` does not hold a usable Unix timestamp.
    #[error("Invalid SOURCE_DATE_EPOCH value {0:?}")]
    InvalidSourceDateEpoch(String),

    /// `git status` could not be run or exited unsuccessfully.
    #[error("Failed to query working tree state: {0}")]
    GitStatus(String),
}
