//! Common types and utilities.

/// Tool error type.
pub use crate::error::Error;

/// Tool result type.
pub type Result<T> = core::result::Result<T, Error>;
