//! Common types and utilities.

/// Version flag error type.
pub use crate::error::Error;

/// Version flag result type.
pub type Result<T> = core::result::Result<T, Error>;
