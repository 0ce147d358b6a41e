//! Error handling for hrdb-store
//!
//! Wraps hrdb-core ExError with store-specific helpers

use hrdb_core::errors::{ExError, ExErrorKind, HrError};

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create a database error from rusqlite::Error
pub fn from_rusqlite(err: rusqlite::Error) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("sqlite")
        .with_message(err.to_string())
}

/// Create the precondition error raised before any SQL when an entity has no id
pub fn missing_id(entity: &'static str, op: &'static str) -> ExError {
    HrError::MissingId { entity, op }.into()
}

/// Create a configuration parse error
pub fn config_error(reason: impl Into<String>) -> ExError {
    ExError::new(ExErrorKind::Config)
        .with_op("config_load")
        .with_message(reason)
}

/// Create an IO error
pub fn io_error(operation: &str, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(operation.to_string())
        .with_message(err.to_string())
}
