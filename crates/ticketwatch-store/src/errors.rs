//! Error handling for ticketwatch-store
//!
//! Wraps ticketwatch-core ExError with store-specific helpers

use ticketwatch_core::errors::{ExError, ExErrorKind, TrackerError};

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create an IO error
pub fn io_error(operation: &str, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(operation.to_string())
        .with_message(err.to_string())
}

/// Create a serialization error from serde_json::Error
pub fn serialization_error(operation: &str, err: serde_json::Error) -> ExError {
    ExError::new(ExErrorKind::Serialization)
        .with_op(operation.to_string())
        .with_message(err.to_string())
}

/// Create an invalid partition error
pub fn invalid_partition(partition: &str, reason: &str) -> ExError {
    ExError::from(TrackerError::InvalidPartition {
        partition: partition.to_string(),
        reason: reason.to_string(),
    })
    .with_op("open_partition")
}
