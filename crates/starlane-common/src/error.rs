//! Error types for Starlane.

use thiserror::Error;

/// Top-level error type for Starlane persistence and host operations.
#[derive(Debug, Error)]
pub enum StarlaneError {
    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Data does not start with the expected magic bytes
    #[error("Invalid snapshot format")]
    InvalidFormat,

    /// Snapshot data could not be decoded
    #[error("Snapshot corrupted: {0}")]
    Corrupted(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Schema version mismatch
    #[error("Schema version mismatch: expected {expected}, got {actual}")]
    VersionMismatch {
        /// Expected version
        expected: String,
        /// Actual version found
        actual: String,
    },
}

/// Result type alias for Starlane operations.
pub type StarlaneResult<T> = Result<T, StarlaneError>;
