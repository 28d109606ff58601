//! Error types for the journal

use thiserror::Error;

/// Main error type for journal operations
///
/// Appending never returns one of these: sink failures are absorbed by the
/// [`SinkWriter`](crate::sink::SinkWriter) and reported through `tracing`.
#[derive(Error, Debug)]
pub enum JournalError {
    /// General I/O error (directory creation, file open, write)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The journal directory could not be resolved
    #[error("Journal directory unavailable: {0}")]
    DirectoryUnavailable(String),

    /// Error during serialization/deserialization of config or entries
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias using JournalError
pub type JournalResult<T> = Result<T, JournalError>;
