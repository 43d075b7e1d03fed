//! Error types for media operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for media operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// Errors that can occur during media processing.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("invalid parameters: {0}")]
    Validation(String),

    #[error("{tool} not found in PATH")]
    ToolNotFound { tool: String },

    #[error("{operation} failed: {stderr}")]
    OperationFailed { operation: String, stderr: String },

    #[error("probe failed: {0}")]
    ProbeFailed(String),

    #[error("operation timed out after {0} seconds")]
    Timeout(u64),

    #[error("file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl MediaError {
    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create an operation failure carrying the tool's diagnostic output.
    pub fn operation_failed(operation: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self::OperationFailed {
            operation: operation.into(),
            stderr: stderr.into(),
        }
    }

    /// Create a probe failure.
    pub fn probe_failed(message: impl Into<String>) -> Self {
        Self::ProbeFailed(message.into())
    }
}
