//! Error types for external service collaborators.

use thiserror::Error;

/// Result type for service calls.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors from the TTS / classification / alignment / image services.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("service returned HTTP {status}: {detail}")]
    Http { status: u16, detail: String },

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("invalid input: {0}")]
    Validation(String),

    #[error("unexpected service response: {0}")]
    InvalidResponse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("media error: {0}")]
    Media(#[from] storyreel_media::MediaError),
}

impl ServiceError {
    /// Create an HTTP failure carrying the response detail.
    pub fn http(status: u16, detail: impl Into<String>) -> Self {
        Self::Http {
            status,
            detail: detail.into(),
        }
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create an invalid-response error.
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse(message.into())
    }
}
