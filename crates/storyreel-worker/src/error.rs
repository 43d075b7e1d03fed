//! Worker error types.

use std::path::PathBuf;
use thiserror::Error;

pub type WorkerResult<T> = Result<T, WorkerError>;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("expected artifact missing: {0}")]
    MissingArtifact(PathBuf),

    #[error("store error: {0}")]
    Store(#[from] storyreel_store::StoreError),

    #[error("media error: {0}")]
    Media(#[from] storyreel_media::MediaError),

    #[error("service error: {0}")]
    Service(#[from] storyreel_services::ServiceError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl WorkerError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
