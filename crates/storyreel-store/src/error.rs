//! Error types for the job store.

use storyreel_models::{JobId, JobStatus, JobStep, TitleTooLong};
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors from job-store transactions.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("job not found: {0}")]
    NotFound(JobId),

    #[error("job {id} is already {status}")]
    Terminal { id: JobId, status: JobStatus },

    #[error("step cannot move from {current} back to {requested}")]
    StepRegression { current: JobStep, requested: JobStep },

    #[error(transparent)]
    InvalidTitle(#[from] TitleTooLong),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot corrupt: {0}")]
    Json(#[from] serde_json::Error),
}
