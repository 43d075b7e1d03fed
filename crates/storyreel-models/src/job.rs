//! Job record and lifecycle state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Maximum title length the title-card template can hold.
pub const MAX_TITLE_LEN: usize = 125;

/// Unique identifier for a job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    /// Generate a new random job ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Pipeline step a job is currently at.
///
/// Variant order is the execution order; the derived `Ord` is what the
/// store uses to reject step regressions.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum JobStep {
    #[default]
    New,
    GeneratingAudio,
    GeneratingSrt,
    GeneratingTitleImage,
    GeneratingBackgroundVideo,
    GeneratingFinalVideo,
}

impl JobStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStep::New => "new",
            JobStep::GeneratingAudio => "generating_audio",
            JobStep::GeneratingSrt => "generating_srt",
            JobStep::GeneratingTitleImage => "generating_title_image",
            JobStep::GeneratingBackgroundVideo => "generating_background_video",
            JobStep::GeneratingFinalVideo => "generating_final_video",
        }
    }
}

impl fmt::Display for JobStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Job processing status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Job is waiting for a worker
    #[default]
    Pending,
    /// Job is being processed
    Processing,
    /// Job completed successfully
    Completed,
    /// Job failed at some step
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }

    /// Check if this is a terminal state (no more updates expected).
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Title longer than the title-card template allows.
#[derive(Debug, Clone, thiserror::Error)]
#[error("title is too long: {0} characters (max {MAX_TITLE_LEN})")]
pub struct TitleTooLong(pub usize);

/// Validate a title against the title-card length limit.
pub fn validate_title(title: &str) -> Result<(), TitleTooLong> {
    let len = title.chars().count();
    if len > MAX_TITLE_LEN {
        return Err(TitleTooLong(len));
    }
    Ok(())
}

/// A persisted video-generation job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRecord {
    /// Unique job ID
    pub id: JobId,

    /// Story title, narrated first and shown on the title card
    pub title: String,

    /// Story body, narrated and subtitled
    pub content: String,

    /// Source background video reference
    pub background_video: String,

    /// Path of the final rendered video (set on completion only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_video_path: Option<String>,

    /// Final artifact size, formatted "X.XX MB" (set on completion only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_display: Option<String>,

    /// Current pipeline step
    #[serde(default)]
    pub step: JobStep,

    /// Processing status
    #[serde(default)]
    pub status: JobStatus,

    /// Step the job failed at (set on failure only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_on_step: Option<JobStep>,

    /// Error message (set on failure only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl JobRecord {
    /// Create a new pending job.
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        background_video: impl Into<String>,
    ) -> Result<Self, TitleTooLong> {
        let title = title.into();
        validate_title(&title)?;
        let now = Utc::now();

        Ok(Self {
            id: JobId::new(),
            title,
            content: content.into(),
            background_video: background_video.into(),
            final_video_path: None,
            size_display: None,
            step: JobStep::New,
            status: JobStatus::Pending,
            failed_on_step: None,
            error_message: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Check if the job is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Move to the given step, flipping pending jobs to processing.
    pub fn advance(&mut self, step: JobStep) {
        self.step = step;
        if self.status == JobStatus::Pending {
            self.status = JobStatus::Processing;
        }
        self.updated_at = Utc::now();
    }

    /// Mark the job completed, recording the final artifact.
    pub fn complete(&mut self, final_video_path: impl Into<String>, size_display: impl Into<String>) {
        self.status = JobStatus::Completed;
        self.final_video_path = Some(final_video_path.into());
        self.size_display = Some(size_display.into());
        self.updated_at = Utc::now();
    }

    /// Mark the job failed at its current step.
    pub fn fail(&mut self, error: impl Into<String>) {
        self.status = JobStatus::Failed;
        self.failed_on_step = Some(self.step);
        self.error_message = Some(error.into());
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_creation() {
        let job = JobRecord::new("A title", "Some content", "bg.mp4").unwrap();
        assert_eq!(job.step, JobStep::New);
        assert_eq!(job.status, JobStatus::Pending);
        assert!(job.final_video_path.is_none());
        assert!(!job.is_terminal());
    }

    #[test]
    fn test_title_length_limit() {
        let long = "x".repeat(MAX_TITLE_LEN + 1);
        assert!(JobRecord::new(long, "content", "bg.mp4").is_err());

        let exact = "x".repeat(MAX_TITLE_LEN);
        assert!(JobRecord::new(exact, "content", "bg.mp4").is_ok());
    }

    #[test]
    fn test_step_ordering_matches_pipeline() {
        assert!(JobStep::New < JobStep::GeneratingAudio);
        assert!(JobStep::GeneratingAudio < JobStep::GeneratingSrt);
        assert!(JobStep::GeneratingSrt < JobStep::GeneratingTitleImage);
        assert!(JobStep::GeneratingTitleImage < JobStep::GeneratingBackgroundVideo);
        assert!(JobStep::GeneratingBackgroundVideo < JobStep::GeneratingFinalVideo);
    }

    #[test]
    fn test_advance_flips_pending_to_processing() {
        let mut job = JobRecord::new("T", "C", "bg.mp4").unwrap();
        job.advance(JobStep::GeneratingAudio);
        assert_eq!(job.status, JobStatus::Processing);
        assert_eq!(job.step, JobStep::GeneratingAudio);

        // Further advances keep the status
        job.advance(JobStep::GeneratingSrt);
        assert_eq!(job.status, JobStatus::Processing);
    }

    #[test]
    fn test_complete_leaves_step_untouched() {
        let mut job = JobRecord::new("T", "C", "bg.mp4").unwrap();
        job.advance(JobStep::GeneratingFinalVideo);
        job.complete("/tmp/final.mp4", "1.00 MB");

        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.step, JobStep::GeneratingFinalVideo);
        assert_eq!(job.final_video_path.as_deref(), Some("/tmp/final.mp4"));
        assert!(job.is_terminal());
    }

    #[test]
    fn test_fail_freezes_step() {
        let mut job = JobRecord::new("T", "C", "bg.mp4").unwrap();
        job.advance(JobStep::GeneratingSrt);
        job.fail("alignment service unavailable");

        assert_eq!(job.status, JobStatus::Failed);
        assert_eq!(job.failed_on_step, Some(JobStep::GeneratingSrt));
        assert_eq!(job.step, JobStep::GeneratingSrt);
        assert!(job.error_message.as_deref().unwrap().contains("alignment"));
        assert!(job.final_video_path.is_none());
    }
}
