//! Persisted job store.
//!
//! Jobs live in one JSON snapshot file. Every mutation is an atomic
//! read-modify-write under a single lock, persisted by writing a temp
//! file and renaming it over the snapshot, so a crash never leaves a
//! half-written store behind.

pub mod error;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, info};

use storyreel_models::{JobId, JobRecord, JobStep};

pub use error::{StoreError, StoreResult};

/// Format a byte count as the user-facing "X.XX MB" size string.
pub fn format_size_mb(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / (1024.0 * 1024.0))
}

/// Job store backed by a JSON snapshot file.
pub struct JobStore {
    path: PathBuf,
    jobs: Mutex<HashMap<String, JobRecord>>,
}

impl JobStore {
    /// Open a store, loading the snapshot if one exists.
    pub async fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();

        let jobs = match tokio::fs::read(&path).await {
            Ok(bytes) => {
                let records: Vec<JobRecord> = serde_json::from_slice(&bytes)?;
                info!("Loaded {} jobs from {}", records.len(), path.display());
                records
                    .into_iter()
                    .map(|j| (j.id.as_str().to_string(), j))
                    .collect()
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path,
            jobs: Mutex::new(jobs),
        })
    }

    /// Create a new pending job.
    pub async fn create_job(
        &self,
        title: impl Into<String>,
        content: impl Into<String>,
        background_video: impl Into<String>,
    ) -> StoreResult<JobRecord> {
        let job = JobRecord::new(title, content, background_video)?;

        let mut jobs = self.jobs.lock().await;
        jobs.insert(job.id.as_str().to_string(), job.clone());
        self.persist(&jobs).await?;

        info!(job_id = %job.id, "Created job");
        Ok(job)
    }

    /// Fetch a job snapshot.
    pub async fn get_job(&self, id: &JobId) -> StoreResult<JobRecord> {
        let jobs = self.jobs.lock().await;
        jobs.get(id.as_str())
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    /// Move a job to its next pipeline step.
    ///
    /// The first advance flips a pending job to processing. Terminal jobs
    /// and step regressions are rejected.
    pub async fn advance_step(&self, id: &JobId, next: JobStep) -> StoreResult<JobRecord> {
        let mut jobs = self.jobs.lock().await;
        let job = jobs
            .get_mut(id.as_str())
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;

        if job.is_terminal() {
            return Err(StoreError::Terminal {
                id: id.clone(),
                status: job.status,
            });
        }
        if next <= job.step {
            return Err(StoreError::StepRegression {
                current: job.step,
                requested: next,
            });
        }

        job.advance(next);
        let updated = job.clone();
        self.persist(&jobs).await?;

        debug!(job_id = %id, step = %next, "Advanced job");
        Ok(updated)
    }

    /// Mark a job completed, recording the final artifact path and its
    /// on-disk size.
    pub async fn complete_job(&self, id: &JobId, final_video: &Path) -> StoreResult<JobRecord> {
        let size = tokio::fs::metadata(final_video).await?.len();

        let mut jobs = self.jobs.lock().await;
        let job = jobs
            .get_mut(id.as_str())
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;

        if job.is_terminal() {
            return Err(StoreError::Terminal {
                id: id.clone(),
                status: job.status,
            });
        }

        job.complete(final_video.to_string_lossy(), format_size_mb(size));
        let updated = job.clone();
        self.persist(&jobs).await?;

        info!(job_id = %id, "Job completed");
        Ok(updated)
    }

    /// Mark a job failed at its current step.
    pub async fn fail_job(&self, id: &JobId, message: impl Into<String>) -> StoreResult<JobRecord> {
        let mut jobs = self.jobs.lock().await;
        let job = jobs
            .get_mut(id.as_str())
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;

        if job.is_terminal() {
            return Err(StoreError::Terminal {
                id: id.clone(),
                status: job.status,
            });
        }

        job.fail(message);
        let updated = job.clone();
        self.persist(&jobs).await?;

        info!(job_id = %id, step = %updated.step, "Job failed");
        Ok(updated)
    }

    /// Snapshot of all jobs, most recent first.
    pub async fn list_jobs(&self) -> Vec<JobRecord> {
        let jobs = self.jobs.lock().await;
        let mut all: Vec<JobRecord> = jobs.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        all
    }

    /// Write the snapshot atomically (temp file + rename).
    async fn persist(&self, jobs: &HashMap<String, JobRecord>) -> StoreResult<()> {
        let records: Vec<&JobRecord> = jobs.values().collect();
        let bytes = serde_json::to_vec_pretty(&records)?;

        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, &bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storyreel_models::JobStatus;

    async fn store_in(dir: &tempfile::TempDir) -> JobStore {
        JobStore::open(dir.path().join("jobs.json")).await.unwrap()
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir).await;

        let job = store.create_job("T", "C", "bg.mp4").await.unwrap();
        let fetched = store.get_job(&job.id).await.unwrap();

        assert_eq!(fetched.title, "T");
        assert_eq!(fetched.step, JobStep::New);
        assert_eq!(fetched.status, JobStatus::Pending);
    }

    #[tokio::test]
    async fn test_unknown_job_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir).await;

        let id = JobId::new();
        assert!(matches!(
            store.get_job(&id).await,
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(
            store.advance_step(&id, JobStep::GeneratingAudio).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_first_advance_starts_processing() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir).await;

        let job = store.create_job("T", "C", "bg.mp4").await.unwrap();
        let updated = store
            .advance_step(&job.id, JobStep::GeneratingAudio)
            .await
            .unwrap();

        assert_eq!(updated.status, JobStatus::Processing);
        assert_eq!(updated.step, JobStep::GeneratingAudio);
    }

    #[tokio::test]
    async fn test_step_never_regresses() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir).await;

        let job = store.create_job("T", "C", "bg.mp4").await.unwrap();
        store
            .advance_step(&job.id, JobStep::GeneratingSrt)
            .await
            .unwrap();

        let err = store
            .advance_step(&job.id, JobStep::GeneratingAudio)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::StepRegression { .. }));

        // Same step is a regression too
        let err = store
            .advance_step(&job.id, JobStep::GeneratingSrt)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::StepRegression { .. }));
    }

    #[tokio::test]
    async fn test_complete_records_size_display() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir).await;

        let artifact = dir.path().join("final.mp4");
        std::fs::write(&artifact, vec![0u8; 1024 * 1024]).unwrap();

        let job = store.create_job("T", "C", "bg.mp4").await.unwrap();
        store
            .advance_step(&job.id, JobStep::GeneratingFinalVideo)
            .await
            .unwrap();
        let done = store.complete_job(&job.id, &artifact).await.unwrap();

        assert_eq!(done.status, JobStatus::Completed);
        assert_eq!(done.step, JobStep::GeneratingFinalVideo);
        assert_eq!(done.size_display.as_deref(), Some("1.00 MB"));
        assert!(done
            .final_video_path
            .as_deref()
            .unwrap()
            .ends_with("final.mp4"));
    }

    #[tokio::test]
    async fn test_terminal_jobs_reject_mutation() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir).await;

        let job = store.create_job("T", "C", "bg.mp4").await.unwrap();
        store
            .advance_step(&job.id, JobStep::GeneratingAudio)
            .await
            .unwrap();
        store.fail_job(&job.id, "tts unavailable").await.unwrap();

        assert!(matches!(
            store.advance_step(&job.id, JobStep::GeneratingSrt).await,
            Err(StoreError::Terminal { .. })
        ));
        assert!(matches!(
            store.fail_job(&job.id, "again").await,
            Err(StoreError::Terminal { .. })
        ));

        let failed = store.get_job(&job.id).await.unwrap();
        assert_eq!(failed.failed_on_step, Some(JobStep::GeneratingAudio));
        assert!(failed.final_video_path.is_none());
    }

    #[tokio::test]
    async fn test_snapshot_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jobs.json");

        let id = {
            let store = JobStore::open(&path).await.unwrap();
            let job = store.create_job("T", "C", "bg.mp4").await.unwrap();
            store
                .advance_step(&job.id, JobStep::GeneratingAudio)
                .await
                .unwrap();
            job.id
        };

        let reopened = JobStore::open(&path).await.unwrap();
        let job = reopened.get_job(&id).await.unwrap();
        assert_eq!(job.step, JobStep::GeneratingAudio);
        assert_eq!(job.status, JobStatus::Processing);
    }

    #[tokio::test]
    async fn test_list_jobs_most_recent_first() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir).await;

        let first = store.create_job("first", "C", "bg.mp4").await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = store.create_job("second", "C", "bg.mp4").await.unwrap();

        let all = store.list_jobs().await;
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, second.id);
        assert_eq!(all[1].id, first.id);
    }

    #[test]
    fn test_format_size_mb() {
        assert_eq!(format_size_mb(1024 * 1024), "1.00 MB");
        assert_eq!(format_size_mb(1024 * 1024 * 5 / 2), "2.50 MB");
        assert_eq!(format_size_mb(0), "0.00 MB");
    }
}
