//! The five-stage video generation pipeline.
//!
//! One worker drives one job start to finish; stages never overlap and a
//! failed stage aborts the rest. Every stage records itself in the job
//! store before running, so the persisted record always shows where a
//! job is (or where it died).

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

use storyreel_media::{BufferPosition, ClipSampler, MediaEngine, StreamKind};
use storyreel_models::{group_words, normalize_transcript, render_srt, JobId, JobStep};
use storyreel_services::{AlignmentProvider, GenderClassifier, TitleRenderer, TtsProvider};
use storyreel_store::{JobStore, StoreError};

use crate::artifacts::JobArtifacts;
use crate::error::{WorkerError, WorkerResult};

/// Silence appended to each narration clip, in seconds.
const TRAILING_SILENCE_SECS: f64 = 1.0;

/// Length of the chunk sampled from the background source. The chunk is
/// looped afterwards, so it only needs to be long enough to loop cleanly.
const BACKGROUND_CHUNK_SECS: f64 = 60.0;

/// Everything the dispatcher hands a worker for one job.
#[derive(Debug, Clone)]
pub struct PipelineRequest {
    pub job_id: JobId,
    pub title: String,
    pub content: String,
    pub background_video: PathBuf,
    pub work_dir: PathBuf,
}

/// Audio timings computed by the narration stage and consumed later.
#[derive(Debug, Clone, Copy)]
struct NarrationTimings {
    /// Title narration length before padding; the title card stays
    /// visible for exactly this long.
    raw_title_secs: f64,
    /// Padded title narration length; subtitles shift by this much.
    title_secs: f64,
}

/// Sequential orchestrator for one job's pipeline.
pub struct Pipeline {
    store: Arc<JobStore>,
    engine: MediaEngine,
    sampler: ClipSampler,
    tts: Arc<dyn TtsProvider>,
    classifier: Arc<dyn GenderClassifier>,
    aligner: Arc<dyn AlignmentProvider>,
    renderer: Arc<dyn TitleRenderer>,
}

impl Pipeline {
    pub fn new(
        store: Arc<JobStore>,
        engine: MediaEngine,
        tts: Arc<dyn TtsProvider>,
        classifier: Arc<dyn GenderClassifier>,
        aligner: Arc<dyn AlignmentProvider>,
        renderer: Arc<dyn TitleRenderer>,
    ) -> Self {
        let sampler = ClipSampler::new(engine.clone());
        Self {
            store,
            engine,
            sampler,
            tts,
            classifier,
            aligner,
            renderer,
        }
    }

    /// Run the full pipeline for one job.
    ///
    /// Re-running a completed or failed job is rejected before any state
    /// mutation. Any stage error is recorded on the job and re-raised so
    /// the dispatcher sees it too.
    pub async fn run(&self, request: PipelineRequest) -> WorkerResult<()> {
        let job = self.store.get_job(&request.job_id).await?;
        if job.is_terminal() {
            return Err(StoreError::Terminal {
                id: request.job_id,
                status: job.status,
            }
            .into());
        }

        info!(job_id = %request.job_id, "Starting video generation");
        tokio::fs::create_dir_all(&request.work_dir).await?;
        let artifacts = JobArtifacts::new(&request.work_dir);

        match self.execute(&request, &artifacts).await {
            Ok(()) => {
                info!(job_id = %request.job_id, "Video generation finished");
                Ok(())
            }
            Err(e) => {
                error!(job_id = %request.job_id, "Video generation failed: {e}");
                if let Err(store_err) = self.store.fail_job(&request.job_id, e.to_string()).await {
                    warn!(job_id = %request.job_id, "Could not record job failure: {store_err}");
                }
                Err(e)
            }
        }
    }

    async fn execute(&self, request: &PipelineRequest, artifacts: &JobArtifacts) -> WorkerResult<()> {
        let timings = self.generate_audio(request, artifacts).await?;
        self.generate_subtitles(request, artifacts).await?;
        self.generate_title_image(request, artifacts).await?;
        self.generate_background_video(request, artifacts, timings)
            .await?;
        self.generate_final_video(request, artifacts, timings).await?;

        self.store
            .complete_job(&request.job_id, &artifacts.final_video())
            .await?;
        Ok(())
    }

    /// Stage 1: synthesize and pad the title and content narration.
    async fn generate_audio(
        &self,
        request: &PipelineRequest,
        artifacts: &JobArtifacts,
    ) -> WorkerResult<NarrationTimings> {
        self.store
            .advance_step(&request.job_id, JobStep::GeneratingAudio)
            .await?;

        let voice = self.classifier.classify(&request.content).await?;
        info!(job_id = %request.job_id, voice = %voice, "Narration voice selected");

        self.tts
            .synthesize(&request.content, voice, &artifacts.raw_content_audio())
            .await?;
        self.engine
            .buffer_audio(
                artifacts.raw_content_audio(),
                BufferPosition::End,
                TRAILING_SILENCE_SECS,
                artifacts.content_audio(),
            )
            .await?;

        self.tts
            .synthesize(&request.title, voice, &artifacts.raw_title_audio())
            .await?;
        let raw_title_secs = self
            .engine
            .probe_duration(artifacts.raw_title_audio(), StreamKind::Audio)
            .await?;

        self.engine
            .buffer_audio(
                artifacts.raw_title_audio(),
                BufferPosition::End,
                TRAILING_SILENCE_SECS,
                artifacts.title_audio(),
            )
            .await?;
        let title_secs = self
            .engine
            .probe_duration(artifacts.title_audio(), StreamKind::Audio)
            .await?;

        Ok(NarrationTimings {
            raw_title_secs,
            title_secs,
        })
    }

    /// Stage 2: align the transcript and segment subtitle cues.
    async fn generate_subtitles(
        &self,
        request: &PipelineRequest,
        artifacts: &JobArtifacts,
    ) -> WorkerResult<()> {
        self.store
            .advance_step(&request.job_id, JobStep::GeneratingSrt)
            .await?;
        require(&artifacts.content_audio()).await?;

        let transcript = normalize_transcript(&request.content);
        let words = self
            .aligner
            .align(&transcript, &artifacts.content_audio())
            .await?;

        let cues = group_words(&words);
        info!(
            job_id = %request.job_id,
            "Segmented {} words into {} cues",
            words.len(),
            cues.len()
        );

        tokio::fs::write(artifacts.subtitles(), render_srt(&cues)).await?;
        Ok(())
    }

    /// Stage 3: render the title card.
    async fn generate_title_image(
        &self,
        request: &PipelineRequest,
        artifacts: &JobArtifacts,
    ) -> WorkerResult<()> {
        self.store
            .advance_step(&request.job_id, JobStep::GeneratingTitleImage)
            .await?;

        self.renderer
            .render_title(&request.title, &artifacts.title_image())
            .await?;
        Ok(())
    }

    /// Stage 4: build the looped background with the title card overlaid.
    async fn generate_background_video(
        &self,
        request: &PipelineRequest,
        artifacts: &JobArtifacts,
        timings: NarrationTimings,
    ) -> WorkerResult<()> {
        self.store
            .advance_step(&request.job_id, JobStep::GeneratingBackgroundVideo)
            .await?;
        require(&artifacts.title_audio()).await?;
        require(&artifacts.content_audio()).await?;
        require(&artifacts.title_image()).await?;

        self.engine
            .concat_audio(
                artifacts.title_audio(),
                artifacts.content_audio(),
                artifacts.narration(),
            )
            .await?;
        let narration_secs = self
            .engine
            .probe_duration(artifacts.narration(), StreamKind::Audio)
            .await?;

        self.sampler
            .random_chunk(
                &request.background_video,
                BACKGROUND_CHUNK_SECS,
                artifacts.background_clip(),
            )
            .await?;
        self.engine
            .loop_to_duration(
                artifacts.background_clip(),
                narration_secs,
                artifacts.looped_background(),
            )
            .await?;

        let (width, _height) = self
            .engine
            .probe_dimensions(artifacts.looped_background())
            .await?;
        self.engine
            .resize_image_to_width(
                artifacts.title_image(),
                width,
                artifacts.resized_title_image(),
            )
            .await?;

        self.engine
            .overlay_image(
                artifacts.looped_background(),
                artifacts.resized_title_image(),
                timings.raw_title_secs,
                artifacts.overlaid_video(),
            )
            .await?;
        Ok(())
    }

    /// Stage 5: shift the subtitles past the title and mux everything.
    async fn generate_final_video(
        &self,
        request: &PipelineRequest,
        artifacts: &JobArtifacts,
        timings: NarrationTimings,
    ) -> WorkerResult<()> {
        self.store
            .advance_step(&request.job_id, JobStep::GeneratingFinalVideo)
            .await?;
        require(&artifacts.overlaid_video()).await?;
        require(&artifacts.narration()).await?;
        require(&artifacts.subtitles()).await?;

        self.engine
            .delay_subtitles(
                artifacts.subtitles(),
                timings.title_secs,
                artifacts.delayed_subtitles(),
            )
            .await?;

        self.engine
            .embed_subtitles_and_audio(
                artifacts.overlaid_video(),
                artifacts.narration(),
                artifacts.delayed_subtitles(),
                artifacts.final_video(),
            )
            .await?;
        Ok(())
    }
}

/// Check that an earlier stage actually produced its artifact.
async fn require(path: &Path) -> WorkerResult<()> {
    if tokio::fs::try_exists(path).await.unwrap_or(false) {
        Ok(())
    } else {
        Err(WorkerError::MissingArtifact(path.to_path_buf()))
    }
}
