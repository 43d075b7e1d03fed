//! Worker entry point.
//!
//! One-shot invocation: creates a job for the given title/content and
//! runs the pipeline for it. Queue transports hand jobs to the same
//! [`Pipeline`] API.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use storyreel_media::{check_ffmpeg, check_ffprobe, MediaEngine, TokioProcessRunner};
use storyreel_services::{ChatGenderClassifier, ElevenLabsTts, GentleAligner, TitleCardRenderer};
use storyreel_store::JobStore;
use storyreel_worker::{Pipeline, PipelineRequest, WorkerConfig};

/// Generate a narrated, subtitled video from a story.
#[derive(Debug, Parser)]
#[command(name = "storyreel-worker", version)]
struct Cli {
    /// Story title (shown on the title card, max 125 characters)
    #[arg(long)]
    title: String,

    /// File holding the story body
    #[arg(long)]
    content: PathBuf,

    /// Background source video
    #[arg(long)]
    background: PathBuf,
}

/// Warn about missing tools and assets without blocking the pipeline.
fn preflight(config: &WorkerConfig) {
    if let Err(e) = check_ffmpeg() {
        warn!("{e}");
    }
    if let Err(e) = check_ffprobe() {
        warn!("{e}");
    }
    if !config.title_font().exists() {
        warn!(
            "title font not found at {}; title cards may render without text",
            config.title_font().display()
        );
    }
    if !config.title_template().exists() {
        warn!(
            "title template not found at {}",
            config.title_template().display()
        );
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    let config = WorkerConfig::from_env()?;
    preflight(&config);

    let content = tokio::fs::read_to_string(&cli.content)
        .await
        .with_context(|| format!("reading {}", cli.content.display()))?;

    tokio::fs::create_dir_all(&config.work_dir).await?;
    let store = Arc::new(JobStore::open(&config.store_path).await?);

    let engine =
        MediaEngine::with_runner(Arc::new(TokioProcessRunner::new(config.ffmpeg_timeout)));
    let pipeline = Pipeline::new(
        store.clone(),
        engine.clone(),
        Arc::new(ElevenLabsTts::new(&config.tts_base_url, &config.tts_api_key)),
        Arc::new(ChatGenderClassifier::new(
            &config.classifier_base_url,
            &config.classifier_api_key,
        )),
        Arc::new(GentleAligner::new(&config.aligner_base_url)),
        Arc::new(TitleCardRenderer::new(
            engine,
            config.title_template(),
            config.title_font(),
        )),
    );

    let job = store
        .create_job(&cli.title, &content, cli.background.to_string_lossy())
        .await?;
    info!(job_id = %job.id, "Job created");

    let request = PipelineRequest {
        job_id: job.id.clone(),
        title: job.title.clone(),
        content: job.content.clone(),
        background_video: cli.background.clone(),
        work_dir: config.work_dir.join(job.id.as_str()),
    };
    pipeline.run(request).await?;

    let done = store.get_job(&job.id).await?;
    info!(
        "Final video: {} ({})",
        done.final_video_path.as_deref().unwrap_or("?"),
        done.size_display.as_deref().unwrap_or("?"),
    );

    Ok(())
}
