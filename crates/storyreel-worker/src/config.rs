//! Worker configuration.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{WorkerError, WorkerResult};

/// Worker configuration, loaded from the environment.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Root of all per-job working directories
    pub work_dir: PathBuf,
    /// Job store snapshot file
    pub store_path: PathBuf,
    /// Directory holding the title template and font
    pub assets_dir: PathBuf,
    /// Per-invocation FFmpeg timeout
    pub ffmpeg_timeout: Duration,
    /// ElevenLabs endpoint and key
    pub tts_base_url: String,
    pub tts_api_key: String,
    /// Chat-completion endpoint and key for voice classification
    pub classifier_base_url: String,
    pub classifier_api_key: String,
    /// Gentle forced-alignment endpoint
    pub aligner_base_url: String,
}

fn required(name: &str) -> WorkerResult<String> {
    std::env::var(name).map_err(|_| WorkerError::config(format!("{name} not set")))
}

impl WorkerConfig {
    /// Create config from environment variables.
    pub fn from_env() -> WorkerResult<Self> {
        Ok(Self {
            work_dir: std::env::var("STORYREEL_WORK_DIR")
                .unwrap_or_else(|_| "/tmp/storyreel".to_string())
                .into(),
            store_path: std::env::var("STORYREEL_STORE_PATH")
                .unwrap_or_else(|_| "/tmp/storyreel/jobs.json".to_string())
                .into(),
            assets_dir: std::env::var("STORYREEL_ASSETS_DIR")
                .unwrap_or_else(|_| "assets".to_string())
                .into(),
            ffmpeg_timeout: Duration::from_secs(
                std::env::var("STORYREEL_FFMPEG_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(600),
            ),
            tts_base_url: std::env::var("ELEVENLABS_BASE_URL")
                .unwrap_or_else(|_| "https://api.elevenlabs.io".to_string()),
            tts_api_key: required("ELEVENLABS_API_KEY")?,
            classifier_base_url: std::env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com".to_string()),
            classifier_api_key: required("OPENAI_API_KEY")?,
            aligner_base_url: required("GENTLE_ALIGNER_URL")?,
        })
    }

    /// Title-card template path.
    pub fn title_template(&self) -> PathBuf {
        self.assets_dir.join("title_template.png")
    }

    /// Title-card font path.
    pub fn title_font(&self) -> PathBuf {
        self.assets_dir.join("Poppins-SemiBold.ttf")
    }
}
