//! Forced-alignment service client.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

use storyreel_models::AlignedWord;

use crate::error::{ServiceError, ServiceResult};

/// Maps transcript words onto timestamped audio positions.
#[async_trait]
pub trait AlignmentProvider: Send + Sync {
    async fn align(&self, transcript: &str, audio: &Path) -> ServiceResult<Vec<AlignedWord>>;
}

/// Gentle aligner wire format.
#[derive(Debug, Deserialize)]
struct GentleResponse {
    #[serde(default)]
    words: Vec<GentleWord>,
}

#[derive(Debug, Deserialize)]
struct GentleWord {
    word: String,
    case: String,
    start: Option<f64>,
    end: Option<f64>,
}

impl From<GentleWord> for AlignedWord {
    fn from(w: GentleWord) -> Self {
        AlignedWord {
            success: w.case == "success",
            text: w.word,
            start: w.start.unwrap_or(0.0),
            end: w.end.unwrap_or(0.0),
        }
    }
}

/// HTTP client for a Gentle forced-alignment service.
pub struct GentleAligner {
    client: Client,
    base_url: String,
}

impl GentleAligner {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl AlignmentProvider for GentleAligner {
    async fn align(&self, transcript: &str, audio: &Path) -> ServiceResult<Vec<AlignedWord>> {
        info!("Aligning transcript against {}", audio.display());

        let audio_bytes = tokio::fs::read(audio).await?;
        let file_name = audio
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "audio".to_string());

        let form = Form::new()
            .text("transcript", transcript.to_string())
            .part("audio", Part::bytes(audio_bytes).file_name(file_name));

        let response = self
            .client
            .post(format!("{}/transcriptions?async=false", self.base_url))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(ServiceError::http(status.as_u16(), detail));
        }

        let body: GentleResponse = response.json().await?;
        let words: Vec<AlignedWord> = body.words.into_iter().map(Into::into).collect();
        debug!("Aligner returned {} words", words.len());

        Ok(words)
    }
}
