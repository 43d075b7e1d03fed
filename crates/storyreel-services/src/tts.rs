//! Text-to-speech synthesis.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::fmt;
use std::path::Path;
use tracing::{debug, info};

use crate::error::{ServiceError, ServiceResult};

/// Narration voice category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceCategory {
    Male,
    Female,
}

impl VoiceCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoiceCategory::Male => "m",
            VoiceCategory::Female => "f",
        }
    }
}

impl fmt::Display for VoiceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Synthesizes narration audio for a text.
#[async_trait]
pub trait TtsProvider: Send + Sync {
    /// Synthesize `text` with a voice of the given category, writing the
    /// audio to `output`.
    async fn synthesize(&self, text: &str, voice: VoiceCategory, output: &Path)
        -> ServiceResult<()>;
}

/// Deep male narrator voice.
const VOICE_ID_DEEP_MALE: &str = "pNInz6obpgDQGcFmaJgB";
/// Soft female narrator voice.
const VOICE_ID_SOFT_FEMALE: &str = "EXAVITQu4vr4xnSDxMaL";

const TTS_MODEL: &str = "eleven_monolingual_v1";

#[derive(Debug, Serialize)]
struct TtsRequest<'a> {
    text: &'a str,
    model_id: &'static str,
    voice_settings: VoiceSettings,
}

#[derive(Debug, Serialize)]
struct VoiceSettings {
    stability: f64,
    similarity_boost: f64,
}

/// ElevenLabs text-to-speech client.
pub struct ElevenLabsTts {
    client: Client,
    base_url: String,
    api_key: String,
}

impl ElevenLabsTts {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    fn voice_id(voice: VoiceCategory) -> &'static str {
        match voice {
            VoiceCategory::Male => VOICE_ID_DEEP_MALE,
            VoiceCategory::Female => VOICE_ID_SOFT_FEMALE,
        }
    }
}

#[async_trait]
impl TtsProvider for ElevenLabsTts {
    async fn synthesize(
        &self,
        text: &str,
        voice: VoiceCategory,
        output: &Path,
    ) -> ServiceResult<()> {
        let url = format!("{}/v1/text-to-speech/{}", self.base_url, Self::voice_id(voice));
        info!("Synthesizing {} characters of narration", text.len());

        let response = self
            .client
            .post(&url)
            .header("Accept", "audio/mpeg")
            .header("xi-api-key", &self.api_key)
            .json(&TtsRequest {
                text,
                model_id: TTS_MODEL,
                voice_settings: VoiceSettings {
                    stability: 0.5,
                    similarity_boost: 0.5,
                },
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(ServiceError::http(status.as_u16(), detail));
        }

        let audio = response.bytes().await?;
        tokio::fs::write(output, &audio).await?;
        debug!("Wrote {} bytes of audio to {}", audio.len(), output.display());

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_synthesize_writes_audio_bytes() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(format!("/v1/text-to-speech/{}", VOICE_ID_DEEP_MALE)))
            .and(header("xi-api-key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ID3fakeaudio".to_vec()))
            .mount(&server)
            .await;

        let tts = ElevenLabsTts::new(server.uri(), "test-key");
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("narration.mp3");

        tts.synthesize("hello there", VoiceCategory::Male, &out)
            .await
            .unwrap();

        assert_eq!(std::fs::read(&out).unwrap(), b"ID3fakeaudio");
    }

    #[tokio::test]
    async fn test_synthesize_surfaces_http_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
            .mount(&server)
            .await;

        let tts = ElevenLabsTts::new(server.uri(), "bad-key");
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("narration.mp3");

        let err = tts
            .synthesize("hello", VoiceCategory::Female, &out)
            .await
            .unwrap_err();

        match err {
            ServiceError::Http { status, detail } => {
                assert_eq!(status, 401);
                assert!(detail.contains("invalid api key"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!out.exists());
    }
}
