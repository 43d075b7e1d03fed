//! Narration voice classification from story text.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ServiceError, ServiceResult};
use crate::tts::VoiceCategory;

/// Picks a narration voice category for a story.
#[async_trait]
pub trait GenderClassifier: Send + Sync {
    async fn classify(&self, text: &str) -> ServiceResult<VoiceCategory>;
}

const CLASSIFIER_MODEL: &str = "gpt-3.5-turbo";

const CLASSIFIER_PROMPT: &str = "\
You are a gender detection AI. Given some text, determine the likely gender \
of its writer from contextual clues ('my boyfriend did x', 'I (M25)', and so \
on). Reply with exactly one character: 'm' for a likely male writer or 'f' \
for a likely female writer. If unsure, default to 'm'. Never reply with \
anything else.";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'static str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

/// Chat-completion backed classifier.
pub struct ChatGenderClassifier {
    client: Client,
    base_url: String,
    api_key: String,
}

impl ChatGenderClassifier {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }
}

/// Map a raw model reply onto a voice category, defaulting to male.
fn parse_reply(reply: &str) -> VoiceCategory {
    match reply.trim().to_lowercase().as_str() {
        "f" => VoiceCategory::Female,
        _ => VoiceCategory::Male,
    }
}

#[async_trait]
impl GenderClassifier for ChatGenderClassifier {
    async fn classify(&self, text: &str) -> ServiceResult<VoiceCategory> {
        info!("Classifying narration voice");

        let request = ChatRequest {
            model: CLASSIFIER_MODEL,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: CLASSIFIER_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: text,
                },
            ],
        };

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(ServiceError::http(status.as_u16(), detail));
        }

        let body: ChatResponse = response.json().await?;
        let reply = body
            .choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .ok_or_else(|| ServiceError::invalid_response("empty completion"))?;

        let voice = parse_reply(reply);
        debug!("Classifier replied {:?} -> {}", reply, voice);
        Ok(voice)
    }
}
