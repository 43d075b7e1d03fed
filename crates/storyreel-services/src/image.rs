//! Title-card rendering.
//!
//! Thin text-layout wrapper: the title is wrapped to the template's column
//! width and drawn onto the card by the media engine.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::info;

use storyreel_media::MediaEngine;
use storyreel_models::validate_title;

use crate::error::{ServiceError, ServiceResult};

/// Renders the story title onto a title-card image.
#[async_trait]
pub trait TitleRenderer: Send + Sync {
    async fn render_title(&self, title: &str, output: &Path) -> ServiceResult<()>;
}

/// Column width of the title template's text box.
const WRAP_WIDTH: usize = 43;

/// Text box top position, nudged down for titles that fit on two lines.
const TEXT_Y: u32 = 745;
const TEXT_Y_SHORT: u32 = 765;
const SHORT_TITLE_LEN: usize = 80;

/// Greedy word wrap to the template column width.
fn wrap_title(title: &str, width: usize) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in title.split_whitespace() {
        if current.is_empty() {
            current = word.to_string();
        } else if current.chars().count() + 1 + word.chars().count() <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Template-based title-card renderer backed by the media engine.
pub struct TitleCardRenderer {
    engine: MediaEngine,
    template: PathBuf,
    font: PathBuf,
}

impl TitleCardRenderer {
    pub fn new(
        engine: MediaEngine,
        template: impl Into<PathBuf>,
        font: impl Into<PathBuf>,
    ) -> Self {
        Self {
            engine,
            template: template.into(),
            font: font.into(),
        }
    }
}

#[async_trait]
impl TitleRenderer for TitleCardRenderer {
    async fn render_title(&self, title: &str, output: &Path) -> ServiceResult<()> {
        validate_title(title).map_err(|e| ServiceError::validation(e.to_string()))?;

        let title = title.trim();
        let lines = wrap_title(title, WRAP_WIDTH);
        let y = if title.chars().count() < SHORT_TITLE_LEN {
            TEXT_Y_SHORT
        } else {
            TEXT_Y
        };

        info!("Rendering title card ({} lines)", lines.len());

        let text_file = output.with_extension("txt");
        tokio::fs::write(&text_file, lines.join("\n")).await?;

        self.engine
            .render_title_card(&self.template, &self.font, &text_file, y, output)
            .await?;

        Ok(())
    }
}
