//! Randomized background-clip sampling.

use rand::Rng;
use std::path::Path;
use tracing::info;

use crate::engine::MediaEngine;
use crate::error::{MediaError, MediaResult};
use crate::probe::StreamKind;

/// Extracts randomized sub-clips from a longer background source.
#[derive(Clone)]
pub struct ClipSampler {
    engine: MediaEngine,
}

impl ClipSampler {
    pub fn new(engine: MediaEngine) -> Self {
        Self { engine }
    }

    /// Extract a `required_secs`-long clip from a uniformly random offset
    /// within the source, via lossless stream copy.
    ///
    /// Fails validation when the source is shorter than the required
    /// duration; a source of exactly the required length is accepted and
    /// sampled from offset zero.
    pub async fn random_chunk(
        &self,
        source: impl AsRef<Path>,
        required_secs: f64,
        output: impl AsRef<Path>,
    ) -> MediaResult<()> {
        let source = source.as_ref();
        let total_secs = self.engine.probe_duration(source, StreamKind::Video).await?;

        let max_start = max_start_offset(total_secs, required_secs)?;
        let start = rand::rng().random_range(0..=max_start);
        let start_time = format_offset(start);

        info!(
            "Sampling {}s from {} at {}",
            required_secs,
            source.display(),
            start_time
        );

        self.engine
            .extract_chunk(source, &start_time, required_secs, output)
            .await
    }
}

/// Largest valid integer start offset for a chunk of `required` seconds.
fn max_start_offset(total: f64, required: f64) -> MediaResult<u64> {
    if required <= 0.0 {
        return Err(MediaError::validation("required duration must be positive"));
    }
    if total < required {
        return Err(MediaError::validation(format!(
            "source clip is too short: {total}s available, {required}s required"
        )));
    }
    Ok((total - required).ceil() as u64)
}

/// Format a whole-second offset as `HH:MM:SS`.
fn format_offset(secs: u64) -> String {
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}
