//! Per-job artifact registry.
//!
//! Every intermediate file lives in the job's working directory under a
//! fixed name. Each artifact is produced by exactly one stage and
//! consumed only by later ones; the registry makes those paths explicit
//! instead of scattering directory conventions through the pipeline.

use std::path::{Path, PathBuf};

/// Fixed name of the final rendered video.
pub const FINAL_VIDEO_NAME: &str = "final.mp4";

/// Paths of all artifacts for one job.
#[derive(Debug, Clone)]
pub struct JobArtifacts {
    dir: PathBuf,
}

impl JobArtifacts {
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: work_dir.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Content narration straight from the synthesizer.
    pub fn raw_content_audio(&self) -> PathBuf {
        self.dir.join("pre_content.mp3")
    }

    /// Content narration with trailing silence.
    pub fn content_audio(&self) -> PathBuf {
        self.dir.join("content.mp3")
    }

    /// Title narration straight from the synthesizer.
    pub fn raw_title_audio(&self) -> PathBuf {
        self.dir.join("pre_title.mp3")
    }

    /// Title narration with trailing silence.
    pub fn title_audio(&self) -> PathBuf {
        self.dir.join("title.mp3")
    }

    /// Subtitle cues aligned to the content narration.
    pub fn subtitles(&self) -> PathBuf {
        self.dir.join("content.srt")
    }

    /// Subtitles shifted past the title narration.
    pub fn delayed_subtitles(&self) -> PathBuf {
        self.dir.join("delayed_content.srt")
    }

    /// Rendered title card.
    pub fn title_image(&self) -> PathBuf {
        self.dir.join("title_image.png")
    }

    /// Title card scaled to the video width.
    pub fn resized_title_image(&self) -> PathBuf {
        self.dir.join("resized_title_image.png")
    }

    /// Title + content narration, concatenated.
    pub fn narration(&self) -> PathBuf {
        self.dir.join("narration.mp3")
    }

    /// Raw background chunk sampled from the source.
    pub fn background_clip(&self) -> PathBuf {
        self.dir.join("background.mp4")
    }

    /// Background chunk looped to narration length.
    pub fn looped_background(&self) -> PathBuf {
        self.dir.join("looped_background.mp4")
    }

    /// Looped background with the title card overlaid.
    pub fn overlaid_video(&self) -> PathBuf {
        self.dir.join("overlaid.mp4")
    }

    /// The final muxed video.
    pub fn final_video(&self) -> PathBuf {
        self.dir.join(FINAL_VIDEO_NAME)
    }
}
