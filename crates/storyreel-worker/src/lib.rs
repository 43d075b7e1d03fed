//! StoryReel pipeline worker.
//!
//! Turns a title and story text into a narrated, subtitled video by
//! sequencing TTS, forced alignment, title-card rendering, and FFmpeg
//! composition, tracking progress in the persisted job store.

pub mod artifacts;
pub mod config;
pub mod error;
pub mod pipeline;

pub use artifacts::{JobArtifacts, FINAL_VIDEO_NAME};
pub use config::WorkerConfig;
pub use error::{WorkerError, WorkerResult};
pub use pipeline::{Pipeline, PipelineRequest};
