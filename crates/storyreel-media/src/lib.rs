//! FFmpeg CLI wrapper for the StoryReel composition pipeline.
//!
//! This crate provides:
//! - Type-safe FFmpeg command building
//! - A single [`ProcessRunner`] capability for external invocations
//! - All composition operations (probe, crop, loop, overlay, pad, concat,
//!   subtitle shift, final mux)
//! - Randomized background-clip sampling

pub mod command;
pub mod engine;
pub mod error;
pub mod probe;
pub mod runner;
pub mod sampler;

pub use command::FfmpegCommand;
pub use engine::{
    BufferPosition, MediaEngine, SUBTITLE_STYLE, SUBTITLE_SYNC_LATENCY_SECS, TITLE_CARD_WIDTH_PAD,
};
pub use error::{MediaError, MediaResult};
pub use probe::StreamKind;
pub use runner::{check_ffmpeg, check_ffprobe, ProcessOutput, ProcessRunner, TokioProcessRunner};
pub use sampler::ClipSampler;
