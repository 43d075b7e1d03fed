//! Shared data models for the StoryReel pipeline.

pub mod job;
pub mod subtitle;
pub mod transcript;

pub use job::{validate_title, JobId, JobRecord, JobStatus, JobStep, TitleTooLong, MAX_TITLE_LEN};
pub use subtitle::{
    format_timecode, group_words, render_srt, AlignedWord, SubtitleCue, MAX_WORDS_PER_CUE,
};
pub use transcript::normalize_transcript;
