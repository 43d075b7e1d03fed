//! External service collaborators for the StoryReel pipeline.
//!
//! Each collaborator is a trait seam with one HTTP (or media-engine
//! backed) implementation: speech synthesis, narration-voice
//! classification, forced alignment, and title-card rendering.

pub mod align;
pub mod error;
pub mod gender;
pub mod image;
pub mod tts;

pub use align::{AlignmentProvider, GentleAligner};
pub use error::{ServiceError, ServiceResult};
pub use gender::{ChatGenderClassifier, GenderClassifier};
pub use image::{TitleCardRenderer, TitleRenderer};
pub use tts::{ElevenLabsTts, TtsProvider, VoiceCategory};
