//! Media composition operations.
//!
//! Each operation is one external FFmpeg invocation over file paths. A
//! non-zero exit surfaces as [`MediaError::OperationFailed`] carrying the
//! captured diagnostic stream; bad caller parameters fail validation
//! before anything is spawned.

use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

use crate::command::FfmpegCommand;
use crate::error::{MediaError, MediaResult};
use crate::probe::{parse_dimensions, parse_duration, probe_args, StreamKind};
use crate::runner::{ProcessRunner, TokioProcessRunner};

/// Extra latency added to every subtitle shift so cues land after the
/// narration actually starts.
pub const SUBTITLE_SYNC_LATENCY_SECS: f64 = 0.1;

/// Width compensation applied when resizing the title card. The original
/// title template renders with transparent margins this wide.
pub const TITLE_CARD_WIDTH_PAD: u32 = 200;

/// Burned-in subtitle style for the final mux.
pub const SUBTITLE_STYLE: &str = "FontName=Mont,FontSize=20,PrimaryColour=&H00ffffff,\
    OutlineColour=&H00000000,BackColour=&H80000000,Bold=1,Italic=0,Alignment=10,Outline=1.5";

/// Where silence is inserted when padding an audio clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferPosition {
    Start,
    End,
}

/// FFmpeg-backed composition engine.
///
/// Holds the single external-process capability; cloning shares it.
#[derive(Clone)]
pub struct MediaEngine {
    runner: Arc<dyn ProcessRunner>,
}

impl Default for MediaEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaEngine {
    /// Create an engine with the default tokio process runner.
    pub fn new() -> Self {
        Self::with_runner(Arc::new(TokioProcessRunner::default()))
    }

    /// Create an engine with a custom runner.
    pub fn with_runner(runner: Arc<dyn ProcessRunner>) -> Self {
        Self { runner }
    }

    /// Duration in seconds of the first matching stream.
    pub async fn probe_duration(&self, path: impl AsRef<Path>, kind: StreamKind) -> MediaResult<f64> {
        let json = self.run_ffprobe(path.as_ref(), kind).await?;
        parse_duration(&json)
    }

    /// Width and height of the first video stream.
    pub async fn probe_dimensions(&self, path: impl AsRef<Path>) -> MediaResult<(u32, u32)> {
        let json = self.run_ffprobe(path.as_ref(), StreamKind::Video).await?;
        parse_dimensions(&json)
    }

    /// Crop a video to a 9:16 portrait window on its full height.
    ///
    /// Target width is `min(width, height * 9 / 16)`; video is re-encoded,
    /// audio copied.
    pub async fn crop_to_aspect(
        &self,
        video: impl AsRef<Path>,
        output: impl AsRef<Path>,
    ) -> MediaResult<()> {
        let video = video.as_ref();
        let (width, height) = self.probe_dimensions(video).await?;
        let target_width = width.min(height * 9 / 16);

        debug!(
            "Cropping {} from {}x{} to {}x{}",
            video.display(),
            width,
            height,
            target_width,
            height
        );

        let cmd = FfmpegCommand::new(video, output.as_ref())
            .video_filter(format!("crop={}:{}", target_width, height))
            .video_codec("libx264")
            .audio_codec("copy")
            .preset("ultrafast");

        self.run_ffmpeg("crop_to_aspect", &cmd).await
    }

    /// Loop a video until it covers `audio_duration` seconds, then trim to
    /// exactly that length.
    pub async fn loop_to_duration(
        &self,
        video: impl AsRef<Path>,
        audio_duration: f64,
        output: impl AsRef<Path>,
    ) -> MediaResult<()> {
        if audio_duration <= 0.0 {
            return Err(MediaError::validation("audio duration must be positive"));
        }

        let video = video.as_ref();
        let video_duration = self.probe_duration(video, StreamKind::Video).await?;
        if video_duration <= 0.0 {
            return Err(MediaError::probe_failed("video has zero duration"));
        }

        let repeats = (audio_duration / video_duration).ceil() as u64;
        info!("Looping {} {} times", video.display(), repeats);

        let cmd = FfmpegCommand::new(video, output.as_ref())
            .stream_loop(repeats)
            .video_filter(format!("trim=duration={}", audio_duration))
            .audio_codec("copy")
            .preset("ultrafast");

        self.run_ffmpeg("loop_to_duration", &cmd).await
    }

    /// Overlay an image centered on a video, visible for `[0, visible_secs]`.
    pub async fn overlay_image(
        &self,
        video: impl AsRef<Path>,
        image: impl AsRef<Path>,
        visible_secs: f64,
        output: impl AsRef<Path>,
    ) -> MediaResult<()> {
        if visible_secs < 0.0 {
            return Err(MediaError::validation("overlay duration must not be negative"));
        }

        let cmd = FfmpegCommand::new(video.as_ref(), output.as_ref())
            .input(image.as_ref())
            .filter_complex(format!(
                "[0:v][1:v]overlay=x=(W-w)/2:y=(H-h)/2:enable='between(t,0,{})'",
                visible_secs
            ))
            .video_codec("libx264")
            .audio_codec("copy")
            .preset("ultrafast");

        self.run_ffmpeg("overlay_image", &cmd).await
    }

    /// Scale an image to `target_width` plus the fixed template pad,
    /// preserving aspect ratio.
    pub async fn resize_image_to_width(
        &self,
        image: impl AsRef<Path>,
        target_width: u32,
        output: impl AsRef<Path>,
    ) -> MediaResult<()> {
        if target_width == 0 {
            return Err(MediaError::validation("target width must be positive"));
        }

        let width = target_width + TITLE_CARD_WIDTH_PAD;
        let cmd = FfmpegCommand::new(image.as_ref(), output.as_ref())
            .video_filter(format!("scale={}:-1", width));

        self.run_ffmpeg("resize_image", &cmd).await
    }

    /// Pad an audio clip with silence at the given position.
    pub async fn buffer_audio(
        &self,
        audio: impl AsRef<Path>,
        position: BufferPosition,
        duration_secs: f64,
        output: impl AsRef<Path>,
    ) -> MediaResult<()> {
        if duration_secs < 0.0 {
            return Err(MediaError::validation("buffer duration must not be negative"));
        }

        let filter = match position {
            BufferPosition::Start => format!("adelay={}s:all=true", duration_secs),
            BufferPosition::End => format!("apad=pad_dur={}s", duration_secs),
        };

        let cmd = FfmpegCommand::new(audio.as_ref(), output.as_ref()).audio_filter(filter);
        self.run_ffmpeg("buffer_audio", &cmd).await
    }

    /// Concatenate two audio files losslessly, `first` before `second`.
    pub async fn concat_audio(
        &self,
        first: impl AsRef<Path>,
        second: impl AsRef<Path>,
        output: impl AsRef<Path>,
    ) -> MediaResult<()> {
        let joined = format!(
            "concat:{}|{}",
            first.as_ref().to_string_lossy(),
            second.as_ref().to_string_lossy()
        );

        let cmd = FfmpegCommand::new(joined, output.as_ref()).codec_copy();
        self.run_ffmpeg("concat_audio", &cmd).await
    }

    /// Shift every subtitle cue forward by `delay_secs` plus the fixed
    /// sync latency.
    pub async fn delay_subtitles(
        &self,
        srt: impl AsRef<Path>,
        delay_secs: f64,
        output: impl AsRef<Path>,
    ) -> MediaResult<()> {
        if delay_secs < 0.0 {
            return Err(MediaError::validation("subtitle delay must not be negative"));
        }

        let cmd = FfmpegCommand::new(srt.as_ref(), output.as_ref())
            .input_offset(delay_secs + SUBTITLE_SYNC_LATENCY_SECS)
            .codec_copy();

        self.run_ffmpeg("delay_subtitles", &cmd).await
    }

    /// Burn subtitles into a video and replace its audio track with the
    /// supplied narration.
    pub async fn embed_subtitles_and_audio(
        &self,
        video: impl AsRef<Path>,
        audio: impl AsRef<Path>,
        srt: impl AsRef<Path>,
        output: impl AsRef<Path>,
    ) -> MediaResult<()> {
        let cmd = FfmpegCommand::new(video.as_ref(), output.as_ref())
            .input(audio.as_ref())
            .video_filter(format!(
                "subtitles={}:force_style='{}'",
                srt.as_ref().to_string_lossy(),
                SUBTITLE_STYLE
            ))
            .map("0:v:0")
            .map("1:a:0")
            .video_codec("libx264")
            .audio_codec("libmp3lame")
            .preset("ultrafast");

        self.run_ffmpeg("embed_subtitles_and_audio", &cmd).await
    }

    /// Draw pre-wrapped title text onto the title-card template.
    ///
    /// `text_file` holds the wrapped lines; `y` is the top text position
    /// chosen by the caller's layout.
    pub async fn render_title_card(
        &self,
        template: impl AsRef<Path>,
        font: impl AsRef<Path>,
        text_file: impl AsRef<Path>,
        y: u32,
        output: impl AsRef<Path>,
    ) -> MediaResult<()> {
        let cmd = FfmpegCommand::new(template.as_ref(), output.as_ref()).video_filter(format!(
            "drawtext=fontfile={}:textfile={}:fontsize=34:fontcolor=black:x=400:y={}:line_spacing=6",
            font.as_ref().to_string_lossy(),
            text_file.as_ref().to_string_lossy(),
            y
        ));

        self.run_ffmpeg("render_title_card", &cmd).await
    }

    /// Extract a chunk from `source` starting at `start` (HH:MM:SS) via
    /// lossless stream copy.
    pub(crate) async fn extract_chunk(
        &self,
        source: impl AsRef<Path>,
        start: &str,
        duration_secs: f64,
        output: impl AsRef<Path>,
    ) -> MediaResult<()> {
        let cmd = FfmpegCommand::new(source.as_ref(), output.as_ref())
            .seek(start)
            .duration(duration_secs)
            .codec_copy();

        self.run_ffmpeg("extract_chunk", &cmd).await
    }

    async fn run_ffmpeg(&self, operation: &str, cmd: &FfmpegCommand) -> MediaResult<()> {
        let args = cmd.build_args();
        let output = self.runner.run("ffmpeg", &args).await?;

        if output.success() {
            Ok(())
        } else {
            Err(MediaError::operation_failed(operation, output.stderr_str()))
        }
    }

    async fn run_ffprobe(&self, path: &Path, kind: StreamKind) -> MediaResult<String> {
        let args = probe_args(kind, &path.to_string_lossy());
        let output = self.runner.run("ffprobe", &args).await?;

        if !output.success() {
            return Err(MediaError::ProbeFailed(output.stderr_str()));
        }
        Ok(output.stdout_str())
    }
}
