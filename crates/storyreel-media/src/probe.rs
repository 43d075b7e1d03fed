//! FFprobe stream inspection.

use serde::Deserialize;

use crate::error::{MediaError, MediaResult};

/// Which stream kind a probe should look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    Audio,
    Video,
}

impl StreamKind {
    /// FFprobe `-select_streams` specifier.
    pub fn selector(&self) -> &'static str {
        match self {
            StreamKind::Audio => "a",
            StreamKind::Video => "v",
        }
    }
}

/// FFprobe JSON output.
#[derive(Debug, Deserialize)]
pub(crate) struct FfprobeOutput {
    #[serde(default)]
    pub streams: Vec<FfprobeStream>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FfprobeStream {
    pub duration: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// Build the ffprobe argument list for one file and stream kind.
pub(crate) fn probe_args(kind: StreamKind, path: &str) -> Vec<String> {
    vec![
        "-v".to_string(),
        "error".to_string(),
        "-print_format".to_string(),
        "json".to_string(),
        "-show_streams".to_string(),
        "-select_streams".to_string(),
        kind.selector().to_string(),
        path.to_string(),
    ]
}

/// Parse the duration of the first matching stream.
pub(crate) fn parse_duration(json: &str) -> MediaResult<f64> {
    let probe: FfprobeOutput = serde_json::from_str(json)?;
    let stream = probe
        .streams
        .first()
        .ok_or_else(|| MediaError::probe_failed("no matching stream"))?;

    stream
        .duration
        .as_deref()
        .and_then(|d| d.parse::<f64>().ok())
        .ok_or_else(|| MediaError::probe_failed("stream has no duration"))
}

/// Parse the dimensions of the first video stream.
pub(crate) fn parse_dimensions(json: &str) -> MediaResult<(u32, u32)> {
    let probe: FfprobeOutput = serde_json::from_str(json)?;
    let stream = probe
        .streams
        .first()
        .ok_or_else(|| MediaError::probe_failed("no video stream"))?;

    match (stream.width, stream.height) {
        (Some(w), Some(h)) => Ok((w, h)),
        _ => Err(MediaError::probe_failed("video stream has no dimensions")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration() {
        let json = r#"{"streams":[{"codec_type":"audio","duration":"12.480000"}]}"#;
        assert!((parse_duration(json).unwrap() - 12.48).abs() < 1e-9);
    }

    #[test]
    fn test_parse_duration_missing_stream() {
        assert!(matches!(
            parse_duration(r#"{"streams":[]}"#),
            Err(MediaError::ProbeFailed(_))
        ));
    }

    #[test]
    fn test_parse_dimensions() {
        let json = r#"{"streams":[{"codec_type":"video","width":1920,"height":1080,"duration":"60.0"}]}"#;
        assert_eq!(parse_dimensions(json).unwrap(), (1920, 1080));
    }

    #[test]
    fn test_probe_args_select_stream_kind() {
        let args = probe_args(StreamKind::Audio, "clip.mp3");
        assert!(args.windows(2).any(|w| w[0] == "-select_streams" && w[1] == "a"));
        assert_eq!(args.last().unwrap(), "clip.mp3");
    }
}
