//! FFmpeg command builder.

use std::path::{Path, PathBuf};

/// One input file with its preceding arguments.
#[derive(Debug, Clone)]
struct Input {
    /// Arguments placed before this input's `-i`
    args: Vec<String>,
    /// Input path (or protocol string such as `concat:a|b`)
    path: PathBuf,
}

/// Builder for FFmpeg commands.
#[derive(Debug, Clone)]
pub struct FfmpegCommand {
    inputs: Vec<Input>,
    output: PathBuf,
    /// Output arguments (after the last -i)
    output_args: Vec<String>,
    overwrite: bool,
    log_level: String,
}

impl FfmpegCommand {
    /// Create a new FFmpeg command with a single input.
    pub fn new(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Self {
        Self {
            inputs: vec![Input {
                args: Vec::new(),
                path: input.as_ref().to_path_buf(),
            }],
            output: output.as_ref().to_path_buf(),
            output_args: Vec::new(),
            overwrite: true,
            log_level: "error".to_string(),
        }
    }

    /// Add another input file after the current one.
    pub fn input(mut self, path: impl AsRef<Path>) -> Self {
        self.inputs.push(Input {
            args: Vec::new(),
            path: path.as_ref().to_path_buf(),
        });
        self
    }

    /// Add an argument before the most recent input's `-i`.
    pub fn input_arg(mut self, arg: impl Into<String>) -> Self {
        self.inputs
            .last_mut()
            .expect("command always has an input")
            .args
            .push(arg.into());
        self
    }

    /// Add an output argument.
    pub fn output_arg(mut self, arg: impl Into<String>) -> Self {
        self.output_args.push(arg.into());
        self
    }

    /// Seek the most recent input (before -i, so stream copy stays cheap).
    pub fn seek(self, position: impl Into<String>) -> Self {
        self.input_arg("-ss").input_arg(position)
    }

    /// Shift the most recent input's timestamps.
    pub fn input_offset(self, seconds: f64) -> Self {
        self.input_arg("-itsoffset")
            .input_arg(format!("{:.3}", seconds))
    }

    /// Loop the most recent input.
    pub fn stream_loop(self, repeats: u64) -> Self {
        self.input_arg("-stream_loop").input_arg(repeats.to_string())
    }

    /// Limit output duration.
    pub fn duration(self, seconds: f64) -> Self {
        self.output_arg("-t").output_arg(format!("{:.3}", seconds))
    }

    /// Set video filter.
    pub fn video_filter(self, filter: impl Into<String>) -> Self {
        self.output_arg("-vf").output_arg(filter)
    }

    /// Set audio filter.
    pub fn audio_filter(self, filter: impl Into<String>) -> Self {
        self.output_arg("-af").output_arg(filter)
    }

    /// Set filter complex.
    pub fn filter_complex(self, filter: impl Into<String>) -> Self {
        self.output_arg("-filter_complex").output_arg(filter)
    }

    /// Set video codec.
    pub fn video_codec(self, codec: impl Into<String>) -> Self {
        self.output_arg("-c:v").output_arg(codec)
    }

    /// Set audio codec.
    pub fn audio_codec(self, codec: impl Into<String>) -> Self {
        self.output_arg("-c:a").output_arg(codec)
    }

    /// Copy all streams without re-encoding.
    pub fn codec_copy(self) -> Self {
        self.output_arg("-c").output_arg("copy")
    }

    /// Map a stream into the output.
    pub fn map(self, specifier: impl Into<String>) -> Self {
        self.output_arg("-map").output_arg(specifier)
    }

    /// Set encoder preset.
    pub fn preset(self, preset: impl Into<String>) -> Self {
        self.output_arg("-preset").output_arg(preset)
    }

    /// Build the argument list (without the program name).
    pub fn build_args(&self) -> Vec<String> {
        let mut args = Vec::new();

        if self.overwrite {
            args.push("-y".to_string());
        }

        args.push("-v".to_string());
        args.push(self.log_level.clone());

        for input in &self.inputs {
            args.extend(input.args.clone());
            args.push("-i".to_string());
            args.push(input.path.to_string_lossy().to_string());
        }

        args.extend(self.output_args.clone());
        args.push(self.output.to_string_lossy().to_string());

        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_builder() {
        let cmd = FfmpegCommand::new("input.mp4", "output.mp4")
            .seek("00:01:00")
            .duration(30.0)
            .video_codec("libx264")
            .preset("ultrafast");

        let args = cmd.build_args();
        assert!(args.contains(&"-ss".to_string()));
        assert!(args.contains(&"00:01:00".to_string()));
        assert!(args.contains(&"-c:v".to_string()));
        assert!(args.contains(&"libx264".to_string()));
        assert_eq!(args.last().unwrap(), "output.mp4");
    }

    #[test]
    fn test_input_args_precede_their_input() {
        let cmd = FfmpegCommand::new("video.mp4", "out.mp4")
            .input("image.png")
            .input_arg("-loop")
            .input_arg("1");

        let args = cmd.build_args();
        let first_i = args.iter().position(|a| a == "-i").unwrap();
        let loop_pos = args.iter().position(|a| a == "-loop").unwrap();
        // -loop belongs to the second input, so it must come after the first -i
        assert!(loop_pos > first_i);
        assert_eq!(args[loop_pos + 2], "-i");
        assert_eq!(args[loop_pos + 3], "image.png");
    }

    #[test]
    fn test_overwrite_and_log_level_defaults() {
        let args = FfmpegCommand::new("a.mp3", "b.mp3").build_args();
        assert_eq!(args[0], "-y");
        assert_eq!(args[1], "-v");
        assert_eq!(args[2], "error");
    }
}
