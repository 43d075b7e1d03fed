//! External-process capability.
//!
//! Every media operation bottoms out in one blocking external invocation.
//! The [`ProcessRunner`] trait is the single seam for that capability so
//! tests can substitute a fake without touching the filter-graph logic.

use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

use crate::error::{MediaError, MediaResult};

/// Captured output of a finished external process.
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    /// Exit code, if the process exited normally
    pub exit_code: Option<i32>,
    /// Captured stdout
    pub stdout: Vec<u8>,
    /// Captured stderr (the diagnostic stream for ffmpeg/ffprobe)
    pub stderr: Vec<u8>,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    pub fn stdout_str(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    pub fn stderr_str(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }
}

/// Runs one external program to completion with a bounded wait.
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    async fn run(&self, program: &str, args: &[String]) -> MediaResult<ProcessOutput>;
}

/// Default runner backed by `tokio::process`.
#[derive(Debug, Clone)]
pub struct TokioProcessRunner {
    timeout: Duration,
}

/// Default per-invocation timeout.
const DEFAULT_TIMEOUT_SECS: u64 = 600;

impl Default for TokioProcessRunner {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl TokioProcessRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl ProcessRunner for TokioProcessRunner {
    async fn run(&self, program: &str, args: &[String]) -> MediaResult<ProcessOutput> {
        which::which(program).map_err(|_| MediaError::ToolNotFound {
            tool: program.to_string(),
        })?;

        debug!("Running: {} {}", program, args.join(" "));

        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output();

        let output = tokio::time::timeout(self.timeout, output)
            .await
            .map_err(|_| MediaError::Timeout(self.timeout.as_secs()))??;

        Ok(ProcessOutput {
            exit_code: output.status.code(),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}

/// Check if FFmpeg is available.
pub fn check_ffmpeg() -> MediaResult<std::path::PathBuf> {
    which::which("ffmpeg").map_err(|_| MediaError::ToolNotFound {
        tool: "ffmpeg".to_string(),
    })
}

/// Check if FFprobe is available.
pub fn check_ffprobe() -> MediaResult<std::path::PathBuf> {
    which::which("ffprobe").map_err(|_| MediaError::ToolNotFound {
        tool: "ffprobe".to_string(),
    })
}
