//! FFmpeg command builder and runner.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::progress::{parse_progress_line, FfmpegProgress};

/// Diagnostic stderr lines kept for error reporting. FFmpeg interleaves
/// warnings and errors with `-progress` key=value output; only the tail
/// matters when the process fails.
const STDERR_TAIL_LINES: usize = 40;

/// Low-level outcome of running an FFmpeg process.
///
/// The extractor maps these onto the per-window failure taxonomy; this
/// layer only reports what the process did.
#[derive(Debug)]
pub(crate) enum RunError {
    /// ffmpeg binary missing from PATH
    BinaryNotFound,
    /// Non-zero exit; carries the collected stderr tail
    Failed { stderr: String, exit_code: Option<i32> },
    /// Process exceeded the configured deadline and was killed
    Timeout(u64),
    /// Caller raised the abort signal; process was killed
    Aborted,
    /// Spawning or waiting on the process failed
    Io(std::io::Error),
}

impl From<std::io::Error> for RunError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

/// Builder for FFmpeg commands.
#[derive(Debug, Clone)]
pub struct FfmpegCommand {
    /// Input file path
    input: PathBuf,
    /// Output file path
    output: PathBuf,
    /// Input arguments (before -i)
    input_args: Vec<String>,
    /// Output arguments (after -i)
    output_args: Vec<String>,
    /// Whether to overwrite output
    overwrite: bool,
    /// Log level
    log_level: String,
}

impl FfmpegCommand {
    /// Create a new FFmpeg command.
    pub fn new(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Self {
        Self {
            input: input.as_ref().to_path_buf(),
            output: output.as_ref().to_path_buf(),
            input_args: Vec::new(),
            output_args: Vec::new(),
            overwrite: true,
            log_level: "error".to_string(),
        }
    }

    /// Add an input argument (before -i).
    pub fn input_arg(mut self, arg: impl Into<String>) -> Self {
        self.input_args.push(arg.into());
        self
    }

    /// Add an output argument (after -i).
    pub fn output_arg(mut self, arg: impl Into<String>) -> Self {
        self.output_args.push(arg.into());
        self
    }

    /// Add multiple output arguments.
    pub fn output_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.output_args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set seek position (input-side, before decode).
    pub fn seek(self, seconds: f64) -> Self {
        self.input_arg("-ss").input_arg(format!("{:.3}", seconds))
    }

    /// Set output duration.
    pub fn duration(self, seconds: f64) -> Self {
        self.input_arg("-t").input_arg(format!("{:.3}", seconds))
    }

    /// Set video codec.
    pub fn video_codec(self, codec: impl Into<String>) -> Self {
        self.output_arg("-c:v").output_arg(codec)
    }

    /// Set audio codec.
    pub fn audio_codec(self, codec: impl Into<String>) -> Self {
        self.output_arg("-c:a").output_arg(codec)
    }

    /// Set CRF (quality).
    pub fn crf(self, crf: u8) -> Self {
        self.output_arg("-crf").output_arg(crf.to_string())
    }

    /// Set audio bitrate.
    pub fn audio_bitrate(self, bitrate: impl Into<String>) -> Self {
        self.output_arg("-b:a").output_arg(bitrate)
    }

    /// Set log level.
    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Build the command arguments.
    pub fn build_args(&self) -> Vec<String> {
        let mut args = Vec::new();

        if self.overwrite {
            args.push("-y".to_string());
        }

        args.push("-v".to_string());
        args.push(self.log_level.clone());

        // Progress output to stderr
        args.push("-progress".to_string());
        args.push("pipe:2".to_string());

        args.extend(self.input_args.clone());

        args.push("-i".to_string());
        args.push(self.input.to_string_lossy().to_string());

        args.extend(self.output_args.clone());

        args.push(self.output.to_string_lossy().to_string());

        args
    }
}

/// Runner for FFmpeg commands with progress tracking, timeout and abort.
pub struct FfmpegRunner {
    /// Abort signal receiver
    abort_rx: Option<watch::Receiver<bool>>,
    /// Timeout in seconds
    timeout_secs: Option<u64>,
}

impl Default for FfmpegRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl FfmpegRunner {
    /// Create a new runner.
    pub fn new() -> Self {
        Self {
            abort_rx: None,
            timeout_secs: None,
        }
    }

    /// Set the abort signal. Raising it kills the process immediately;
    /// the run then resolves as aborted rather than running to
    /// completion.
    pub fn with_abort(mut self, abort_rx: watch::Receiver<bool>) -> Self {
        self.abort_rx = Some(abort_rx);
        self
    }

    /// Set a deadline for the whole run.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Run an FFmpeg command.
    pub(crate) async fn run(&self, cmd: &FfmpegCommand) -> Result<(), RunError> {
        self.run_with_progress(cmd, |_| {}).await
    }

    /// Run an FFmpeg command with a progress callback.
    pub(crate) async fn run_with_progress<F>(
        &self,
        cmd: &FfmpegCommand,
        progress_callback: F,
    ) -> Result<(), RunError>
    where
        F: Fn(FfmpegProgress) + Send + 'static,
    {
        which::which("ffmpeg").map_err(|_| RunError::BinaryNotFound)?;

        let args = cmd.build_args();
        debug!("Running FFmpeg: ffmpeg {}", args.join(" "));

        let mut child = Command::new("ffmpeg")
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        let stderr = child.stderr.take().ok_or_else(|| {
            RunError::Io(std::io::Error::other("stderr not captured"))
        })?;
        let mut reader = BufReader::new(stderr).lines();

        // Parse progress key=value lines; keep the tail of everything
        // else for error reporting.
        let stderr_task = tokio::spawn(async move {
            let mut current_progress = FfmpegProgress::default();
            let mut diagnostics: Vec<String> = Vec::new();

            while let Ok(Some(line)) = reader.next_line().await {
                match parse_progress_line(&line, &mut current_progress) {
                    Some(progress) => progress_callback(progress),
                    None if !line.trim().is_empty() && !line.contains('=') => {
                        if diagnostics.len() == STDERR_TAIL_LINES {
                            diagnostics.remove(0);
                        }
                        diagnostics.push(line);
                    }
                    None => {}
                }
            }

            diagnostics
        });

        let wait_result = self.wait_for_completion(&mut child).await;

        let diagnostics = stderr_task.await.unwrap_or_default();

        match wait_result {
            Ok(status) if status.success() => Ok(()),
            Ok(status) => Err(RunError::Failed {
                stderr: diagnostics.join("\n"),
                exit_code: status.code(),
            }),
            Err(e) => Err(e),
        }
    }

    /// Wait for the child process, racing the abort signal and timeout.
    async fn wait_for_completion(
        &self,
        child: &mut Child,
    ) -> Result<std::process::ExitStatus, RunError> {
        let deadline = self
            .timeout_secs
            .map(|secs| tokio::time::sleep(Duration::from_secs(secs)));
        tokio::pin!(deadline);

        let mut abort_rx = self.abort_rx.clone();

        loop {
            tokio::select! {
                status = child.wait() => {
                    return Ok(status?);
                }
                _ = async {
                    match deadline.as_mut().as_pin_mut() {
                        Some(sleep) => sleep.await,
                        None => std::future::pending().await,
                    }
                } => {
                    let secs = self.timeout_secs.unwrap_or(0);
                    warn!("FFmpeg timed out after {} seconds, killing process", secs);
                    let _ = child.kill().await;
                    return Err(RunError::Timeout(secs));
                }
                changed = async {
                    match abort_rx.as_mut() {
                        Some(rx) => rx.changed().await,
                        None => std::future::pending().await,
                    }
                } => {
                    let aborted = changed.is_ok()
                        && self.abort_rx.as_ref().is_some_and(|rx| *rx.borrow());
                    if aborted {
                        warn!("FFmpeg aborted by caller, killing process");
                        let _ = child.kill().await;
                        return Err(RunError::Aborted);
                    }
                    // Sender dropped or value still false: keep waiting
                    // on the child only.
                    if changed.is_err() {
                        abort_rx = None;
                    }
                }
            }
        }
    }
}

/// Check if FFmpeg is available.
pub fn check_ffmpeg() -> Option<PathBuf> {
    which::which("ffmpeg").ok()
}

/// Check if FFprobe is available.
pub fn check_ffprobe() -> Option<PathBuf> {
    which::which("ffprobe").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_builder() {
        let cmd = FfmpegCommand::new("input.mp4", "output.webm")
            .seek(10.0)
            .duration(30.0)
            .video_codec("libvpx-vp9")
            .crf(18)
            .audio_codec("libopus")
            .audio_bitrate("128k");

        let args = cmd.build_args();
        assert!(args.contains(&"-ss".to_string()));
        assert!(args.contains(&"10.000".to_string()));
        assert!(args.contains(&"-t".to_string()));
        assert!(args.contains(&"30.000".to_string()));
        assert!(args.contains(&"-c:v".to_string()));
        assert!(args.contains(&"libvpx-vp9".to_string()));
        assert!(args.contains(&"-c:a".to_string()));
        assert!(args.contains(&"libopus".to_string()));
        assert_eq!(args.last().unwrap(), "output.webm");
    }

    #[test]
    fn test_seek_is_input_side() {
        let cmd = FfmpegCommand::new("in.mp4", "out.webm").seek(5.0);
        let args = cmd.build_args();
        let ss = args.iter().position(|a| a == "-ss").unwrap();
        let i = args.iter().position(|a| a == "-i").unwrap();
        assert!(ss < i, "-ss must come before -i");
    }
}
