//! Per-window segment extraction.
//!
//! Each window gets its own private decode/encode pipeline: one FFmpeg
//! process seeking to the window start, re-encoding until the window
//! end, writing into a scratch directory owned by this extraction. The
//! scratch directory is dropped on every exit path, so repeated runs
//! cannot leak intermediate files.

use std::collections::HashSet;
use std::path::Path;
use tokio::sync::watch;
use tracing::{debug, info};

use vidseg_models::{MediaSource, SegmentWindow};

use crate::codec::{select_candidate, CodecCandidate};
use crate::command::{FfmpegCommand, FfmpegRunner, RunError};
use crate::error::ExtractionFailure;

/// Quality-preserving CRF; matches the "preserve quality as well as the
/// codec allows" contract rather than a bitrate target.
const EXTRACT_CRF: u8 = 18;
/// Audio bitrate for re-encoded segments.
const EXTRACT_AUDIO_BITRATE: &str = "128k";

/// Base per-window deadline in seconds.
const TIMEOUT_BASE_SECS: u64 = 60;
/// Additional deadline per second of window length. Re-encoding long
/// windows legitimately takes longer; without this, large time-based
/// windows would always hit the ceiling.
const TIMEOUT_PER_WINDOW_SEC: f64 = 2.0;
/// Hard cap on the per-window deadline.
const TIMEOUT_CAP_SECS: u64 = 240;

/// Encoded bytes for one window, plus what they were encoded as.
#[derive(Debug, Clone)]
pub struct ExtractedPayload {
    /// Encoded media bytes
    pub bytes: Vec<u8>,
    /// File extension of the container ("webm", "mp4")
    pub extension: String,
    /// MIME type of the payload
    pub content_type: String,
}

/// Extract one window from the source, re-encoded with the given codec
/// candidate set.
pub(crate) async fn extract_window(
    source: &MediaSource,
    window: &SegmentWindow,
    encoders: &HashSet<String>,
    abort_rx: Option<watch::Receiver<bool>>,
) -> Result<ExtractedPayload, ExtractionFailure> {
    if window.start_time >= window.end_time {
        return Err(ExtractionFailure::SeekFailed(format!(
            "window [{:.3}, {:.3}) is empty",
            window.start_time, window.end_time
        )));
    }

    let candidate = select_candidate(encoders).ok_or(ExtractionFailure::NoSupportedCodec)?;

    // Scratch dir scoped to this extraction; dropped on every exit path.
    let scratch = tempfile::tempdir()?;
    let output = scratch
        .path()
        .join(format!("segment-{}.{}", window.index, candidate.container));

    debug!(
        index = window.index,
        start = window.start_time,
        end = window.end_time,
        codec = candidate.name,
        "extracting window"
    );

    let cmd = build_extract_command(&source.path, &output, window, candidate);

    let timeout_secs = extraction_timeout_secs(window.duration());
    let mut runner = FfmpegRunner::new().with_timeout(timeout_secs);
    if let Some(rx) = abort_rx {
        runner = runner.with_abort(rx);
    }

    let window_ms = (window.duration() * 1000.0) as i64;
    let index = window.index;
    let run_result = runner
        .run_with_progress(&cmd, move |p| {
            debug!(
                index,
                percent = p.percentage(window_ms),
                speed = p.speed,
                "encode progress"
            );
        })
        .await;

    if let Err(e) = run_result {
        return Err(classify_run_error(e));
    }

    let size = tokio::fs::metadata(&output)
        .await
        .map(|m| m.len())
        .unwrap_or(0);
    if size == 0 {
        return Err(ExtractionFailure::EmptyOutput);
    }

    let bytes = tokio::fs::read(&output).await?;

    info!(
        index = window.index,
        bytes = bytes.len(),
        codec = candidate.name,
        "window extracted"
    );

    Ok(ExtractedPayload {
        bytes,
        extension: candidate.container.to_string(),
        content_type: candidate.content_type.to_string(),
    })
}

/// Build the seek + re-encode command for one window.
fn build_extract_command(
    input: &Path,
    output: &Path,
    window: &SegmentWindow,
    candidate: &CodecCandidate,
) -> FfmpegCommand {
    let mut cmd = FfmpegCommand::new(input, output)
        .seek(window.start_time)
        .duration(window.duration())
        .video_codec(candidate.video_codec)
        .crf(EXTRACT_CRF);

    // Codec-family specifics: libvpx needs -b:v 0 for CRF-only rate
    // control; libx264 honors a speed preset.
    match candidate.video_codec {
        "libvpx" | "libvpx-vp9" => {
            cmd = cmd.output_args(["-b:v", "0"]);
        }
        "libx264" => {
            cmd = cmd.output_args(["-preset", "fast", "-movflags", "+faststart"]);
        }
        _ => {}
    }

    cmd.audio_codec(candidate.audio_codec)
        .audio_bitrate(EXTRACT_AUDIO_BITRATE)
}

/// Per-window deadline, scaled with window length and capped.
fn extraction_timeout_secs(window_duration: f64) -> u64 {
    let scaled = TIMEOUT_BASE_SECS + (window_duration.max(0.0) * TIMEOUT_PER_WINDOW_SEC) as u64;
    scaled.min(TIMEOUT_CAP_SECS)
}

/// Map a process-level failure to the per-window taxonomy.
fn classify_run_error(e: RunError) -> ExtractionFailure {
    match e {
        RunError::BinaryNotFound => ExtractionFailure::NoSupportedCodec,
        RunError::Timeout(secs) => ExtractionFailure::Timeout(secs),
        RunError::Aborted => ExtractionFailure::Aborted,
        RunError::Failed { stderr, exit_code } => {
            if is_seek_error(&stderr) {
                ExtractionFailure::SeekFailed(stderr)
            } else {
                ExtractionFailure::EncodeSessionError(format!(
                    "ffmpeg exited with {:?}: {}",
                    exit_code, stderr
                ))
            }
        }
        RunError::Io(e) => ExtractionFailure::EncodeSessionError(e.to_string()),
    }
}

/// Heuristic: FFmpeg reports failed input-side seeks with messages like
/// "could not seek to position" or "Error while seeking".
fn is_seek_error(stderr: &str) -> bool {
    let lower = stderr.to_ascii_lowercase();
    lower.contains("seek")
}
