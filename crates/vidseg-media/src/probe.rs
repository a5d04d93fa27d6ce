//! FFprobe duration probing.

use serde::Deserialize;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

use vidseg_models::MediaSource;

use crate::error::ProbeError;

/// Ceiling on the metadata probe. FFprobe only reads headers, so this
/// is generous even for large files on slow disks.
const PROBE_TIMEOUT_SECS: u64 = 15;

/// FFprobe JSON output format.
#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    format: FfprobeFormat,
    #[serde(default)]
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    codec_type: Option<String>,
    duration: Option<String>,
}

/// Probe a media source for its total duration in seconds.
///
/// Loads just enough of the source to resolve metadata; no frames are
/// decoded. The subprocess is bounded by [`PROBE_TIMEOUT_SECS`] and all
/// handles are dropped on both success and failure paths.
pub async fn probe_duration(source: &MediaSource) -> Result<f64, ProbeError> {
    let path = &source.path;

    if !path.exists() {
        return Err(ProbeError::Unreadable(format!(
            "file not found: {}",
            path.display()
        )));
    }

    which::which("ffprobe")
        .map_err(|_| ProbeError::Unreadable("ffprobe not found in PATH".to_string()))?;

    let output = tokio::time::timeout(
        Duration::from_secs(PROBE_TIMEOUT_SECS),
        Command::new("ffprobe")
            .args([
                "-v",
                "quiet",
                "-print_format",
                "json",
                "-show_format",
                "-show_streams",
            ])
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output(),
    )
    .await
    .map_err(|_| ProbeError::Timeout(PROBE_TIMEOUT_SECS))?
    .map_err(|e| ProbeError::Unreadable(e.to_string()))?;

    if !output.status.success() {
        return Err(ProbeError::Unreadable(
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ));
    }

    let probe: FfprobeOutput = serde_json::from_slice(&output.stdout)
        .map_err(|e| ProbeError::Unreadable(format!("ffprobe output not parseable: {e}")))?;

    let duration = duration_from_output(&probe).ok_or_else(|| {
        ProbeError::Unreadable("no positive duration in container or streams".to_string())
    })?;

    debug!(
        duration_secs = duration,
        path = %path.display(),
        "probed media duration"
    );

    Ok(duration)
}

/// Resolve the duration from container metadata, falling back to the
/// longest stream when the container omits it (common for raw streams).
fn duration_from_output(probe: &FfprobeOutput) -> Option<f64> {
    let container = probe
        .format
        .duration
        .as_deref()
        .and_then(|d| d.parse::<f64>().ok())
        .filter(|d| *d > 0.0);

    if container.is_some() {
        return container;
    }

    probe
        .streams
        .iter()
        .filter(|s| {
            matches!(s.codec_type.as_deref(), Some("video") | Some("audio"))
        })
        .filter_map(|s| s.duration.as_deref().and_then(|d| d.parse::<f64>().ok()))
        .filter(|d| *d > 0.0)
        .fold(None, |acc: Option<f64>, d| {
            Some(acc.map_or(d, |a| a.max(d)))
        })
}
