//! Codec preference negotiation.
//!
//! Extraction re-encodes each window, so the encoder pair must be
//! supported by the host FFmpeg build. Candidates are tried in
//! descending preference order; a build that supports none of them
//! yields `ExtractionFailure::NoSupportedCodec`.

use std::collections::HashSet;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

use crate::error::ExtractionFailure;

/// One encoder pair plus its container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecCandidate {
    /// Short name used in logs
    pub name: &'static str,
    /// FFmpeg video encoder
    pub video_codec: &'static str,
    /// FFmpeg audio encoder
    pub audio_codec: &'static str,
    /// Output container / file extension
    pub container: &'static str,
    /// MIME type of the produced payload
    pub content_type: &'static str,
}

/// Descending preference order: VP9+Opus, VP8+Opus, plain WebM, MP4.
pub const CODEC_CANDIDATES: [CodecCandidate; 4] = [
    CodecCandidate {
        name: "vp9-opus",
        video_codec: "libvpx-vp9",
        audio_codec: "libopus",
        container: "webm",
        content_type: "video/webm",
    },
    CodecCandidate {
        name: "vp8-opus",
        video_codec: "libvpx",
        audio_codec: "libopus",
        container: "webm",
        content_type: "video/webm",
    },
    CodecCandidate {
        name: "webm",
        video_codec: "libvpx",
        audio_codec: "libvorbis",
        container: "webm",
        content_type: "video/webm",
    },
    CodecCandidate {
        name: "mp4",
        video_codec: "libx264",
        audio_codec: "aac",
        container: "mp4",
        content_type: "video/mp4",
    },
];

/// Pick the most preferred candidate whose encoders are both available.
pub fn select_candidate(available: &HashSet<String>) -> Option<&'static CodecCandidate> {
    CODEC_CANDIDATES
        .iter()
        .find(|c| available.contains(c.video_codec) && available.contains(c.audio_codec))
}

/// Query the host FFmpeg build for its encoder set.
pub(crate) async fn available_encoders() -> Result<HashSet<String>, ExtractionFailure> {
    which::which("ffmpeg").map_err(|_| ExtractionFailure::NoSupportedCodec)?;

    let output = Command::new("ffmpeg")
        .args(["-hide_banner", "-encoders"])
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .output()
        .await?;

    if !output.status.success() {
        return Err(ExtractionFailure::EncodeSessionError(
            "ffmpeg -encoders failed".to_string(),
        ));
    }

    let encoders = parse_encoder_list(&String::from_utf8_lossy(&output.stdout));
    debug!(count = encoders.len(), "enumerated ffmpeg encoders");
    Ok(encoders)
}

/// Parse `ffmpeg -encoders` output into encoder names.
///
/// Lines look like ` V....D libx264   H.264 / AVC ...` after a
/// `------` separator; the second column is the encoder name.
fn parse_encoder_list(output: &str) -> HashSet<String> {
    output
        .lines()
        .skip_while(|line| !line.trim_start().starts_with("------"))
        .skip(1)
        .filter_map(|line| line.split_whitespace().nth(1))
        .map(|name| name.to_string())
        .collect()
}
