//! Error types for media operations.

use thiserror::Error;

/// Errors from the metadata probe stage.
///
/// A probe failure always aborts the whole segmentation run, since the
/// duration is a prerequisite for planning.
#[derive(Debug, Clone, Error)]
pub enum ProbeError {
    #[error("source is not readable as media: {0}")]
    Unreadable(String),

    #[error("metadata did not resolve within {0} seconds")]
    Timeout(u64),
}

/// Per-window extraction failures.
///
/// All variants are recoverable at the scheduler level: the window is
/// dropped from the result set and extraction of other windows
/// continues.
#[derive(Debug, Clone, Error)]
pub enum ExtractionFailure {
    #[error("seek to window start failed: {0}")]
    SeekFailed(String),

    #[error("no supported codec among the preference list")]
    NoSupportedCodec,

    #[error("encode session failed: {0}")]
    EncodeSessionError(String),

    #[error("encode session produced no output")]
    EmptyOutput,

    #[error("extraction timed out after {0} seconds")]
    Timeout(u64),

    #[error("extraction aborted by caller")]
    Aborted,
}

impl From<std::io::Error> for ExtractionFailure {
    fn from(e: std::io::Error) -> Self {
        Self::EncodeSessionError(e.to_string())
    }
}
