//! Engine-level errors.

use thiserror::Error;

use vidseg_media::ProbeError;

/// Result type for whole-run operations.
pub type SegmentationResult<T> = Result<T, SegmentationError>;

/// Errors that fail an entire segmentation run.
///
/// Per-window extraction failures never surface here; they only reduce
/// the size of the returned segment list (down to the single-segment
/// fallback, never to an empty list).
#[derive(Debug, Error)]
pub enum SegmentationError {
    /// Duration could not be resolved, so nothing could be planned.
    #[error("probe failed: {0}")]
    ProbeFailed(#[from] ProbeError),

    /// Failure outside the per-window scope, e.g. the fallback source
    /// read failing after every window failed.
    #[error("segmentation pipeline failed: {0}")]
    Catastrophic(String),
}
