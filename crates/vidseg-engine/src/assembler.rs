//! Result assembly: ordering, fallback, labeling.

use tracing::{info, warn};

use vidseg_models::{format_size, segment::FALLBACK_SEGMENT_ID, MediaSource, Segment};

use crate::error::{SegmentationError, SegmentationResult};
use crate::scheduler::ExtractionOutcome;

/// Assemble the final segment list from per-window outcomes.
///
/// Successful segments are sorted ascending by plan index, restoring
/// order even though batches settle out of submission order. If no
/// window succeeded, a single whole-source segment is synthesized so
/// the caller always receives at least one usable result; the returned
/// detail string describes the degradation for the terminal progress
/// snapshot.
pub async fn assemble(
    outcomes: Vec<ExtractionOutcome>,
    source: &MediaSource,
    total_duration: f64,
) -> SegmentationResult<(Vec<Segment>, Option<String>)> {
    let total = outcomes.len();
    let mut segments: Vec<Segment> = outcomes
        .into_iter()
        .filter_map(|o| o.result.ok())
        .collect();
    segments.sort_by_key(|s| s.index);

    if !segments.is_empty() {
        if segments.len() < total {
            info!(
                produced = segments.len(),
                planned = total,
                "assembled partial segment set"
            );
        }
        return Ok((segments, None));
    }

    warn!(
        planned = total,
        "every window failed; falling back to the whole source"
    );

    let payload = tokio::fs::read(&source.path).await.map_err(|e| {
        SegmentationError::Catastrophic(format!(
            "fallback read of {} failed: {e}",
            source.path.display()
        ))
    })?;

    let byte_size = payload.len() as u64;
    let fallback = Segment {
        id: FALLBACK_SEGMENT_ID.to_string(),
        index: 0,
        payload,
        start_time: 0.0,
        end_time: total_duration,
        duration_seconds: total_duration,
        byte_size,
        display_name: format!("Full Video ({})", format_size(byte_size)),
        extension: extension_of(source),
    };

    let detail = format!(
        "all {total} planned windows failed; returning the original media as a single segment"
    );
    Ok((vec![fallback], Some(detail)))
}

/// Extension for the fallback payload, which is the source bytes
/// unmodified.
fn extension_of(source: &MediaSource) -> String {
    source
        .path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_else(|| "bin".to_string())
}
