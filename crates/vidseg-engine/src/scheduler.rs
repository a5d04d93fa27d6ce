//! Bounded-parallel extraction scheduling.

use tracing::{debug, warn};

use vidseg_media::{CodecService, ExtractionFailure};
use vidseg_models::{MediaSource, Segment, SegmentationPhase, SegmentWindow};

use crate::config::EngineOptions;
use crate::reporter::ProgressReporter;

/// Per-window result, retained whether it succeeded or failed so the
/// assembler can account for partial completion.
#[derive(Debug)]
pub struct ExtractionOutcome {
    pub index: u32,
    pub result: Result<Segment, ExtractionFailure>,
}

/// Leading share of the progress range reserved for probing/planning.
const EXTRACT_PERCENT_BASE: u32 = 25;
/// Share of the progress range covered by extraction; the trailing 5%
/// belongs to assembly.
const EXTRACT_PERCENT_SPAN: u32 = 70;

/// Run all planned windows through the codec service in consecutive
/// batches of `max_parallel`, emitting progress after each batch.
///
/// The whole batch settles before the next one starts, capping peak
/// concurrent decode+encode pipelines at `max_parallel` regardless of
/// plan size. Failures within a batch are recorded, never propagated:
/// one bad window cannot abort the run.
pub async fn run_windows<S>(
    service: &S,
    source: &MediaSource,
    windows: &[SegmentWindow],
    time_based: bool,
    options: &EngineOptions,
    reporter: &mut ProgressReporter,
) -> Vec<ExtractionOutcome>
where
    S: CodecService + ?Sized,
{
    let total = windows.len() as u32;
    let max_parallel = options.max_parallel.max(1);
    let mut outcomes = Vec::with_capacity(windows.len());
    let mut processed: u32 = 0;

    for batch in windows.chunks(max_parallel) {
        debug!(batch_size = batch.len(), processed, total, "starting batch");

        let futures: Vec<_> = batch
            .iter()
            .map(|window| async move {
                let result = service
                    .extract(source, window)
                    .await
                    .map(|payload| {
                        Segment::from_window(window, payload.bytes, payload.extension, time_based)
                    });
                ExtractionOutcome {
                    index: window.index,
                    result,
                }
            })
            .collect();

        let batch_outcomes = futures::future::join_all(futures).await;

        for outcome in &batch_outcomes {
            if let Err(e) = &outcome.result {
                warn!(index = outcome.index, error = %e, "window extraction failed");
            }
        }
        processed += batch.len() as u32;
        outcomes.extend(batch_outcomes);

        reporter.emit(
            SegmentationPhase::Extracting,
            extraction_percent(processed, total),
            processed,
            total,
        );

        // Brief yield between batches so the host event loop is not
        // starved by back-to-back pipelines.
        if (processed as usize) < windows.len() {
            tokio::time::sleep(options.batch_pause).await;
        }
    }

    outcomes
}

/// Map settled-window counts into the 25..95 slice of the progress bar.
fn extraction_percent(processed: u32, total: u32) -> u8 {
    if total == 0 {
        return (EXTRACT_PERCENT_BASE + EXTRACT_PERCENT_SPAN) as u8;
    }
    (EXTRACT_PERCENT_BASE + EXTRACT_PERCENT_SPAN * processed / total) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extraction_percent_range() {
        assert_eq!(extraction_percent(0, 5), 25);
        assert_eq!(extraction_percent(2, 5), 53);
        assert_eq!(extraction_percent(5, 5), 95);
        assert_eq!(extraction_percent(0, 0), 95);
    }
}
