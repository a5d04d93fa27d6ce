//! The segmentation run: probe, plan, extract, assemble.

use tracing::{info, Instrument};
use uuid::Uuid;

use vidseg_media::CodecService;
use vidseg_models::{MediaSource, Segment, SegmentationPhase, SplitPolicy};

use crate::assembler::assemble;
use crate::config::EngineOptions;
use crate::error::SegmentationResult;
use crate::planner::plan;
use crate::reporter::ProgressReporter;
use crate::scheduler::run_windows;

pub use crate::reporter::ProgressCallback;

/// Split one media source into independently playable segments.
///
/// The run moves through Probing, Planning, Extracting and Assembling
/// before terminating at Complete or Failed; the callback receives a
/// monotonic snapshot at every transition and after every extraction
/// batch, the last one always carrying a terminal phase.
///
/// Only a probe failure or a catastrophic pipeline error rejects the
/// run. Per-window extraction failures shrink the result set, down to
/// the single whole-source fallback segment, never to an empty list.
pub async fn segment_video<S>(
    service: &S,
    source: &MediaSource,
    policy: SplitPolicy,
    options: &EngineOptions,
    on_progress: ProgressCallback,
) -> SegmentationResult<Vec<Segment>>
where
    S: CodecService + ?Sized,
{
    let run_id = Uuid::new_v4();
    let span = tracing::info_span!("segmentation", run_id = %run_id);

    async move {
        let mut reporter = ProgressReporter::new(on_progress);

        info!(
            path = %source.path.display(),
            byte_size = source.byte_size,
            ?policy,
            max_parallel = options.max_parallel,
            "segmentation run started"
        );

        reporter.emit(SegmentationPhase::Probing, 0, 0, 0);

        let total_duration = match service.probe(source).await {
            Ok(d) => d,
            Err(e) => {
                reporter.fail(e.to_string());
                return Err(e.into());
            }
        };

        reporter.emit(SegmentationPhase::Planning, 20, 0, 0);

        let windows = plan(total_duration, source.byte_size, policy);
        let total = windows.len() as u32;
        info!(total_duration, windows = total, "plan computed");

        reporter.emit(SegmentationPhase::Extracting, 25, 0, total);

        let outcomes = run_windows(
            service,
            source,
            &windows,
            policy.is_time_based(),
            options,
            &mut reporter,
        )
        .await;

        reporter.emit(SegmentationPhase::Assembling, 95, total, total);

        let (segments, degradation) = match assemble(outcomes, source, total_duration).await {
            Ok(assembled) => assembled,
            Err(e) => {
                reporter.fail(e.to_string());
                return Err(e);
            }
        };

        info!(
            segments = segments.len(),
            degraded = degradation.is_some(),
            "segmentation run finished"
        );

        reporter.emit_with_detail(SegmentationPhase::Complete, 100, total, total, degradation);

        Ok(segments)
    }
    .instrument(span)
    .await
}
