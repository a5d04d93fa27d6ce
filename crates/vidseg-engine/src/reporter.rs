//! Monotonic progress reporting.

use std::sync::Arc;

use vidseg_models::{SegmentationPhase, SegmentationProgress};

/// Callback invoked with progress snapshots during a run.
pub type ProgressCallback = Arc<dyn Fn(SegmentationProgress) + Send + Sync>;

/// Serializes progress updates for one run and enforces the monotonic
/// contract: `percent` and `completed_count` never decrease, and the
/// phase only moves forward (except the jump to `Failed`).
///
/// Batch completion is the scheduler's synchronization point, so
/// updates arrive serially; this type is not shared across tasks.
pub struct ProgressReporter {
    callback: ProgressCallback,
    last: SegmentationProgress,
}

impl ProgressReporter {
    pub fn new(callback: ProgressCallback) -> Self {
        Self {
            callback,
            last: SegmentationProgress::idle(),
        }
    }

    /// Emit a snapshot, clamped against everything emitted so far.
    pub fn emit(
        &mut self,
        phase: SegmentationPhase,
        percent: u8,
        completed_count: u32,
        total_count: u32,
    ) {
        self.emit_with_detail(phase, percent, completed_count, total_count, None);
    }

    /// Emit a snapshot carrying an error or degradation detail.
    pub fn emit_with_detail(
        &mut self,
        phase: SegmentationPhase,
        percent: u8,
        completed_count: u32,
        total_count: u32,
        error_detail: Option<String>,
    ) {
        let phase = if phase == SegmentationPhase::Failed {
            phase
        } else {
            phase.max(self.last.phase)
        };

        let snapshot = SegmentationProgress {
            percent: percent.max(self.last.percent).min(100),
            completed_count: completed_count.max(self.last.completed_count),
            total_count: total_count.max(self.last.total_count),
            phase,
            error_detail,
        };

        self.last = snapshot.clone();
        (self.callback)(snapshot);
    }

    /// Terminal failure snapshot.
    pub fn fail(&mut self, detail: impl Into<String>) {
        let snapshot = SegmentationProgress {
            phase: SegmentationPhase::Failed,
            error_detail: Some(detail.into()),
            ..self.last.clone()
        };
        self.last = snapshot.clone();
        (self.callback)(snapshot);
    }
}
