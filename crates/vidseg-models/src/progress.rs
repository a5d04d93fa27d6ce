//! Segmentation progress snapshots.

use serde::{Deserialize, Serialize};

/// Phase of the segmentation state machine.
///
/// Phases advance strictly forward during one run; the only allowed
/// regression is the jump to `Failed`, which is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentationPhase {
    Idle,
    Probing,
    Planning,
    Extracting,
    Assembling,
    Complete,
    Failed,
}

impl SegmentationPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            SegmentationPhase::Idle => "idle",
            SegmentationPhase::Probing => "probing",
            SegmentationPhase::Planning => "planning",
            SegmentationPhase::Extracting => "extracting",
            SegmentationPhase::Assembling => "assembling",
            SegmentationPhase::Complete => "complete",
            SegmentationPhase::Failed => "failed",
        }
    }

    /// Whether the run has reached a terminal phase.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SegmentationPhase::Complete | SegmentationPhase::Failed)
    }
}

/// Snapshot delivered to the caller's progress callback.
///
/// Within one run `percent` and `completed_count` never decrease.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentationProgress {
    /// Overall progress, 0-100
    pub percent: u8,
    /// Windows settled so far (success or failure)
    pub completed_count: u32,
    /// Total planned windows (0 until planning finishes)
    pub total_count: u32,
    /// Current phase
    pub phase: SegmentationPhase,
    /// Present on `Failed`, or on `Complete` when the result is degraded
    /// (e.g. every window failed and the fallback segment was returned)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_detail: Option<String>,
}

impl SegmentationProgress {
    /// Snapshot for a run that has not started yet.
    pub fn idle() -> Self {
        Self {
            percent: 0,
            completed_count: 0,
            total_count: 0,
            phase: SegmentationPhase::Idle,
            error_detail: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_ordering() {
        assert!(SegmentationPhase::Idle < SegmentationPhase::Probing);
        assert!(SegmentationPhase::Probing < SegmentationPhase::Planning);
        assert!(SegmentationPhase::Planning < SegmentationPhase::Extracting);
        assert!(SegmentationPhase::Extracting < SegmentationPhase::Complete);
    }

    #[test]
    fn test_terminal_phases() {
        assert!(SegmentationPhase::Complete.is_terminal());
        assert!(SegmentationPhase::Failed.is_terminal());
        assert!(!SegmentationPhase::Extracting.is_terminal());
    }
}
