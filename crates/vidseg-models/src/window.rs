//! Planned segment windows.

use serde::{Deserialize, Serialize};

/// A half-open time interval `[start_time, end_time)` of the source
/// media assigned to one output segment.
///
/// Windows produced by the planner are contiguous, non-overlapping and
/// together cover `[0, total_duration]`. That invariant holds by
/// construction; it is not re-checked at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmentWindow {
    /// Position of this window in the plan, starting at 0
    pub index: u32,
    /// Start time in seconds (inclusive)
    pub start_time: f64,
    /// End time in seconds (exclusive)
    pub end_time: f64,
}

impl SegmentWindow {
    /// Create a new window.
    pub fn new(index: u32, start_time: f64, end_time: f64) -> Self {
        Self {
            index,
            start_time,
            end_time,
        }
    }

    /// Window length in seconds.
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration() {
        let window = SegmentWindow::new(2, 120.0, 125.0);
        assert!((window.duration() - 5.0).abs() < f64::EPSILON);
    }
}
