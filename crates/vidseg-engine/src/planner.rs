//! Segment window planning.

use vidseg_models::{SegmentWindow, SplitPolicy};

/// Compute the ordered list of segment windows for a source.
///
/// Time-based policy: `count = ceil(total_duration / w)`, window `i`
/// spans `[i*w, min((i+1)*w, total_duration))`.
///
/// Size-based policy: `count = ceil(total_bytes / w)`, then the
/// duration is divided into `count` equal slices. Segment byte sizes
/// are therefore approximate: true byte-exact cuts would require
/// encoding first, so this assumes roughly uniform bitrate.
///
/// A zero duration (or a degenerate count) yields one window covering
/// the whole media, matching the assembler's fallback policy.
///
/// Pure and deterministic; no I/O.
pub fn plan(total_duration: f64, total_bytes: u64, policy: SplitPolicy) -> Vec<SegmentWindow> {
    if total_duration <= 0.0 {
        return vec![SegmentWindow::new(0, 0.0, total_duration.max(0.0))];
    }

    match policy {
        SplitPolicy::ByTime { window_seconds } => {
            let count = (total_duration / window_seconds).ceil() as u32;
            if count == 0 {
                return vec![SegmentWindow::new(0, 0.0, total_duration)];
            }
            (0..count)
                .map(|i| {
                    let start = i as f64 * window_seconds;
                    let end = ((i + 1) as f64 * window_seconds).min(total_duration);
                    SegmentWindow::new(i, start, end)
                })
                .collect()
        }
        SplitPolicy::BySize { window_bytes } => {
            let count = total_bytes.div_ceil(window_bytes) as u32;
            if count == 0 {
                return vec![SegmentWindow::new(0, 0.0, total_duration)];
            }
            let slice = total_duration / count as f64;
            let mut windows = Vec::with_capacity(count as usize);
            let mut current = 0.0;
            for i in 0..count {
                let end = if i == count - 1 {
                    // Last slice absorbs floating-point drift so the
                    // plan covers [0, total_duration] exactly.
                    total_duration
                } else {
                    (current + slice).min(total_duration)
                };
                windows.push(SegmentWindow::new(i, current, end));
                current = end;
            }
            windows
        }
    }
}
