//! End-to-end engine tests against a fake codec service.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use vidseg_engine::{
    segment_video, EngineOptions, MediaSource, SegmentationError, SegmentationPhase,
    SegmentationProgress, SplitPolicy,
};
use vidseg_media::{CodecService, ExtractedPayload, ExtractionFailure, ProbeError};
use vidseg_models::SegmentWindow;

/// In-memory codec service: fixed duration, per-index failures,
/// configurable latency, and an in-flight high-water mark.
struct FakeCodec {
    duration: Result<f64, ProbeError>,
    fail_indices: HashSet<u32>,
    delay_for: fn(u32) -> Duration,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeCodec {
    fn new(duration: f64) -> Self {
        Self {
            duration: Ok(duration),
            fail_indices: HashSet::new(),
            delay_for: |_| Duration::from_millis(5),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    fn failing(mut self, indices: impl IntoIterator<Item = u32>) -> Self {
        self.fail_indices = indices.into_iter().collect();
        self
    }

    fn with_delays(mut self, delay_for: fn(u32) -> Duration) -> Self {
        self.delay_for = delay_for;
        self
    }

    fn unreadable() -> Self {
        Self {
            duration: Err(ProbeError::Unreadable("not media".to_string())),
            ..Self::new(0.0)
        }
    }
}

#[async_trait]
impl CodecService for FakeCodec {
    async fn probe(&self, _source: &MediaSource) -> Result<f64, ProbeError> {
        self.duration.clone()
    }

    async fn extract(
        &self,
        _source: &MediaSource,
        window: &SegmentWindow,
    ) -> Result<ExtractedPayload, ExtractionFailure> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        tokio::time::sleep((self.delay_for)(window.index)).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.fail_indices.contains(&window.index) {
            return Err(ExtractionFailure::EmptyOutput);
        }

        Ok(ExtractedPayload {
            bytes: vec![window.index as u8; 8],
            extension: "webm".to_string(),
            content_type: "video/webm".to_string(),
        })
    }
}

fn collecting_callback() -> (
    vidseg_engine::ProgressCallback,
    Arc<Mutex<Vec<SegmentationProgress>>>,
) {
    let seen: Arc<Mutex<Vec<SegmentationProgress>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let callback: vidseg_engine::ProgressCallback = Arc::new(move |p| {
        sink.lock().unwrap().push(p);
    });
    (callback, seen)
}

fn source_stub() -> MediaSource {
    MediaSource::new("input.mp4", "video/mp4", 10 * 1024 * 1024)
}

#[tokio::test]
async fn five_windows_at_two_parallel_run_in_three_batches() {
    // 50s at 10s windows = 5 windows; max_parallel 2 => batches 2,2,1
    let codec = FakeCodec::new(50.0);
    let (callback, seen) = collecting_callback();
    let options = EngineOptions::default().with_max_parallel(2);
    let policy = SplitPolicy::by_time(10.0).unwrap();

    let segments = segment_video(&codec, &source_stub(), policy, &options, callback)
        .await
        .unwrap();

    assert_eq!(segments.len(), 5);
    assert!(codec.max_in_flight.load(Ordering::SeqCst) <= 2);

    let completed_during_extraction: Vec<u32> = seen
        .lock()
        .unwrap()
        .iter()
        .filter(|p| p.phase == SegmentationPhase::Extracting && p.completed_count > 0)
        .map(|p| p.completed_count)
        .collect();
    assert_eq!(completed_during_extraction, vec![2, 4, 5]);
}

#[tokio::test]
async fn segments_are_ordered_despite_uneven_completion() {
    // Earlier windows finish later within their batch
    let codec =
        FakeCodec::new(60.0).with_delays(|i| Duration::from_millis(20u64.saturating_sub(i as u64 * 5)));
    let (callback, _) = collecting_callback();
    let options = EngineOptions::default().with_max_parallel(4);
    let policy = SplitPolicy::by_time(15.0).unwrap();

    let segments = segment_video(&codec, &source_stub(), policy, &options, callback)
        .await
        .unwrap();

    let indices: Vec<u32> = segments.iter().map(|s| s.index).collect();
    assert_eq!(indices, vec![0, 1, 2, 3]);
    let ids: Vec<&str> = segments.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["segment-0", "segment-1", "segment-2", "segment-3"]);
}

#[tokio::test]
async fn partial_failures_shrink_the_result_set() {
    let codec = FakeCodec::new(125.0).failing([1]);
    let (callback, seen) = collecting_callback();
    let policy = SplitPolicy::by_time(60.0).unwrap();

    let segments = segment_video(&codec, &source_stub(), policy, &EngineOptions::default(), callback)
        .await
        .unwrap();

    assert_eq!(segments.len(), 2);
    assert_eq!(segments[0].index, 0);
    assert_eq!(segments[1].index, 2);

    // Partial failure is not degradation: terminal snapshot is clean
    let last = seen.lock().unwrap().last().unwrap().clone();
    assert_eq!(last.phase, SegmentationPhase::Complete);
    assert!(last.error_detail.is_none());
}

#[tokio::test]
async fn all_failures_fall_back_to_the_whole_source() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("input.mp4");
    tokio::fs::write(&path, b"full original payload").await.unwrap();
    let source = MediaSource::from_file(&path, "video/mp4").unwrap();

    let codec = FakeCodec::new(125.0).failing([0, 1, 2]);
    let (callback, seen) = collecting_callback();
    let policy = SplitPolicy::by_time(60.0).unwrap();

    let segments = segment_video(&codec, &source, policy, &EngineOptions::default(), callback)
        .await
        .unwrap();

    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].id, "segment-original");
    assert_eq!(segments[0].start_time, 0.0);
    assert_eq!(segments[0].end_time, 125.0);
    assert_eq!(segments[0].payload, b"full original payload");

    let last = seen.lock().unwrap().last().unwrap().clone();
    assert_eq!(last.phase, SegmentationPhase::Complete);
    assert!(last.error_detail.is_some(), "degradation must be signalled");
}

#[tokio::test]
async fn probe_failure_rejects_the_whole_run() {
    let codec = FakeCodec::unreadable();
    let (callback, seen) = collecting_callback();
    let policy = SplitPolicy::by_time(60.0).unwrap();

    let result =
        segment_video(&codec, &source_stub(), policy, &EngineOptions::default(), callback).await;

    assert!(matches!(result, Err(SegmentationError::ProbeFailed(_))));
    let last = seen.lock().unwrap().last().unwrap().clone();
    assert_eq!(last.phase, SegmentationPhase::Failed);
    assert!(last.error_detail.is_some());
}

#[tokio::test]
async fn progress_is_monotonic_and_phases_advance() {
    let codec = FakeCodec::new(300.0).failing([2, 5]);
    let (callback, seen) = collecting_callback();
    let options = EngineOptions::default().with_max_parallel(3);
    let policy = SplitPolicy::by_time(45.0).unwrap();

    segment_video(&codec, &source_stub(), policy, &options, callback)
        .await
        .unwrap();

    let snapshots = seen.lock().unwrap().clone();
    assert!(!snapshots.is_empty());

    for pair in snapshots.windows(2) {
        assert!(pair[1].percent >= pair[0].percent, "percent regressed");
        assert!(
            pair[1].completed_count >= pair[0].completed_count,
            "completed_count regressed"
        );
        assert!(pair[1].phase >= pair[0].phase, "phase regressed");
    }

    let last = snapshots.last().unwrap();
    assert_eq!(last.phase, SegmentationPhase::Complete);
    assert_eq!(last.percent, 100);
}

#[tokio::test]
async fn size_policy_labels_segments_by_size() {
    // 10 MiB source split at 4 MiB targets => 3 equal-duration slices
    let codec = FakeCodec::new(90.0);
    let (callback, _) = collecting_callback();
    let policy = SplitPolicy::by_size(4 * 1024 * 1024).unwrap();

    let segments = segment_video(&codec, &source_stub(), policy, &EngineOptions::default(), callback)
        .await
        .unwrap();

    assert_eq!(segments.len(), 3);
    for (i, segment) in segments.iter().enumerate() {
        assert!((segment.duration_seconds - 30.0).abs() < 1e-9);
        assert!(segment
            .display_name
            .starts_with(&format!("Segment {} (", i + 1)));
        // Size-based labels carry a byte size, not a time range
        assert!(segment.display_name.ends_with("B)"));
    }
}
