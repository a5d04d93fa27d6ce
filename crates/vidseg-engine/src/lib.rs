//! Video segmentation engine.
//!
//! Takes one input media file and a splitting policy and produces an
//! ordered set of independently playable segments, each re-encoded from
//! the original media, with bounded parallelism, live progress
//! reporting and partial-failure tolerance.
//!
//! Control flow: [`segment_video`] probes the source duration, plans
//! segment windows, drives per-window extraction in bounded batches,
//! then assembles an ordered result set. Individual window failures
//! reduce the result set; only a probe failure (or a catastrophic
//! pipeline error) fails the whole run.

pub mod assembler;
pub mod config;
pub mod engine;
pub mod error;
pub mod planner;
pub mod reporter;
pub mod scheduler;

pub use config::EngineOptions;
pub use engine::{segment_video, ProgressCallback};
pub use error::{SegmentationError, SegmentationResult};
pub use planner::plan;
pub use scheduler::ExtractionOutcome;

// Re-export the types callers need to invoke the engine.
pub use vidseg_media::{CodecService, FfmpegCodecService};
pub use vidseg_models::{
    format_size, format_time, MediaSource, Segment, SegmentationPhase, SegmentationProgress,
    SegmentWindow, SplitPolicy,
};
