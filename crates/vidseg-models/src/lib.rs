//! Shared data models for the vidseg segmentation engine.
//!
//! This crate provides Serde-serializable types for:
//! - Media sources and splitting policies
//! - Planned segment windows and produced segments
//! - Progress snapshots reported during a segmentation run

pub mod policy;
pub mod progress;
pub mod segment;
pub mod source;
pub mod utils;
pub mod window;

// Re-export common types
pub use policy::SplitPolicy;
pub use progress::{SegmentationPhase, SegmentationProgress};
pub use segment::Segment;
pub use source::MediaSource;
pub use utils::{format_size, format_time};
pub use window::SegmentWindow;
