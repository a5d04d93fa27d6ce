//! Produced segments.

use serde::{Deserialize, Serialize};

use crate::utils::{format_size, format_time};
use crate::window::SegmentWindow;

/// Identifier of the whole-source fallback segment.
pub const FALLBACK_SEGMENT_ID: &str = "segment-original";

/// One independently playable output produced from one window.
///
/// A segment exclusively owns its encoded payload until handed to the
/// caller; the engine does not retain or reuse it afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    /// Deterministic id derived from the window index ("segment-<index>"),
    /// so ordering can be recovered even when results arrive out of order
    pub id: String,
    /// Window index this segment was produced from
    pub index: u32,
    /// Encoded media bytes
    #[serde(skip)]
    pub payload: Vec<u8>,
    /// Start time in seconds within the source
    pub start_time: f64,
    /// End time in seconds within the source
    pub end_time: f64,
    /// Segment length in seconds
    pub duration_seconds: f64,
    /// Encoded payload size in bytes
    pub byte_size: u64,
    /// Human-readable label for presentation
    pub display_name: String,
    /// File extension of the encoded container (e.g. "webm", "mp4")
    pub extension: String,
}

impl Segment {
    /// Build a segment from an extracted window payload.
    ///
    /// The display name depends on the splitting policy: time-based runs
    /// label segments with their time range, size-based runs with the
    /// encoded size.
    pub fn from_window(
        window: &SegmentWindow,
        payload: Vec<u8>,
        extension: impl Into<String>,
        time_based: bool,
    ) -> Self {
        let byte_size = payload.len() as u64;
        let display_name = if time_based {
            format!(
                "Segment {} ({} - {})",
                window.index + 1,
                format_time(window.start_time),
                format_time(window.end_time)
            )
        } else {
            format!("Segment {} ({})", window.index + 1, format_size(byte_size))
        };

        Self {
            id: format!("segment-{}", window.index),
            index: window.index,
            payload,
            start_time: window.start_time,
            end_time: window.end_time,
            duration_seconds: window.duration(),
            byte_size,
            display_name,
            extension: extension.into(),
        }
    }
}
