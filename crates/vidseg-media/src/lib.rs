#![deny(unreachable_patterns)]
//! FFmpeg CLI wrapper providing the media codec service for vidseg.
//!
//! This crate provides:
//! - Type-safe FFmpeg command building
//! - Progress parsing from `-progress pipe:2`
//! - Timeout and abort support via tokio
//! - Duration probing via FFprobe
//! - Codec preference negotiation against the host FFmpeg build
//! - Per-window segment extraction with scoped scratch directories
//!
//! The [`CodecService`] trait is the seam between the segmentation
//! engine and the media backend: planning, scheduling and assembly
//! never touch FFmpeg directly, so the backend can be swapped for an
//! in-process library (or a test fake) without changing the engine.

pub mod codec;
pub mod command;
pub mod error;
pub mod extract;
pub mod probe;
pub mod progress;
pub mod service;

pub use codec::{select_candidate, CodecCandidate, CODEC_CANDIDATES};
pub use command::{check_ffmpeg, check_ffprobe, FfmpegCommand};
pub use error::{ExtractionFailure, ProbeError};
pub use extract::ExtractedPayload;
pub use probe::probe_duration;
pub use progress::FfmpegProgress;
pub use service::{CodecService, FfmpegCodecService};
