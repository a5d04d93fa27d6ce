//! The codec service seam between the engine and the media backend.

use std::collections::HashSet;
use async_trait::async_trait;
use tokio::sync::{watch, OnceCell};

use vidseg_models::{MediaSource, SegmentWindow};

use crate::error::{ExtractionFailure, ProbeError};
use crate::extract::{extract_window, ExtractedPayload};
use crate::probe::probe_duration;

/// Abstract media codec capabilities consumed by the segmentation
/// engine: metadata probing and per-window extraction.
///
/// Each extraction owns a private pipeline instance; implementations
/// must not share mutable decode/encode state between concurrent calls.
#[async_trait]
pub trait CodecService: Send + Sync {
    /// Resolve the total duration of the source in seconds.
    async fn probe(&self, source: &MediaSource) -> Result<f64, ProbeError>;

    /// Produce an encoded payload covering exactly one window.
    async fn extract(
        &self,
        source: &MediaSource,
        window: &SegmentWindow,
    ) -> Result<ExtractedPayload, ExtractionFailure>;
}

/// FFmpeg-subprocess implementation of [`CodecService`].
///
/// The host encoder set is enumerated once per service instance and
/// shared by all extractions.
pub struct FfmpegCodecService {
    encoders: OnceCell<HashSet<String>>,
    abort_rx: Option<watch::Receiver<bool>>,
}

impl Default for FfmpegCodecService {
    fn default() -> Self {
        Self::new()
    }
}

impl FfmpegCodecService {
    /// Create a new service.
    pub fn new() -> Self {
        Self {
            encoders: OnceCell::new(),
            abort_rx: None,
        }
    }

    /// Thread a caller-level abort signal through to every extraction.
    /// Raising it kills in-flight encode sessions; the affected windows
    /// resolve as failure outcomes.
    pub fn with_abort(mut self, abort_rx: watch::Receiver<bool>) -> Self {
        self.abort_rx = Some(abort_rx);
        self
    }

    async fn encoders(&self) -> Result<&HashSet<String>, ExtractionFailure> {
        self.encoders
            .get_or_try_init(crate::codec::available_encoders)
            .await
    }
}

#[async_trait]
impl CodecService for FfmpegCodecService {
    async fn probe(&self, source: &MediaSource) -> Result<f64, ProbeError> {
        probe_duration(source).await
    }

    async fn extract(
        &self,
        source: &MediaSource,
        window: &SegmentWindow,
    ) -> Result<ExtractedPayload, ExtractionFailure> {
        let encoders = self.encoders().await?;
        extract_window(source, window, encoders, self.abort_rx.clone()).await
    }
}
