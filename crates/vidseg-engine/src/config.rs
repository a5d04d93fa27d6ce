//! Engine configuration.

use std::time::Duration;

/// Options for one segmentation run.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Maximum extractions in flight at once. Deliberately small: each
    /// extraction holds a full decode+encode pipeline with real memory
    /// cost.
    pub max_parallel: usize,
    /// Pause between batches so the host event loop is not starved by
    /// back-to-back heavy pipelines.
    pub batch_pause: Duration,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            max_parallel: 2,
            batch_pause: Duration::from_millis(10),
        }
    }
}

impl EngineOptions {
    /// Create options from environment variables, falling back to
    /// defaults for anything unset or unparseable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_parallel: std::env::var("VIDSEG_MAX_PARALLEL")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(defaults.max_parallel),
            batch_pause: Duration::from_millis(
                std::env::var("VIDSEG_BATCH_PAUSE_MS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.batch_pause.as_millis() as u64),
            ),
        }
    }

    /// Override the parallelism bound. Values below 1 are clamped to 1.
    pub fn with_max_parallel(mut self, max_parallel: usize) -> Self {
        self.max_parallel = max_parallel.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = EngineOptions::default();
        assert_eq!(opts.max_parallel, 2);
        assert_eq!(opts.batch_pause, Duration::from_millis(10));
    }

    #[test]
    fn test_with_max_parallel_clamps() {
        let opts = EngineOptions::default().with_max_parallel(0);
        assert_eq!(opts.max_parallel, 1);
    }
}
