//! Splitting policies.

use serde::{Deserialize, Serialize};

/// How the source media is split into segments.
///
/// Created once per run and immutable afterwards. Both variants require
/// a strictly positive window; `SplitPolicy::by_time` and
/// `SplitPolicy::by_size` enforce this at construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", content = "value", rename_all = "snake_case")]
pub enum SplitPolicy {
    /// Fixed-duration windows, in seconds.
    ByTime { window_seconds: f64 },
    /// Target byte size per segment.
    ///
    /// Byte-accurate cuts would require encoding first, so the planner
    /// translates this into equal-duration slices assuming roughly
    /// uniform bitrate. The resulting segment sizes are approximate.
    BySize { window_bytes: u64 },
}

impl SplitPolicy {
    /// Create a time-based policy. Returns `None` unless `window_seconds > 0`.
    pub fn by_time(window_seconds: f64) -> Option<Self> {
        (window_seconds > 0.0 && window_seconds.is_finite())
            .then_some(Self::ByTime { window_seconds })
    }

    /// Create a size-based policy. Returns `None` unless `window_bytes > 0`.
    pub fn by_size(window_bytes: u64) -> Option<Self> {
        (window_bytes > 0).then_some(Self::BySize { window_bytes })
    }

    /// Whether this policy splits on time boundaries.
    pub fn is_time_based(&self) -> bool {
        matches!(self, Self::ByTime { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_window_required() {
        assert!(SplitPolicy::by_time(60.0).is_some());
        assert!(SplitPolicy::by_time(0.0).is_none());
        assert!(SplitPolicy::by_time(-1.0).is_none());
        assert!(SplitPolicy::by_time(f64::NAN).is_none());

        assert!(SplitPolicy::by_size(10 * 1024 * 1024).is_some());
        assert!(SplitPolicy::by_size(0).is_none());
    }

    #[test]
    fn test_serde_round_trip() {
        let policy = SplitPolicy::by_time(60.0).unwrap();
        let json = serde_json::to_string(&policy).unwrap();
        assert!(json.contains("by_time"));
        let back: SplitPolicy = serde_json::from_str(&json).unwrap();
        assert_eq!(back, policy);
    }
}
