//! FFmpeg progress parsing.

use serde::{Deserialize, Serialize};

/// Progress information from FFmpeg's `-progress pipe:2` output.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FfmpegProgress {
    /// Current frame number
    pub frame: u64,
    /// Current FPS
    pub fps: f64,
    /// Output time in milliseconds
    pub out_time_ms: i64,
    /// Encoding speed (e.g., 1.5 = 1.5x realtime)
    pub speed: f64,
    /// Whether encoding is complete
    pub is_complete: bool,
}

impl FfmpegProgress {
    /// Calculate progress percentage given total duration in milliseconds.
    pub fn percentage(&self, total_duration_ms: i64) -> f64 {
        if total_duration_ms <= 0 {
            return 0.0;
        }
        ((self.out_time_ms as f64 / total_duration_ms as f64) * 100.0).min(100.0)
    }
}

/// Parse one line of FFmpeg's `-progress` output into `current`.
///
/// Returns a snapshot whenever a `progress=` line closes one block of
/// key=value pairs.
pub(crate) fn parse_progress_line(line: &str, current: &mut FfmpegProgress) -> Option<FfmpegProgress> {
    let line = line.trim();

    if let Some((key, value)) = line.split_once('=') {
        match key {
            "out_time_ms" | "out_time_us" => {
                // Both keys report microseconds in practice
                if let Ok(us) = value.parse::<i64>() {
                    current.out_time_ms = us / 1000;
                }
            }
            "frame" => {
                if let Ok(frame) = value.parse() {
                    current.frame = frame;
                }
            }
            "fps" => {
                if let Ok(fps) = value.parse() {
                    current.fps = fps;
                }
            }
            "speed" => {
                if value != "N/A" {
                    if let Some(speed_str) = value.strip_suffix('x') {
                        if let Ok(speed) = speed_str.parse() {
                            current.speed = speed;
                        }
                    }
                }
            }
            "progress" => {
                if value == "end" {
                    current.is_complete = true;
                }
                return Some(current.clone());
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_percentage() {
        let progress = FfmpegProgress {
            out_time_ms: 5000,
            ..Default::default()
        };

        assert!((progress.percentage(10000) - 50.0).abs() < 0.01);
        assert!((progress.percentage(5000) - 100.0).abs() < 0.01);
        assert!((progress.percentage(0)).abs() < 0.01);
    }

    #[test]
    fn test_progress_parsing() {
        let mut progress = FfmpegProgress::default();

        assert!(parse_progress_line("out_time_us=5000000", &mut progress).is_none());
        assert_eq!(progress.out_time_ms, 5000);

        assert!(parse_progress_line("speed=1.5x", &mut progress).is_none());
        assert!((progress.speed - 1.5).abs() < 0.01);

        let snapshot = parse_progress_line("progress=continue", &mut progress);
        assert!(snapshot.is_some());
        assert!(!progress.is_complete);

        let snapshot = parse_progress_line("progress=end", &mut progress);
        assert!(snapshot.is_some());
        assert!(progress.is_complete);
    }

    #[test]
    fn test_non_progress_lines_ignored() {
        let mut progress = FfmpegProgress::default();
        assert!(parse_progress_line("[libvpx-vp9 @ 0x55] some warning", &mut progress).is_none());
        assert!(parse_progress_line("", &mut progress).is_none());
    }
}
