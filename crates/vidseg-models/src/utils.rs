//! Display formatting helpers shared across crates.

/// Format seconds as "mm:ss".
///
/// Minutes are not wrapped at 60, so 1h05 renders as "65:00".
pub fn format_time(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    let min = total / 60;
    let sec = total % 60;
    format!("{:02}:{:02}", min, sec)
}

/// Format a byte count as "N B", "N.N KB" or "N.N MB".
pub fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = 1024.0 * 1024.0;

    let bytes_f = bytes as f64;
    if bytes_f < KB {
        format!("{} B", bytes)
    } else if bytes_f < MB {
        format!("{:.1} KB", bytes_f / KB)
    } else {
        format!("{:.1} MB", bytes_f / MB)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0.0), "00:00");
        assert_eq!(format_time(59.9), "00:59");
        assert_eq!(format_time(60.0), "01:00");
        assert_eq!(format_time(125.0), "02:05");
        assert_eq!(format_time(3900.0), "65:00");
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0 MB");
    }
}
