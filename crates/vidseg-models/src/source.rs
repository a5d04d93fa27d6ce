//! Input media handle.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Immutable handle to the original input media.
///
/// The engine only borrows a `MediaSource` for the duration of one run;
/// it never mutates or removes the underlying file. The caller is
/// responsible for keeping the file in place until the run resolves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaSource {
    /// Path to the staged input file
    pub path: PathBuf,
    /// Declared MIME type (e.g. "video/mp4")
    pub content_type: String,
    /// File size in bytes
    pub byte_size: u64,
}

impl MediaSource {
    /// Create a new media source handle.
    pub fn new(path: impl AsRef<Path>, content_type: impl Into<String>, byte_size: u64) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            content_type: content_type.into(),
            byte_size,
        }
    }

    /// Create a media source from a file on disk, reading its size.
    pub fn from_file(path: impl AsRef<Path>, content_type: impl Into<String>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let byte_size = std::fs::metadata(path)?.len();
        Ok(Self::new(path, content_type, byte_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_file_reads_size() {
        let dir = std::env::temp_dir();
        let path = dir.join("vidseg-models-source-test.bin");
        std::fs::write(&path, b"0123456789").unwrap();

        let source = MediaSource::from_file(&path, "video/mp4").unwrap();
        assert_eq!(source.byte_size, 10);
        assert_eq!(source.content_type, "video/mp4");

        std::fs::remove_file(&path).ok();
    }
}
