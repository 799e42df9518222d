//! Chunk spans and destination filenames.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A trimmed segment of a source video, in whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkSpan {
    pub start: u64,
    pub end: u64,
}

impl ChunkSpan {
    pub fn new(start: u64, seconds: u64) -> Self {
        Self {
            start,
            end: start.saturating_add(seconds),
        }
    }

    pub fn seconds(&self) -> u64 {
        self.end - self.start
    }
}

impl fmt::Display for ChunkSpan {
    /// Renders as `MM:SS - MM:SS`, matching the extraction log lines.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02} - {:02}:{:02}",
            self.start / 60,
            self.start % 60,
            self.end / 60,
            self.end % 60
        )
    }
}

/// Destination filename for chunk number `n` (1-based) of a source file,
/// `<base-name> - CHUNK <n>.mp4` where `base_name` is the source filename
/// with its extension stripped.
pub fn chunk_filename(base_name: &str, n: u32) -> String {
    format!("{} - CHUNK {}.mp4", base_name, n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_display_is_mm_ss() {
        let span = ChunkSpan::new(65, 30);
        assert_eq!(span.to_string(), "01:05 - 01:35");
    }

    #[test]
    fn test_span_seconds() {
        assert_eq!(ChunkSpan::new(10, 15).seconds(), 15);
    }

    #[test]
    fn test_span_end_saturates() {
        let span = ChunkSpan::new(u64::MAX - 5, 10);
        assert_eq!(span.end, u64::MAX);
    }

    #[test]
    fn test_chunk_filename_format() {
        assert_eq!(
            chunk_filename("My Video", 1),
            "My Video - CHUNK 1.mp4"
        );
        assert_eq!(
            chunk_filename("clip.v2", 12),
            "clip.v2 - CHUNK 12.mp4"
        );
    }
}
