//! Error types for media operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for media operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// Errors that can occur while driving yt-dlp and ffmpeg.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("ffmpeg not found in PATH")]
    FfmpegNotFound,

    #[error("yt-dlp not found in PATH")]
    YtDlpNotFound,

    #[error("ffmpeg command failed: {message}")]
    FfmpegFailed {
        message: String,
        stderr: Option<String>,
        exit_code: Option<i32>,
    },

    #[error("metadata fetch failed: {message}")]
    MetadataFailed { message: String },

    #[error("download failed: {message}")]
    DownloadFailed { message: String },

    /// The platform reports the video cannot be fetched (removed, private,
    /// geo-blocked). Recoverable: the scheduler logs and skips.
    #[error("video unavailable: {url}")]
    VideoUnavailable { url: String },

    /// The configured exclusion zones and chunk length do not fit inside
    /// the source duration. Recoverable per video.
    #[error(
        "invalid chunk bounds: ignore_start {ignore_start}s + chunk {chunk_seconds}s + \
         ignore_end {ignore_end}s exceeds duration {duration}s"
    )]
    InvalidChunkBounds {
        duration: u64,
        ignore_start: u64,
        ignore_end: u64,
        chunk_seconds: u64,
    },

    #[error("file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl MediaError {
    /// Create an ffmpeg failure error.
    pub fn ffmpeg_failed(
        message: impl Into<String>,
        stderr: Option<String>,
        exit_code: Option<i32>,
    ) -> Self {
        Self::FfmpegFailed {
            message: message.into(),
            stderr,
            exit_code,
        }
    }

    /// Create a metadata failure error.
    pub fn metadata_failed(message: impl Into<String>) -> Self {
        Self::MetadataFailed {
            message: message.into(),
        }
    }

    /// Create a download failure error.
    pub fn download_failed(message: impl Into<String>) -> Self {
        Self::DownloadFailed {
            message: message.into(),
        }
    }

    /// Create a video-unavailable error.
    pub fn unavailable(url: impl Into<String>) -> Self {
        Self::VideoUnavailable { url: url.into() }
    }

    /// Whether this error should skip the current video rather than abort
    /// the whole run.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            MediaError::VideoUnavailable { .. } | MediaError::InvalidChunkBounds { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_classification() {
        assert!(MediaError::unavailable("https://youtu.be/x").is_recoverable());
        assert!(MediaError::InvalidChunkBounds {
            duration: 10,
            ignore_start: 5,
            ignore_end: 5,
            chunk_seconds: 10,
        }
        .is_recoverable());
        assert!(!MediaError::FfmpegNotFound.is_recoverable());
        assert!(!MediaError::download_failed("network reset").is_recoverable());
    }
}
