//! yt-dlp and ffmpeg CLI wrappers for vidchunk.
//!
//! This crate provides:
//! - Metadata probing via `yt-dlp -J`
//! - Stream download for a selected format
//! - Type-safe FFmpeg command building
//! - Random chunk planning and extraction

pub mod clip;
pub mod command;
pub mod download;
pub mod error;
pub mod metadata;

pub use clip::{extract_chunks, plan_chunks, ChunkParams};
pub use command::{check_ffmpeg, check_ytdlp, FfmpegCommand, FfmpegRunner};
pub use download::{download_video, DownloadedVideo};
pub use error::{MediaError, MediaResult};
pub use metadata::{fetch_metadata, VideoMetadata};
