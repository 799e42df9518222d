//! Video download using yt-dlp.
//!
//! Fetches one selected encoding into the output directory, named by the
//! video's title. The final on-disk path is taken from yt-dlp itself via
//! `--print after_move:filepath`, so title sanitization stays yt-dlp's
//! concern.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info};

use vidchunk_models::StreamDescriptor;

use crate::command::check_ytdlp;
use crate::error::{MediaError, MediaResult};
use crate::metadata::VideoMetadata;

/// A source file on disk with the metadata later stages need.
///
/// Owned by the scheduler until chunk extraction completes, then deleted.
#[derive(Debug, Clone)]
pub struct DownloadedVideo {
    pub path: PathBuf,
    pub title: String,
    /// Total duration in whole seconds, carried over from the metadata
    /// probe so extraction never has to re-query it.
    pub duration_secs: u64,
}

/// Download the selected stream of a video into `output_dir`.
///
/// # Errors
///
/// - `VideoUnavailable` when the platform reports the video cannot be
///   fetched; the scheduler recovers from this one
/// - `DownloadFailed` for any other yt-dlp failure
pub async fn download_video(
    url: &str,
    stream: &StreamDescriptor,
    meta: &VideoMetadata,
    output_dir: impl AsRef<Path>,
) -> MediaResult<DownloadedVideo> {
    check_ytdlp()?;

    let output_dir = output_dir.as_ref();
    let template = output_dir.join("%(title)s.%(ext)s");
    let template_str = template.to_string_lossy();

    info!(
        url = %url,
        title = %meta.title,
        format_id = %stream.format_id,
        resolution = %stream.resolution,
        "Downloading video"
    );

    let args = [
        "--no-playlist",
        "--no-progress",
        "-f",
        &stream.format_id,
        "-o",
        &template_str,
        // Print the final path after any move, so we don't have to guess
        // how yt-dlp sanitized the title.
        "--print",
        "after_move:filepath",
        "--no-simulate",
        url,
    ];

    let output = Command::new("yt-dlp")
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        debug!("yt-dlp stderr: {}", stderr);

        if crate::metadata::is_unavailable(&stderr) {
            return Err(MediaError::unavailable(url));
        }
        return Err(MediaError::download_failed(format!(
            "yt-dlp failed: {}",
            stderr.lines().last().unwrap_or("unknown error")
        )));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let path = stdout
        .lines()
        .rev()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .map(PathBuf::from)
        .ok_or_else(|| MediaError::download_failed("yt-dlp did not report an output path"))?;

    if !path.exists() {
        return Err(MediaError::FileNotFound(path));
    }

    let file_size = path.metadata()?.len();
    info!(
        output = %path.display(),
        size_mb = file_size as f64 / (1024.0 * 1024.0),
        "Downloaded video successfully"
    );

    Ok(DownloadedVideo {
        path,
        title: meta.title.clone(),
        duration_secs: meta.duration_secs,
    })
}
