//! Random chunk extraction.
//!
//! Each chunk is an independently-drawn fixed-length span of the source
//! video; overlapping or duplicate spans are acceptable. Extraction is a
//! stream copy (`-c copy`), no re-encoding.

use std::path::{Path, PathBuf};
use rand::Rng;
use tokio::fs;
use tracing::{info, warn};

use vidchunk_models::{chunk_filename, ChunkSpan};

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::download::DownloadedVideo;
use crate::error::{MediaError, MediaResult};

/// Extraction parameters, taken from the settings once per run.
#[derive(Debug, Clone, Copy)]
pub struct ChunkParams {
    /// Clips to cut per video.
    pub quantity: u32,
    /// Clip length in seconds.
    pub seconds: u64,
    /// Exclusion zone at the start of the source.
    pub ignore_start: u64,
    /// Exclusion zone at the end of the source.
    pub ignore_end: u64,
}

/// Draw `quantity` independent chunk spans within the allowed bounds.
///
/// Starts are uniform over the closed interval
/// `[ignore_start, duration - ignore_end - seconds]`. Bounds are validated
/// up front: when the exclusion zones plus the chunk length don't fit in
/// the duration, this fails with `InvalidChunkBounds` instead of drawing
/// from an inverted range.
pub fn plan_chunks(
    duration_secs: u64,
    params: &ChunkParams,
    rng: &mut impl Rng,
) -> MediaResult<Vec<ChunkSpan>> {
    let max_start = params
        .ignore_end
        .checked_add(params.seconds)
        .and_then(|tail| duration_secs.checked_sub(tail))
        .filter(|max| *max >= params.ignore_start)
        .ok_or(MediaError::InvalidChunkBounds {
            duration: duration_secs,
            ignore_start: params.ignore_start,
            ignore_end: params.ignore_end,
            chunk_seconds: params.seconds,
        })?;

    Ok((0..params.quantity)
        .map(|_| {
            let start = rng.random_range(params.ignore_start..=max_start);
            ChunkSpan::new(start, params.seconds)
        })
        .collect())
}

/// Plan the spans and destination paths for one source video.
///
/// Destinations are numbered 1-based: `"<stem> - CHUNK <n>.mp4"` inside
/// `output_dir`, where `<stem>` is the source filename without extension.
fn chunk_jobs(
    source: &DownloadedVideo,
    output_dir: &Path,
    params: &ChunkParams,
    rng: &mut impl Rng,
) -> MediaResult<Vec<(ChunkSpan, PathBuf)>> {
    let spans = plan_chunks(source.duration_secs, params, rng)?;

    let base_name = source
        .path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .ok_or_else(|| MediaError::FileNotFound(source.path.clone()))?;

    Ok(spans
        .into_iter()
        .enumerate()
        .map(|(i, span)| (span, output_dir.join(chunk_filename(&base_name, i as u32 + 1))))
        .collect())
}

/// Cut the configured number of random chunks out of a downloaded video,
/// then delete the source file.
///
/// A chunk that fails to extract is logged and the remaining chunks still
/// run; the source is removed unconditionally afterwards (no rollback).
/// Returns the paths of the clips that were produced.
pub async fn extract_chunks(
    source: &DownloadedVideo,
    output_dir: impl AsRef<Path>,
    params: &ChunkParams,
    rng: &mut impl Rng,
) -> MediaResult<Vec<PathBuf>> {
    let jobs = chunk_jobs(source, output_dir.as_ref(), params, rng)?;

    let runner = FfmpegRunner::new();
    let mut produced = Vec::with_capacity(jobs.len());

    for (i, (span, dest)) in jobs.into_iter().enumerate() {
        let n = i as u32 + 1;

        info!(
            source = %source.path.display(),
            chunk = n,
            "Extracting {}",
            span
        );

        let cmd = FfmpegCommand::new(&source.path, &dest)
            .seek(span.start)
            .duration(span.seconds())
            .codec_copy();

        match runner.run(&cmd).await {
            Ok(()) => produced.push(dest),
            Err(e) => warn!(chunk = n, "Chunk extraction failed: {}", e),
        }
    }

    // Cleanup, remove the original file even if some chunks failed.
    fs::remove_file(&source.path).await?;
    info!(
        source = %source.path.display(),
        clips = produced.len(),
        "Removed source file after extraction"
    );

    Ok(produced)
}
