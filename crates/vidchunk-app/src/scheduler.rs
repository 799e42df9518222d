//! The batch loop.
//!
//! Works through the configured video list in consecutive batches,
//! strictly sequentially: one download and one extraction run to
//! completion before the next begins. Unavailable videos are logged and
//! skipped; anything else aborts the run.

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{info, warn};

use vidchunk_media::{
    download_video, extract_chunks, fetch_metadata, ChunkParams, MediaError, MediaResult,
};
use vidchunk_models::select_stream;

use crate::config::Settings;

/// Process every configured video exactly once, sleeping between batches.
pub async fn run(settings: &Settings) -> Result<()> {
    let params = settings.chunk_params();
    let videos = settings.videos();
    let batch_count = batches(videos, settings.quantity).count();

    for (index, batch) in batches(videos, settings.quantity).enumerate() {
        info!(
            batch = index + 1,
            of = batch_count,
            size = batch.len(),
            "Starting batch"
        );

        // Re-seed per batch from wall-clock time so restarts vary the
        // drawn offsets. Not cryptographic.
        let mut rng = StdRng::seed_from_u64(wall_clock_seed());

        for url in batch {
            match process_video(url, settings, &params, &mut rng).await {
                Ok(clips) => {
                    info!(url = %url, clips = clips.len(), "Finished video");
                }
                Err(e) if e.is_recoverable() => {
                    warn!(url = %url, "Skipping video: {}", e);
                }
                Err(e) => {
                    return Err(e).with_context(|| format!("failed while processing {url}"));
                }
            }
        }

        let is_last = index + 1 == batch_count;
        if !is_last || settings.sleep_after_last_batch {
            info!("Sleeping for {} minutes...", settings.frequency);
            tokio::time::sleep(settings.batch_pause()).await;
        }
    }

    Ok(())
}

/// Download one video at the best matching quality and cut chunks out of it.
async fn process_video(
    url: &str,
    settings: &Settings,
    params: &ChunkParams,
    rng: &mut impl Rng,
) -> MediaResult<Vec<PathBuf>> {
    let meta = fetch_metadata(url).await?;

    // No stream with audio at or below the requested tier is treated the
    // same as an unavailable video: logged and skipped.
    let stream = select_stream(settings.quality, &meta.streams)
        .map_err(|_| MediaError::unavailable(url))?;

    if stream.resolution != settings.quality {
        info!(
            requested = %settings.quality,
            selected = %stream.resolution,
            "Video + audio not available at requested quality, stepping down"
        );
    }

    let video = download_video(url, stream, &meta, &settings.output_directory).await?;
    extract_chunks(&video, &settings.output_directory, params, rng).await
}

/// Partition the video list into consecutive batches of `quantity`.
fn batches(videos: &[String], quantity: usize) -> impl Iterator<Item = &[String]> {
    videos.chunks(quantity.max(1))
}

fn wall_clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_partitioning() {
        let videos: Vec<String> = (0..5).map(|i| format!("v{i}")).collect();

        let sizes: Vec<usize> = batches(&videos, 2).map(|b| b.len()).collect();
        assert_eq!(sizes, vec![2, 2, 1]);

        // batch larger than the list yields a single batch
        let sizes: Vec<usize> = batches(&videos, 10).map(|b| b.len()).collect();
        assert_eq!(sizes, vec![5]);
    }

    #[test]
    fn test_batches_preserve_order() {
        let videos: Vec<String> = (0..5).map(|i| format!("v{i}")).collect();
        let flat: Vec<&String> = batches(&videos, 2).flatten().collect();
        assert_eq!(flat, videos.iter().collect::<Vec<_>>());
    }
}
