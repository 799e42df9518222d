//! Application settings.
//!
//! Loaded once from a JSON file at startup, immutable thereafter, and
//! passed by reference into every component. When the config omits the
//! video list, it is read from a line-delimited text file instead.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use vidchunk_media::ChunkParams;
use vidchunk_models::Quality;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Video URLs to process, in order. Falls back to the videos file
    /// when absent from the config.
    pub videos: Option<Vec<String>>,
    /// Videos per batch.
    pub quantity: usize,
    /// Minutes to sleep between batches.
    pub frequency: u64,
    /// Where downloads and chunks are written.
    pub output_directory: PathBuf,
    /// Requested resolution tier.
    pub quality: Quality,
    /// Chunks to cut per video.
    pub chunk_quantity: u32,
    /// Chunk length in seconds.
    pub chunk_seconds: u64,
    /// Exclusion zone at the start of each source video.
    pub ignore_start_seconds: u64,
    /// Exclusion zone at the end of each source video.
    pub ignore_end_seconds: u64,
    /// Whether to sleep after the final batch as well. Defaults to true,
    /// matching the historical behavior.
    #[serde(default = "default_sleep_after_last")]
    pub sleep_after_last_batch: bool,
}

fn default_sleep_after_last() -> bool {
    true
}

impl Settings {
    /// Load settings from `config_path`, reading the video list from
    /// `videos_path` when the config has no `videos` key.
    pub fn load(config_path: &Path, videos_path: &Path) -> Result<Settings> {
        let raw = std::fs::read_to_string(config_path)
            .with_context(|| format!("failed to read config file {}", config_path.display()))?;
        let mut settings: Settings = serde_json::from_str(&raw)
            .with_context(|| format!("invalid config file {}", config_path.display()))?;

        if settings.videos.is_none() {
            let list = std::fs::read_to_string(videos_path).with_context(|| {
                format!(
                    "config has no \"videos\" key and the video list file {} could not be read",
                    videos_path.display()
                )
            })?;
            settings.videos = Some(
                list.lines()
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .map(String::from)
                    .collect(),
            );
        }

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.videos().is_empty() {
            bail!("video list is empty");
        }
        if self.quantity == 0 {
            bail!("quantity must be at least 1");
        }
        if self.chunk_quantity == 0 {
            bail!("chunk_quantity must be at least 1");
        }
        if self.chunk_seconds == 0 {
            bail!("chunk_seconds must be at least 1");
        }
        Ok(())
    }

    pub fn videos(&self) -> &[String] {
        self.videos.as_deref().unwrap_or_default()
    }

    pub fn chunk_params(&self) -> ChunkParams {
        ChunkParams {
            quantity: self.chunk_quantity,
            seconds: self.chunk_seconds,
            ignore_start: self.ignore_start_seconds,
            ignore_end: self.ignore_end_seconds,
        }
    }

    /// Pause between batches.
    pub fn batch_pause(&self) -> Duration {
        Duration::from_secs(self.frequency * 60)
    }
}
