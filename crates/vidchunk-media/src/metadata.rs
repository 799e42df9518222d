//! Video metadata via yt-dlp.
//!
//! One `yt-dlp -J` probe per video yields the title, the total duration,
//! and the set of downloadable encodings. Downstream components work off
//! this result and never re-query the platform.

use std::process::Stdio;
use serde::Deserialize;
use tokio::process::Command;
use tracing::{debug, info};

use vidchunk_models::{Quality, StreamDescriptor};

use crate::command::check_ytdlp;
use crate::error::{MediaError, MediaResult};

/// Everything the pipeline needs to know about one video before download.
#[derive(Debug, Clone)]
pub struct VideoMetadata {
    pub title: String,
    /// Total duration in whole seconds.
    pub duration_secs: u64,
    /// Downloadable mp4 encodings mapped onto the quality ladder.
    pub streams: Vec<StreamDescriptor>,
}

/// yt-dlp `-J` JSON output (the fields we consume).
#[derive(Debug, Deserialize)]
struct YtDlpInfo {
    title: String,
    duration: Option<f64>,
    #[serde(default)]
    formats: Vec<YtDlpFormat>,
}

#[derive(Debug, Deserialize)]
struct YtDlpFormat {
    format_id: String,
    ext: Option<String>,
    height: Option<u32>,
    vcodec: Option<String>,
    acodec: Option<String>,
}

/// Fetch metadata for a video URL.
///
/// # Errors
///
/// - `VideoUnavailable` when the platform reports the video cannot be
///   fetched (removed, private, geo-blocked)
/// - `MetadataFailed` for any other yt-dlp or parse failure
pub async fn fetch_metadata(url: &str) -> MediaResult<VideoMetadata> {
    check_ytdlp()?;

    debug!(url = %url, "Fetching video metadata");

    let output = Command::new("yt-dlp")
        .args(["-J", "--no-playlist", url])
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        debug!("yt-dlp -J stderr: {}", stderr);

        if is_unavailable(&stderr) {
            return Err(MediaError::unavailable(url));
        }
        return Err(MediaError::metadata_failed(format!(
            "yt-dlp -J failed: {}",
            stderr.lines().last().unwrap_or("unknown error")
        )));
    }

    let info: YtDlpInfo = serde_json::from_slice(&output.stdout)?;
    let meta = parse_info(info)?;

    info!(
        title = %meta.title,
        duration_secs = meta.duration_secs,
        streams = meta.streams.len(),
        "Fetched video metadata"
    );

    Ok(meta)
}

/// Classify yt-dlp stderr as an unavailable-source failure.
pub(crate) fn is_unavailable(stderr: &str) -> bool {
    stderr.contains("Video unavailable")
        || stderr.contains("Private video")
        || stderr.contains("This video is not available")
        || stderr.contains("has been removed")
        || stderr.contains("not available in your country")
}

fn parse_info(info: YtDlpInfo) -> MediaResult<VideoMetadata> {
    let duration = info
        .duration
        .ok_or_else(|| MediaError::metadata_failed("no duration reported"))?;

    let streams = info
        .formats
        .into_iter()
        .filter_map(descriptor_from_format)
        .collect();

    Ok(VideoMetadata {
        title: info.title,
        duration_secs: duration.floor() as u64,
        streams,
    })
}

/// Map one yt-dlp format entry onto the quality ladder.
///
/// Audio-only formats, non-mp4 containers and heights outside the ladder
/// are dropped.
fn descriptor_from_format(f: YtDlpFormat) -> Option<StreamDescriptor> {
    let container = f.ext?;
    if container != "mp4" {
        return None;
    }
    if f.vcodec.as_deref().is_none_or(|v| v == "none") {
        return None;
    }
    let resolution = Quality::from_height(f.height?)?;
    let has_audio = f.acodec.as_deref().is_some_and(|a| a != "none");

    Some(StreamDescriptor {
        format_id: f.format_id,
        resolution,
        container,
        has_audio,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"{
        "title": "Test Video",
        "duration": 100.37,
        "formats": [
            {"format_id": "140", "ext": "m4a", "vcodec": "none", "acodec": "mp4a.40.2"},
            {"format_id": "134", "ext": "mp4", "height": 360, "vcodec": "avc1.4d401e", "acodec": "none"},
            {"format_id": "18", "ext": "mp4", "height": 360, "vcodec": "avc1.42001E", "acodec": "mp4a.40.2"},
            {"format_id": "135", "ext": "mp4", "height": 480, "vcodec": "avc1.4d401f", "acodec": "none"},
            {"format_id": "248", "ext": "webm", "height": 1080, "vcodec": "vp9", "acodec": "none"},
            {"format_id": "xx", "ext": "mp4", "height": 1440, "vcodec": "avc1", "acodec": "mp4a"}
        ]
    }"#;

    #[test]
    fn test_parse_fixture() {
        let info: YtDlpInfo = serde_json::from_str(FIXTURE).unwrap();
        let meta = parse_info(info).unwrap();

        assert_eq!(meta.title, "Test Video");
        assert_eq!(meta.duration_secs, 100);

        // audio-only, webm and off-ladder heights are dropped
        let ids: Vec<&str> = meta.streams.iter().map(|s| s.format_id.as_str()).collect();
        assert_eq!(ids, vec!["134", "18", "135"]);

        let s18 = meta.streams.iter().find(|s| s.format_id == "18").unwrap();
        assert!(s18.has_audio);
        assert_eq!(s18.resolution, Quality::P360);

        let s135 = meta.streams.iter().find(|s| s.format_id == "135").unwrap();
        assert!(!s135.has_audio);
        assert_eq!(s135.resolution, Quality::P480);
    }

    #[test]
    fn test_missing_duration_is_error() {
        let info: YtDlpInfo =
            serde_json::from_str(r#"{"title": "x", "formats": []}"#).unwrap();
        assert!(parse_info(info).is_err());
    }

    #[test]
    fn test_unavailable_classification() {
        assert!(is_unavailable("ERROR: [youtube] abc: Video unavailable"));
        assert!(is_unavailable("ERROR: [youtube] abc: Private video"));
        assert!(!is_unavailable("ERROR: unable to write data"));
    }

    #[test]
    fn test_fallback_scenario_selects_360p() {
        // 480p requested, only 360p carries audio
        let info: YtDlpInfo = serde_json::from_str(FIXTURE).unwrap();
        let meta = parse_info(info).unwrap();
        let chosen = vidchunk_models::select_stream(Quality::P480, &meta.streams).unwrap();
        assert_eq!(chosen.resolution, Quality::P360);
        assert_eq!(chosen.format_id, "18");
    }
}
