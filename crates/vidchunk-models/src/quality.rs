//! Quality tiers and stream selection.
//!
//! A video is published as several encodings; each one is described by a
//! [`StreamDescriptor`]. [`select_stream`] picks the best descriptor at or
//! below a requested tier, preferring streams that carry an audio track.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// One entry in the ordered resolution ladder.
///
/// Variants are declared in ascending order so the derived `Ord` matches
/// the fallback order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Quality {
    #[serde(rename = "144p")]
    P144,
    #[serde(rename = "240p")]
    P240,
    #[serde(rename = "360p")]
    P360,
    #[serde(rename = "480p")]
    P480,
    #[serde(rename = "720p")]
    P720,
    #[serde(rename = "1080p")]
    P1080,
}

impl Quality {
    /// The supported tiers, lowest first.
    pub const LADDER: [Quality; 6] = [
        Quality::P144,
        Quality::P240,
        Quality::P360,
        Quality::P480,
        Quality::P720,
        Quality::P1080,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Quality::P144 => "144p",
            Quality::P240 => "240p",
            Quality::P360 => "360p",
            Quality::P480 => "480p",
            Quality::P720 => "720p",
            Quality::P1080 => "1080p",
        }
    }

    /// Map a frame height in pixels to a tier. Heights outside the ladder
    /// (e.g. 1440, 2160) have no tier and are skipped by the caller.
    pub fn from_height(height: u32) -> Option<Quality> {
        match height {
            144 => Some(Quality::P144),
            240 => Some(Quality::P240),
            360 => Some(Quality::P360),
            480 => Some(Quality::P480),
            720 => Some(Quality::P720),
            1080 => Some(Quality::P1080),
            _ => None,
        }
    }

    /// The next tier down the ladder, or `None` at the bottom.
    pub fn step_down(&self) -> Option<Quality> {
        let idx = Quality::LADDER.iter().position(|q| q == self)?;
        idx.checked_sub(1).map(|i| Quality::LADDER[i])
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Metadata describing one downloadable encoding of a video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamDescriptor {
    /// Downloader-side identifier for this encoding.
    pub format_id: String,
    /// Resolution tier.
    pub resolution: Quality,
    /// Container format (e.g. "mp4").
    pub container: String,
    /// Whether the stream carries an audio track.
    pub has_audio: bool,
}

/// Errors from stream selection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectError {
    #[error("no stream with audio at or below {requested}")]
    NoMatchingStream { requested: Quality },
}

/// Pick the stream to download for a requested tier.
///
/// Scans for an exact resolution match that also carries audio, stepping
/// down one tier at a time when nothing matches. No upward fallback is
/// attempted; below the lowest tier the selection fails.
pub fn select_stream(
    requested: Quality,
    streams: &[StreamDescriptor],
) -> Result<&StreamDescriptor, SelectError> {
    let mut tier = Some(requested);
    while let Some(q) = tier {
        if let Some(s) = streams
            .iter()
            .find(|s| s.resolution == q && s.has_audio)
        {
            return Ok(s);
        }
        tier = q.step_down();
    }
    Err(SelectError::NoMatchingStream { requested })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream(id: &str, resolution: Quality, has_audio: bool) -> StreamDescriptor {
        StreamDescriptor {
            format_id: id.to_string(),
            resolution,
            container: "mp4".to_string(),
            has_audio,
        }
    }

    #[test]
    fn test_exact_match_preferred() {
        let streams = vec![
            stream("22", Quality::P720, true),
            stream("18", Quality::P360, true),
        ];
        let s = select_stream(Quality::P720, &streams).unwrap();
        assert_eq!(s.format_id, "22");
    }

    #[test]
    fn test_steps_down_when_requested_missing() {
        // 480p+audio absent, 360p+audio present
        let streams = vec![
            stream("135", Quality::P480, false),
            stream("18", Quality::P360, true),
        ];
        let s = select_stream(Quality::P480, &streams).unwrap();
        assert_eq!(s.resolution, Quality::P360);
    }

    #[test]
    fn test_never_selects_above_requested() {
        let streams = vec![
            stream("22", Quality::P720, true),
            stream("137", Quality::P1080, true),
        ];
        let s = select_stream(Quality::P720, &streams).unwrap();
        assert!(s.resolution <= Quality::P720);

        // Only a higher tier available: selection fails rather than going up.
        let only_high = vec![stream("137", Quality::P1080, true)];
        assert_eq!(
            select_stream(Quality::P480, &only_high),
            Err(SelectError::NoMatchingStream {
                requested: Quality::P480
            })
        );
    }

    #[test]
    fn test_audio_required() {
        let streams = vec![
            stream("135", Quality::P480, false),
            stream("134", Quality::P360, false),
        ];
        assert!(select_stream(Quality::P480, &streams).is_err());
    }

    #[test]
    fn test_quality_tag_roundtrip() {
        let q: Quality = serde_json::from_str("\"480p\"").unwrap();
        assert_eq!(q, Quality::P480);
        assert_eq!(serde_json::to_string(&Quality::P1080).unwrap(), "\"1080p\"");
    }

    #[test]
    fn test_ladder_is_ascending() {
        for pair in Quality::LADDER.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }
}
