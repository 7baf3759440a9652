//! ffprobe metadata model.
//!
//! Mirrors the JSON printed by
//! `ffprobe -print_format json -show_format -show_streams -show_error`.
//! ffprobe prints most numbers as strings; they are kept verbatim and exposed
//! through typed helpers.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::error::TranscoderError;

/// Parsed result of probing one media resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default)]
    pub format: Format,
    #[serde(default)]
    pub streams: Vec<Stream>,
}

/// Container level information.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Format {
    pub filename: Option<String>,
    pub nb_streams: Option<u32>,
    pub nb_programs: Option<u32>,
    /// Comma separated demuxer names, e.g. `mov,mp4,m4a,3gp,3g2,mj2`.
    pub format_name: Option<String>,
    pub format_long_name: Option<String>,
    pub start_time: Option<String>,
    pub duration: Option<String>,
    pub size: Option<String>,
    pub bit_rate: Option<String>,
    pub probe_score: Option<u32>,
    pub tags: HashMap<String, String>,
}

impl Format {
    /// Duration in seconds.
    pub fn duration_secs(&self) -> Option<f64> {
        self.duration.as_deref().and_then(|d| d.parse().ok())
    }

    /// File size in bytes.
    pub fn size_bytes(&self) -> Option<u64> {
        self.size.as_deref().and_then(|s| s.parse().ok())
    }

    /// Overall bitrate in bits per second.
    pub fn bit_rate(&self) -> Option<u64> {
        self.bit_rate.as_deref().and_then(|b| b.parse().ok())
    }

    /// First demuxer name.
    pub fn primary_format_name(&self) -> Option<&str> {
        self.format_name.as_deref().and_then(|n| n.split(',').next())
    }
}

/// Per-stream information.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stream {
    pub index: u32,
    pub codec_name: Option<String>,
    pub codec_long_name: Option<String>,
    pub profile: Option<String>,
    /// `video`, `audio`, `subtitle`, `data` or `attachment`.
    pub codec_type: Option<String>,
    pub codec_tag_string: Option<String>,
    pub codec_tag: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub coded_width: Option<u32>,
    pub coded_height: Option<u32>,
    pub has_b_frames: Option<u32>,
    pub sample_aspect_ratio: Option<String>,
    pub display_aspect_ratio: Option<String>,
    pub pix_fmt: Option<String>,
    pub level: Option<i32>,
    pub color_range: Option<String>,
    pub color_space: Option<String>,
    pub field_order: Option<String>,
    pub refs: Option<u32>,
    pub sample_fmt: Option<String>,
    pub sample_rate: Option<String>,
    pub channels: Option<u32>,
    pub channel_layout: Option<String>,
    pub bits_per_sample: Option<u32>,
    pub r_frame_rate: Option<String>,
    pub avg_frame_rate: Option<String>,
    pub time_base: Option<String>,
    pub start_pts: Option<i64>,
    pub start_time: Option<String>,
    pub duration_ts: Option<u64>,
    pub duration: Option<String>,
    pub bit_rate: Option<String>,
    pub bits_per_raw_sample: Option<String>,
    pub nb_frames: Option<String>,
    pub disposition: Disposition,
    pub tags: HashMap<String, String>,
}

impl Stream {
    pub fn is_video(&self) -> bool {
        self.codec_type.as_deref() == Some("video")
    }

    pub fn is_audio(&self) -> bool {
        self.codec_type.as_deref() == Some("audio")
    }

    pub fn is_subtitle(&self) -> bool {
        self.codec_type.as_deref() == Some("subtitle")
    }

    /// Frame rate parsed from `r_frame_rate`, e.g. `24000/1001`.
    pub fn frame_rate(&self) -> Option<f64> {
        self.r_frame_rate.as_deref().and_then(parse_rational)
    }

    /// Average frame rate parsed from `avg_frame_rate`.
    pub fn avg_frame_rate(&self) -> Option<f64> {
        self.avg_frame_rate.as_deref().and_then(parse_rational)
    }

    pub fn duration_secs(&self) -> Option<f64> {
        self.duration.as_deref().and_then(|d| d.parse().ok())
    }

    pub fn bit_rate(&self) -> Option<u64> {
        self.bit_rate.as_deref().and_then(|b| b.parse().ok())
    }

    pub fn sample_rate(&self) -> Option<u32> {
        self.sample_rate.as_deref().and_then(|r| r.parse().ok())
    }

    /// Language tag, when the container carries one.
    pub fn language(&self) -> Option<&str> {
        self.tags.get("language").map(String::as_str)
    }
}

/// Stream disposition flags (0 or 1 each).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Disposition {
    pub default: u8,
    pub dub: u8,
    pub original: u8,
    pub comment: u8,
    pub lyrics: u8,
    pub karaoke: u8,
    pub forced: u8,
    pub hearing_impaired: u8,
    pub visual_impaired: u8,
    pub clean_effects: u8,
    pub attached_pic: u8,
    pub timed_thumbnails: u8,
}

/// Error object ffprobe prints with `-show_error`.
#[derive(Debug, Clone, Deserialize)]
struct ProbeErrorBody {
    code: i64,
    #[serde(default)]
    string: String,
}

#[derive(Debug, Deserialize)]
struct ProbeDocument {
    #[serde(default)]
    error: Option<ProbeErrorBody>,
    #[serde(flatten)]
    metadata: Metadata,
}

impl Metadata {
    /// Parses ffprobe JSON output.
    ///
    /// An `error` object in the document is reported as
    /// [`TranscoderError::ProbeError`].
    pub fn from_json(json: &str) -> Result<Self, TranscoderError> {
        let doc: ProbeDocument = serde_json::from_str(json)
            .map_err(|e| TranscoderError::metadata_parse(e.to_string()))?;

        if let Some(error) = doc.error {
            return Err(TranscoderError::ProbeError {
                code: error.code,
                message: error.string,
            });
        }

        Ok(doc.metadata)
    }

    pub fn video_streams(&self) -> impl Iterator<Item = &Stream> {
        self.streams.iter().filter(|s| s.is_video())
    }

    pub fn audio_streams(&self) -> impl Iterator<Item = &Stream> {
        self.streams.iter().filter(|s| s.is_audio())
    }

    pub fn subtitle_streams(&self) -> impl Iterator<Item = &Stream> {
        self.streams.iter().filter(|s| s.is_subtitle())
    }

    pub fn first_video_stream(&self) -> Option<&Stream> {
        self.video_streams().next()
    }

    pub fn first_audio_stream(&self) -> Option<&Stream> {
        self.audio_streams().next()
    }

    /// Container duration, falling back to the longest stream.
    pub fn duration_secs(&self) -> Option<f64> {
        self.format.duration_secs().or_else(|| {
            self.streams
                .iter()
                .filter_map(Stream::duration_secs)
                .fold(None, |max, d| Some(max.map_or(d, |m: f64| m.max(d))))
        })
    }
}

fn parse_rational(value: &str) -> Option<f64> {
    match value.split_once('/') {
        Some((num, den)) => {
            let num = num.parse::<f64>().ok()?;
            let den = den.parse::<f64>().ok()?;
            if den > 0.0 {
                Some(num / den)
            } else {
                None
            }
        }
        None => value.parse().ok(),
    }
}
