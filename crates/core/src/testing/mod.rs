//! Testing utilities and mock implementations.
//!
//! [`MockTranscoder`] stands in for [`crate::FfmpegTranscoder`] wherever a
//! [`crate::Transcoder`] is expected, so callers can be tested without ffmpeg
//! installed.
//!
//! # Example
//!
//! ```rust,ignore
//! use transcoder_core::testing::{fixtures, MockTranscoder};
//!
//! let transcoder = MockTranscoder::new();
//! transcoder.set_probe_result("in.mkv", fixtures::video_metadata("in.mkv", 60.0)).await;
//! ```

mod mock_transcoder;

pub use mock_transcoder::{MockTranscoder, RecordedTranscode};

/// Test fixtures and helper functions.
pub mod fixtures {
    use std::collections::HashMap;

    use crate::options::Options;
    use crate::transcoder::{Format, Metadata, Stream, TranscodeRequest};

    /// Create a request reading `input` and writing `output` with no other options.
    pub fn request(input: &str, output: &str) -> TranscodeRequest {
        TranscodeRequest::new(Options {
            inputs: vec![input.to_string()],
            ..Default::default()
        })
        .output(output)
    }

    /// Create metadata for a 1080p H.264 + AAC file.
    pub fn video_metadata(filename: &str, duration_secs: f64) -> Metadata {
        Metadata {
            format: Format {
                filename: Some(filename.to_string()),
                nb_streams: Some(2),
                format_name: Some("mov,mp4,m4a,3gp,3g2,mj2".to_string()),
                duration: Some(format!("{:.6}", duration_secs)),
                ..Default::default()
            },
            streams: vec![
                Stream {
                    index: 0,
                    codec_name: Some("h264".to_string()),
                    codec_type: Some("video".to_string()),
                    width: Some(1920),
                    height: Some(1080),
                    r_frame_rate: Some("30/1".to_string()),
                    ..Default::default()
                },
                Stream {
                    index: 1,
                    codec_name: Some("aac".to_string()),
                    codec_type: Some("audio".to_string()),
                    sample_rate: Some("48000".to_string()),
                    channels: Some(2),
                    tags: HashMap::from([("language".to_string(), "eng".to_string())]),
                    ..Default::default()
                },
            ],
        }
    }
}
