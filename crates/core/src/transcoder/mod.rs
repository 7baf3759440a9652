//! Running ffmpeg and ffprobe.
//!
//! This module provides the [`Transcoder`] trait and the process-backed
//! [`FfmpegTranscoder`]. A request is checked before anything is spawned:
//! the ffmpeg path must be configured, the option set must declare at least
//! one input, and an output destination must be given. The command line is
//! the compiled option set followed by the destination.
//!
//! # Example
//!
//! ```ignore
//! use transcoder_core::{FfmpegTranscoder, Options, TranscodeRequest, Transcoder, TranscoderConfig};
//!
//! let transcoder = FfmpegTranscoder::new(TranscoderConfig::default());
//!
//! // Probe a media file
//! let metadata = transcoder.probe("/path/to/input.mkv").await?;
//! println!("Duration: {:?} seconds", metadata.duration_secs());
//!
//! // Re-encode the video track
//! let request = TranscodeRequest::new(Options {
//!     inputs: vec!["/path/to/input.mkv".to_string()],
//!     video_codec: Some("libx264".to_string()),
//!     crf: Some(23),
//!     overwrite: Some(true),
//!     ..Default::default()
//! })
//! .output("/path/to/output.mp4");
//!
//! let result = transcoder.start(&request).await?;
//! println!("Finished in {} ms", result.duration_ms);
//! ```

mod error;
mod ffmpeg;
mod metadata;
mod progress;
mod traits;
mod types;

pub use error::TranscoderError;
pub use ffmpeg::{probe_args, FfmpegTranscoder};
pub use metadata::{Disposition, Format, Metadata, Stream};
pub use progress::{parse_timestamp, Progress, ProgressParser};
pub use traits::Transcoder;
pub use types::{TranscodeOutput, TranscodeRequest};
