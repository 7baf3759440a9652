//! Job files: a TOML description of one transcode.
//!
//! ```toml
//! output = "out.mp4"
//!
//! [options]
//! inputs = ["in.mkv"]
//! video_codec = "libx264"
//! crf = 23
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use transcoder_core::TranscodeRequest;

/// Reads a job file, optionally replacing its output destination.
pub fn load_job(path: &Path, output: Option<&str>) -> Result<TranscodeRequest> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read job file {:?}", path))?;

    let mut request: TranscodeRequest = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse job file {:?}", path))?;

    if let Some(output) = output {
        request.output = output.to_string();
    }

    Ok(request)
}
