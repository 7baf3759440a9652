//! Request and result types for the transcoder module.

use serde::{Deserialize, Serialize};

use crate::options::Options;

use super::error::TranscoderError;

/// One ffmpeg invocation: the option set plus where to write the result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TranscodeRequest {
    /// Parameters compiled into the command line.
    #[serde(default)]
    pub options: Options,
    /// Destination token appended after the compiled arguments.
    #[serde(default)]
    pub output: String,
}

impl TranscodeRequest {
    pub fn new(options: Options) -> Self {
        Self {
            options,
            output: String::new(),
        }
    }

    /// Sets the output destination (file path, URL or `pipe:1`).
    pub fn output(mut self, output: impl Into<String>) -> Self {
        self.output = output.into();
        self
    }

    /// Checks that the request names at least one input and a destination.
    pub fn validate(&self) -> Result<(), TranscoderError> {
        if self.options.inputs().is_empty() {
            return Err(TranscoderError::MissingInput);
        }

        if self.output.is_empty() {
            return Err(TranscoderError::MissingOutput);
        }

        Ok(())
    }

    /// Builds the full ffmpeg argument list: inputs, outputs, destination.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = self.options.compile_all();
        args.push(self.output.clone());
        args
    }
}

/// Outcome of a successful ffmpeg run.
#[derive(Debug, Clone)]
pub struct TranscodeOutput {
    /// Arguments ffmpeg was started with.
    pub args: Vec<String>,
    /// Everything the process wrote to stdout followed by stderr.
    pub output: Vec<u8>,
    /// Wall time of the run in milliseconds.
    pub duration_ms: u64,
}
