//! Error types for the transcoder module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while running ffmpeg or ffprobe.
#[derive(Debug, Error)]
pub enum TranscoderError {
    /// No ffmpeg binary configured.
    #[error("ffmpeg binary path not found")]
    MissingFfmpegPath,

    /// No ffprobe binary configured.
    #[error("ffprobe binary path not found")]
    MissingFfprobePath,

    /// The option set declares no input source.
    #[error("missing input option")]
    MissingInput,

    /// No output destination was given.
    #[error("missing output option")]
    MissingOutput,

    /// The binary could not be launched.
    #[error("binary not found at path: {path}")]
    BinaryNotFound { path: PathBuf },

    /// The process ran and exited unsuccessfully.
    #[error("failed running {binary} with args {args:?}: {reason}")]
    ExecutionFailed {
        binary: PathBuf,
        args: Vec<String>,
        reason: String,
        exit_code: Option<i32>,
        output: Vec<u8>,
    },

    /// The process exceeded the configured time limit and was killed.
    #[error("process timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// I/O error while talking to the child process.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// ffprobe printed something that is not valid metadata JSON.
    #[error("failed to parse media metadata: {reason}")]
    MetadataParse { reason: String },

    /// ffprobe reported an error for the input.
    #[error("ffprobe error {code}: {message}")]
    ProbeError { code: i64, message: String },
}

impl TranscoderError {
    /// Creates an execution failure carrying the captured output.
    pub fn execution_failed(
        binary: impl Into<PathBuf>,
        args: Vec<String>,
        reason: impl Into<String>,
        exit_code: Option<i32>,
        output: Vec<u8>,
    ) -> Self {
        Self::ExecutionFailed {
            binary: binary.into(),
            args,
            reason: reason.into(),
            exit_code,
            output,
        }
    }

    /// Creates a metadata parse error.
    pub fn metadata_parse(reason: impl Into<String>) -> Self {
        Self::MetadataParse {
            reason: reason.into(),
        }
    }

    /// Whether the request was rejected before any process was started.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::MissingFfmpegPath
                | Self::MissingFfprobePath
                | Self::MissingInput
                | Self::MissingOutput
        )
    }

    /// Whether ffprobe output could not be turned into metadata.
    pub fn is_metadata_error(&self) -> bool {
        matches!(self, Self::MetadataParse { .. } | Self::ProbeError { .. })
    }

    /// Output captured from a failed process, if any.
    pub fn output(&self) -> Option<&[u8]> {
        match self {
            Self::ExecutionFailed { output, .. } => Some(output),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_errors() {
        assert!(TranscoderError::MissingInput.is_configuration_error());
        assert!(TranscoderError::MissingOutput.is_configuration_error());
        assert!(TranscoderError::MissingFfmpegPath.is_configuration_error());
        assert!(!TranscoderError::Timeout { timeout_secs: 1 }.is_configuration_error());
    }

    #[test]
    fn test_execution_failure_keeps_output() {
        let err = TranscoderError::execution_failed(
            "ffmpeg",
            vec!["-i".to_string(), "in.mp4".to_string()],
            "exit status 1",
            Some(1),
            b"in.mp4: No such file or directory".to_vec(),
        );
        assert!(!err.is_configuration_error());
        assert_eq!(err.output(), Some(&b"in.mp4: No such file or directory"[..]));
        assert!(err.to_string().contains("exit status 1"));
    }

    #[test]
    fn test_metadata_errors() {
        assert!(TranscoderError::metadata_parse("eof").is_metadata_error());
        assert!(TranscoderError::ProbeError {
            code: -2,
            message: "No such file or directory".to_string()
        }
        .is_metadata_error());
        assert!(TranscoderError::MissingOutput.output().is_none());
    }
}
