//! Mock transcoder for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};

use crate::transcoder::{
    Metadata, Progress, TranscodeOutput, TranscodeRequest, Transcoder, TranscoderError,
};

/// A recorded transcode for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedTranscode {
    /// The request that was submitted.
    pub request: TranscodeRequest,
    /// The argument list the request compiled to.
    pub args: Vec<String>,
    /// Whether the transcode succeeded.
    pub success: bool,
}

/// Mock implementation of the Transcoder trait.
///
/// Provides controllable behavior for testing:
/// - Track requests and their compiled arguments
/// - Simulate failures
/// - Control probe results
///
/// Requests are validated exactly like the real transcoder, so missing
/// inputs or outputs still fail with configuration errors.
///
/// # Example
///
/// ```rust,ignore
/// use transcoder_core::testing::MockTranscoder;
///
/// let transcoder = MockTranscoder::new();
/// transcoder.set_probe_result("in.mkv", metadata).await;
///
/// transcoder.start(&request).await?;
///
/// let recorded = transcoder.recorded_transcodes().await;
/// assert_eq!(recorded[0].args, ["-i", "in.mkv", "out.mp4"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockTranscoder {
    /// Recorded transcodes.
    transcodes: Arc<RwLock<Vec<RecordedTranscode>>>,
    /// Pre-configured probe results by input.
    probe_results: Arc<RwLock<HashMap<String, Metadata>>>,
    /// If set, the next operation will fail with this error.
    next_error: Arc<RwLock<Option<TranscoderError>>>,
    /// Output returned for successful transcodes.
    output: Arc<RwLock<Vec<u8>>>,
}

impl MockTranscoder {
    /// Create a new mock transcoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded transcodes.
    pub async fn recorded_transcodes(&self) -> Vec<RecordedTranscode> {
        self.transcodes.read().await.clone()
    }

    /// Get the number of transcodes attempted.
    pub async fn transcode_count(&self) -> usize {
        self.transcodes.read().await.len()
    }

    /// Clear recorded transcodes.
    pub async fn clear_recorded(&self) {
        self.transcodes.write().await.clear();
    }

    /// Set a probe result for a specific input.
    pub async fn set_probe_result(&self, input: impl Into<String>, metadata: Metadata) {
        self.probe_results
            .write()
            .await
            .insert(input.into(), metadata);
    }

    /// Configure the next operation to fail with the given error.
    pub async fn set_next_error(&self, error: TranscoderError) {
        *self.next_error.write().await = Some(error);
    }

    /// Set the bytes returned as captured output.
    pub async fn set_output(&self, output: impl Into<Vec<u8>>) {
        *self.output.write().await = output.into();
    }

    async fn take_error(&self) -> Option<TranscoderError> {
        self.next_error.write().await.take()
    }

    async fn record(&self, request: &TranscodeRequest, success: bool) {
        self.transcodes.write().await.push(RecordedTranscode {
            request: request.clone(),
            args: request.to_args(),
            success,
        });
    }
}

#[async_trait]
impl Transcoder for MockTranscoder {
    fn name(&self) -> &str {
        "mock"
    }

    async fn start(&self, request: &TranscodeRequest) -> Result<TranscodeOutput, TranscoderError> {
        request.validate()?;

        if let Some(err) = self.take_error().await {
            self.record(request, false).await;
            return Err(err);
        }

        self.record(request, true).await;

        Ok(TranscodeOutput {
            args: request.to_args(),
            output: self.output.read().await.clone(),
            duration_ms: 0,
        })
    }

    async fn start_with_progress(
        &self,
        request: &TranscodeRequest,
        progress_tx: mpsc::Sender<Progress>,
    ) -> Result<TranscodeOutput, TranscoderError> {
        let result = self.start(request).await?;

        let _ = progress_tx
            .send(Progress {
                progress: 100.0,
                ..Default::default()
            })
            .await;

        Ok(result)
    }

    async fn probe(&self, input: &str) -> Result<Metadata, TranscoderError> {
        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        self.probe_results
            .read()
            .await
            .get(input)
            .cloned()
            .ok_or_else(|| TranscoderError::ProbeError {
                code: -2,
                message: format!("{}: No such file or directory", input),
            })
    }
}
