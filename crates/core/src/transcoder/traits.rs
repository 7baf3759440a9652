//! Trait definitions for the transcoder module.

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::error::TranscoderError;
use super::metadata::Metadata;
use super::progress::Progress;
use super::types::{TranscodeOutput, TranscodeRequest};

/// Runs transcodes and probes media through external binaries.
#[async_trait]
pub trait Transcoder: Send + Sync {
    /// Returns the name of this transcoder implementation.
    fn name(&self) -> &str;

    /// Runs one transcode to completion and returns the captured output.
    async fn start(&self, request: &TranscodeRequest) -> Result<TranscodeOutput, TranscoderError>;

    /// Runs one transcode, sending progress updates as they are parsed.
    ///
    /// Updates are dropped when the channel is full or closed; the transcode
    /// itself is unaffected.
    async fn start_with_progress(
        &self,
        request: &TranscodeRequest,
        progress_tx: mpsc::Sender<Progress>,
    ) -> Result<TranscodeOutput, TranscoderError>;

    /// Probes a media resource for its format and streams.
    async fn probe(&self, input: &str) -> Result<Metadata, TranscoderError>;
}
