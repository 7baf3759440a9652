//! ffmpeg/ffprobe process implementation.

use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use std::time::Instant;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::sync::mpsc;
use tokio::time::{timeout, Duration};
use tracing::{debug, info, warn};

use crate::config::TranscoderConfig;

use super::error::TranscoderError;
use super::metadata::Metadata;
use super::progress::{Progress, ProgressParser};
use super::traits::Transcoder;
use super::types::{TranscodeOutput, TranscodeRequest};

/// Transcoder that shells out to the configured ffmpeg and ffprobe binaries.
pub struct FfmpegTranscoder {
    config: TranscoderConfig,
}

impl FfmpegTranscoder {
    /// Creates a new transcoder with the given configuration.
    pub fn new(config: TranscoderConfig) -> Self {
        Self { config }
    }

    /// Creates a transcoder using `ffmpeg` and `ffprobe` from `PATH`.
    pub fn with_defaults() -> Self {
        Self::new(TranscoderConfig::default())
    }

    pub fn config(&self) -> &TranscoderConfig {
        &self.config
    }

    /// Checks that both binaries can be launched.
    pub async fn validate(&self) -> Result<(), TranscoderError> {
        for path in [&self.config.ffmpeg_path, &self.config.ffprobe_path] {
            Command::new(path)
                .arg("-version")
                .stdin(Stdio::null())
                .output()
                .await
                .map_err(|e| spawn_error(e, path))?;
        }
        Ok(())
    }

    fn check_request(&self, request: &TranscodeRequest) -> Result<(), TranscoderError> {
        if self.config.ffmpeg_path.as_os_str().is_empty() {
            return Err(TranscoderError::MissingFfmpegPath);
        }
        request.validate()
    }

    /// Duration of the first input, used to turn output time into a percentage.
    async fn input_duration(&self, request: &TranscodeRequest) -> Option<f64> {
        if self.config.ffprobe_path.as_os_str().is_empty() {
            return None;
        }
        let input = request.options.inputs().first()?;
        match self.probe(input).await {
            Ok(metadata) => metadata.duration_secs(),
            Err(e) => {
                debug!("Could not probe {} for progress: {}", input, e);
                None
            }
        }
    }

    async fn run(
        &self,
        request: &TranscodeRequest,
        progress_tx: Option<mpsc::Sender<Progress>>,
    ) -> Result<TranscodeOutput, TranscoderError> {
        self.check_request(request)?;

        let total_duration = match progress_tx {
            Some(_) => self.input_duration(request).await,
            None => None,
        };

        let binary = &self.config.ffmpeg_path;
        let args = request.to_args();
        info!("Starting {} for {}", binary.display(), request.output);
        debug!("ffmpeg args: {:?}", args);

        let start = Instant::now();
        let mut child = Command::new(binary)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| spawn_error(e, binary))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| std::io::Error::other("ffmpeg stdout was not captured"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| std::io::Error::other("ffmpeg stderr was not captured"))?;

        let verbose = self.config.verbose;
        let parser = ProgressParser::new();
        let on_line = |line: &str| {
            if verbose {
                info!("ffmpeg: {}", line);
            }
            if let Some(ref tx) = progress_tx {
                if let Some(progress) = parser.parse(line, total_duration) {
                    // Non-blocking send
                    let _ = tx.try_send(progress);
                }
            }
        };

        let collect = async {
            let (stdout, stderr) = tokio::join!(read_all(stdout), drain_lines(stderr, on_line));
            let mut output = stdout?;
            output.extend(stderr?);
            let status = child.wait().await?;
            Ok::<_, std::io::Error>((status, output))
        };

        let result = match self.config.timeout_secs {
            Some(secs) => timeout(Duration::from_secs(secs), collect).await.ok(),
            None => Some(collect.await),
        };

        let (status, output) = match result {
            Some(finished) => finished?,
            None => {
                // Kill the process on timeout
                let _ = child.kill().await;
                let timeout_secs = self.config.timeout_secs.unwrap_or_default();
                warn!("ffmpeg timed out after {} seconds", timeout_secs);
                return Err(TranscoderError::Timeout { timeout_secs });
            }
        };

        if !status.success() {
            warn!("ffmpeg failed with {}", status);
            return Err(TranscoderError::execution_failed(
                binary.clone(),
                args,
                format!("ffmpeg exited with {}", status),
                status.code(),
                output,
            ));
        }

        let duration_ms = start.elapsed().as_millis() as u64;
        info!("ffmpeg finished in {} ms", duration_ms);

        Ok(TranscodeOutput {
            args,
            output,
            duration_ms,
        })
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    fn name(&self) -> &str {
        "ffmpeg"
    }

    async fn start(&self, request: &TranscodeRequest) -> Result<TranscodeOutput, TranscoderError> {
        self.run(request, None).await
    }

    async fn start_with_progress(
        &self,
        request: &TranscodeRequest,
        progress_tx: mpsc::Sender<Progress>,
    ) -> Result<TranscodeOutput, TranscoderError> {
        self.run(request, Some(progress_tx)).await
    }

    async fn probe(&self, input: &str) -> Result<Metadata, TranscoderError> {
        let binary = &self.config.ffprobe_path;
        if binary.as_os_str().is_empty() {
            return Err(TranscoderError::MissingFfprobePath);
        }

        let args = probe_args(input);
        debug!("ffprobe args: {:?}", args);

        let mut cmd = Command::new(binary);
        cmd.args(&args).stdin(Stdio::null()).kill_on_drop(true);
        let command = cmd.output();

        let output = match self.config.timeout_secs {
            Some(secs) => timeout(Duration::from_secs(secs), command)
                .await
                .map_err(|_| TranscoderError::Timeout { timeout_secs: secs })?,
            None => command.await,
        }
        .map_err(|e| spawn_error(e, binary))?;

        if !output.status.success() {
            warn!("ffprobe failed for {} with {}", input, output.status);
            let mut captured = output.stdout;
            captured.extend(output.stderr);
            return Err(TranscoderError::execution_failed(
                binary.clone(),
                args,
                format!("ffprobe exited with {}", output.status),
                output.status.code(),
                captured,
            ));
        }

        Metadata::from_json(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Arguments for probing `input` as JSON.
pub fn probe_args(input: &str) -> Vec<String> {
    [
        "-i",
        input,
        "-print_format",
        "json",
        "-show_format",
        "-show_streams",
        "-show_error",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn spawn_error(e: std::io::Error, path: &Path) -> TranscoderError {
    if e.kind() == std::io::ErrorKind::NotFound {
        TranscoderError::BinaryNotFound {
            path: path.to_path_buf(),
        }
    } else {
        TranscoderError::Io(e)
    }
}

async fn read_all<R: AsyncRead + Unpin>(mut reader: R) -> std::io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf).await?;
    Ok(buf)
}

/// Reads `reader` to the end, calling `on_line` for every `\r` or `\n`
/// terminated line, and returns the raw bytes.
///
/// ffmpeg rewrites its status line in place with `\r`, so both count as
/// terminators.
async fn drain_lines<R, F>(mut reader: R, mut on_line: F) -> std::io::Result<Vec<u8>>
where
    R: AsyncRead + Unpin,
    F: FnMut(&str),
{
    let mut captured = Vec::new();
    let mut pending = Vec::new();
    let mut chunk = [0u8; 4096];

    loop {
        let n = reader.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        captured.extend_from_slice(&chunk[..n]);

        for &byte in &chunk[..n] {
            if byte == b'\n' || byte == b'\r' {
                if !pending.is_empty() {
                    on_line(&String::from_utf8_lossy(&pending));
                    pending.clear();
                }
            } else {
                pending.push(byte);
            }
        }
    }

    if !pending.is_empty() {
        on_line(&String::from_utf8_lossy(&pending));
    }

    Ok(captured)
}
