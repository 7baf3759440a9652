use super::{types::TranscoderConfig, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Binary paths are not empty
/// - Timeout, when set, is not 0
pub fn validate_config(config: &TranscoderConfig) -> Result<(), ConfigError> {
    if config.ffmpeg_path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "ffmpeg_path cannot be empty".to_string(),
        ));
    }

    if config.ffprobe_path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "ffprobe_path cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs == Some(0) {
        return Err(ConfigError::ValidationError(
            "timeout_secs cannot be 0".to_string(),
        ));
    }

    Ok(())
}
