use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

use super::{types::TranscoderConfig, ConfigError};

/// Prefix for environment overrides, e.g. `TRANSCODER_FFMPEG_PATH`.
///
/// Keys are not split on `_`: every field is top level, so
/// `TRANSCODER_TIMEOUT_SECS` maps to `timeout_secs`.
const ENV_PREFIX: &str = "TRANSCODER_";

/// Names the CLI reads from the environment itself.
const ENV_IGNORED: &[&str] = &["config"];

fn env_overrides() -> Env {
    Env::prefixed(ENV_PREFIX).ignore(ENV_IGNORED)
}

fn extract(figment: Figment) -> Result<TranscoderConfig, ConfigError> {
    figment
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Load configuration from a TOML file, then apply `TRANSCODER_*` overrides.
pub fn load_config(path: &Path) -> Result<TranscoderConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    extract(Figment::new().merge(Toml::file(path)).merge(env_overrides()))
}

/// Defaults with `TRANSCODER_*` overrides, for runs without a config file.
pub fn load_config_from_env() -> Result<TranscoderConfig, ConfigError> {
    extract(Figment::new().merge(env_overrides()))
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<TranscoderConfig, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use std::path::PathBuf;

    #[test]
    fn test_load_config_from_str_valid() {
        let toml = r#"
ffmpeg_path = "/opt/ffmpeg/bin/ffmpeg"
timeout_secs = 120
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.ffmpeg_path, PathBuf::from("/opt/ffmpeg/bin/ffmpeg"));
        assert_eq!(config.ffprobe_path, PathBuf::from("ffprobe"));
        assert_eq!(config.timeout_secs, Some(120));
    }

    #[test]
    fn test_load_config_from_str_bad_type() {
        let result = load_config_from_str("verbose = \"loud\"");
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/transcoder.toml"));
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    // Environment tests run inside a Jail, which serializes them and restores
    // the process environment afterwards.

    #[test]
    fn test_load_config_from_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "transcoder.toml",
                r#"
ffmpeg_path = "/usr/bin/ffmpeg"
ffprobe_path = "/usr/bin/ffprobe"
verbose = true
"#,
            )?;

            let config = load_config(Path::new("transcoder.toml")).unwrap();
            assert_eq!(config.ffmpeg_path, PathBuf::from("/usr/bin/ffmpeg"));
            assert_eq!(config.ffprobe_path, PathBuf::from("/usr/bin/ffprobe"));
            assert!(config.verbose);
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "transcoder.toml",
                r#"
ffmpeg_path = "/usr/bin/ffmpeg"
timeout_secs = 60
"#,
            )?;
            jail.set_env("TRANSCODER_FFMPEG_PATH", "/opt/ffmpeg/bin/ffmpeg");
            jail.set_env("TRANSCODER_TIMEOUT_SECS", "5");
            jail.set_env("TRANSCODER_CONFIG", "transcoder.toml");

            let config = load_config(Path::new("transcoder.toml")).unwrap();
            assert_eq!(config.ffmpeg_path, PathBuf::from("/opt/ffmpeg/bin/ffmpeg"));
            assert_eq!(config.ffprobe_path, PathBuf::from("ffprobe"));
            assert_eq!(config.timeout_secs, Some(5));
            Ok(())
        });
    }

    #[test]
    fn test_load_config_from_env() {
        Jail::expect_with(|jail| {
            jail.set_env("TRANSCODER_FFPROBE_PATH", "/opt/ffmpeg/bin/ffprobe");
            jail.set_env("TRANSCODER_VERBOSE", "true");

            let config = load_config_from_env().unwrap();
            assert_eq!(config.ffmpeg_path, PathBuf::from("ffmpeg"));
            assert_eq!(config.ffprobe_path, PathBuf::from("/opt/ffmpeg/bin/ffprobe"));
            assert!(config.verbose);
            assert_eq!(config.timeout_secs, None);
            Ok(())
        });
    }

    #[test]
    fn test_load_config_from_env_bad_value() {
        Jail::expect_with(|jail| {
            jail.set_env("TRANSCODER_TIMEOUT_SECS", "soon");

            let result = load_config_from_env();
            assert!(matches!(result, Err(ConfigError::ParseError(_))));
            Ok(())
        });
    }
}
