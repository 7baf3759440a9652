pub mod config;
pub mod options;
pub mod testing;
pub mod transcoder;

pub use config::{
    load_config, load_config_from_env, load_config_from_str, validate_config, ConfigError,
    TranscoderConfig,
};
pub use options::{compile, compile_all, FieldDescriptor, FieldValue, Options, Scope, Shape, FIELDS};
pub use transcoder::{
    FfmpegTranscoder, Metadata, Progress, TranscodeOutput, TranscodeRequest, Transcoder,
    TranscoderError,
};
