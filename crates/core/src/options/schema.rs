//! The declared option schema.
//!
//! [`Options`] and [`FIELDS`] are generated from one declaration so the struct
//! and its descriptor table always agree on names, order and shapes.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::field::{FieldDescriptor, FieldValue, Scope, Shape};

macro_rules! field_type {
    (Flag) => { Option<bool> };
    (Text) => { Option<String> };
    (Int) => { Option<i64> };
    (UInt) => { Option<u32> };
    (List) => { Vec<String> };
    (Pairs) => { HashMap<String, String> };
    (Extra) => { HashMap<String, String> };
}

macro_rules! field_flag {
    () => {
        None
    };
    ($flag:literal) => {
        Some($flag)
    };
}

macro_rules! field_value {
    (Flag, $e:expr) => { FieldValue::Flag($e) };
    (Text, $e:expr) => { FieldValue::Text($e.as_deref()) };
    (Int, $e:expr) => { FieldValue::Int($e) };
    (UInt, $e:expr) => { FieldValue::UInt($e) };
    (List, $e:expr) => { FieldValue::List(&$e) };
    (Pairs, $e:expr) => { FieldValue::Pairs(&$e) };
    (Extra, $e:expr) => { FieldValue::Extra(&$e) };
}

macro_rules! option_schema {
    (
        $(
            $(#[$meta:meta])*
            $field:ident : $shape:ident $(= $flag:literal)? => $scope:ident
        ),* $(,)?
    ) => {
        /// Transcoding parameters for one ffmpeg invocation.
        ///
        /// Every field is optional. Fields left at their default contribute
        /// nothing to the compiled command line. Unknown keys are rejected.
        #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(default, deny_unknown_fields)]
        pub struct Options {
            $(
                $(#[$meta])*
                pub $field: field_type!($shape),
            )*
        }

        /// Descriptors for every field of [`Options`], in declaration order.
        pub const FIELDS: &[FieldDescriptor] = &[
            $(
                FieldDescriptor {
                    name: stringify!($field),
                    flag: field_flag!($($flag)?),
                    shape: Shape::$shape,
                    scope: Scope::$scope,
                    read: {
                        fn read(options: &Options) -> FieldValue<'_> {
                            field_value!($shape, options.$field)
                        }
                        read
                    },
                },
            )*
        ];
    };
}

option_schema! {
    /// Output container format.
    output_format: Text = "-f" => Output,
    /// Complex filtergraph.
    filter_complex: Text = "-filter_complex" => Output,
    /// Display aspect ratio, e.g. `16:9`.
    aspect: Text = "-aspect" => Output,
    /// Frame size, e.g. `1280x720`.
    resolution: Text = "-s" => Output,
    /// Video bitrate, e.g. `2500k`.
    video_bit_rate: Text = "-b:v" => Output,
    video_bit_rate_tolerance: Int = "-bt" => Output,
    video_max_bit_rate: Int = "-maxrate" => Output,
    video_min_bitrate: Int = "-minrate" => Output,
    /// Video encoder name.
    video_codec: Text = "-c:v" => Output,
    /// Number of video frames to write.
    vframes: Int = "-vframes" => Output,
    frame_rate: Int = "-r" => Output,
    /// Audio sample rate in Hz.
    audio_rate: Int = "-ar" => Output,
    /// GOP size.
    keyframe_interval: Int = "-g" => Output,
    /// Audio encoder name.
    audio_codec: Text = "-c:a" => Output,
    audio_bitrate: Text = "-ab" => Output,
    audio_channels: Text = "-ac" => Output,
    /// Variable bitrate audio quality (encoder specific scale).
    audio_quality: UInt = "-q:a" => Output,
    buffer_size: Int = "-bufsize" => Output,
    threads: Int = "-threads" => Output,
    preset: Text = "-preset" => Output,
    tune: Text = "-tune" => Output,
    audio_profile: Text = "-profile:a" => Output,
    video_profile: Text = "-profile:v" => Output,
    target: Text = "-target" => Output,
    /// Output duration limit.
    duration: Text = "-t" => Output,
    qscale: UInt = "-qscale" => Output,
    /// Constant rate factor.
    crf: UInt = "-crf" => Output,
    strict: Int = "-strict" => Output,
    mux_delay: Text = "-muxdelay" => Output,
    /// Start position.
    seek_time: Text = "-ss" => Output,
    /// Stop position.
    seek_time_to: Text = "-to" => Output,
    seek_using_timestamp: Flag = "-seek_timestamp" => Output,
    mov_flags: Text = "-movflags" => Output,
    hide_banner: Flag = "-hide_banner" => Output,
    /// Forced input container format.
    input_format: Text = "-f" => Input,
    /// Concat demuxer `safe` option.
    input_safe: Text = "-safe" => Input,
    copy_ts: Flag = "-copyts" => Output,
    /// Read input at its native frame rate.
    input_native_framerate: Flag = "-re" => Input,
    /// Timestamp offset applied to the input.
    input_initial_offset: Text = "-itsoffset" => Input,
    rtmp_live: Text = "-rtmp_live" => Output,
    hls_playlist_type: Text = "-hls_playlist_type" => Output,
    hls_list_size: Int = "-hls_list_size" => Output,
    /// Target HLS segment length in seconds.
    hls_segment_duration: Int = "-hls_time" => Output,
    hls_master_playlist_name: Text = "-master_pl_name" => Output,
    hls_segment_filename: Text = "-hls_segment_filename" => Output,
    http_method: Text = "-method" => Output,
    http_keep_alive: Flag = "-multiple_requests" => Output,
    hwaccel: Text = "-hwaccel" => Output,
    /// Stream index to container stream id, emitted as `index:id`.
    stream_ids: Pairs = "-streamid" => Output,
    video_filter: Text = "-vf" => Output,
    audio_filter: Text = "-af" => Output,
    skip_video: Flag = "-vn" => Output,
    skip_audio: Flag = "-an" => Output,
    compression_level: Int = "-compression_level" => Output,
    map_metadata: Text = "-map_metadata" => Output,
    /// Metadata entries, emitted as `key:value`.
    metadata: Pairs = "-metadata" => Output,
    /// Path of the HLS key info file.
    encryption_key: Text = "-hls_key_info_file" => Output,
    bframe: Int = "-bf" => Output,
    pix_fmt: Text = "-pix_fmt" => Output,
    white_list_protocols: List = "-protocol_whitelist" => Output,
    /// Overwrite the destination without asking.
    overwrite: Flag = "-y" => Output,
    chapters: Text = "-map_chapters" => Output,
    /// Stream selectors, one `-map` per entry in order.
    map: List = "-map" => Output,
    /// Raw output arguments; each key is emitted as its own flag.
    output_extra_args: Extra => Output,
    shortest: Flag = "-shortest" => Output,
    /// Raw input arguments; each key is emitted as its own flag.
    input_extra_args: Extra => Input,
    /// Input sources, one `-i` per entry.
    inputs: List = "-i" => Input,
}

impl Options {
    /// Returns the declared input sources in order.
    pub fn inputs(&self) -> &[String] {
        &self.inputs
    }

    /// Looks up a field descriptor by name.
    pub fn field(name: &str) -> Option<&'static FieldDescriptor> {
        FIELDS.iter().find(|f| f.name == name)
    }

    /// Iterates the descriptors belonging to `scope`, in declaration order.
    pub fn fields_in(scope: Scope) -> impl Iterator<Item = &'static FieldDescriptor> {
        FIELDS.iter().filter(move |f| f.scope == scope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_inputs_default_empty() {
        let options = Options::default();
        assert!(options.inputs().is_empty());
    }

    #[test]
    fn test_inputs_preserve_order() {
        let options = Options {
            inputs: vec!["a.mp4".to_string(), "b.mp4".to_string()],
            ..Default::default()
        };
        assert_eq!(options.inputs(), ["a.mp4", "b.mp4"]);
    }

    #[test]
    fn test_field_names_are_unique() {
        let mut seen = HashSet::new();
        for field in FIELDS {
            assert!(seen.insert(field.name), "duplicate field {}", field.name);
        }
    }

    #[test]
    fn test_flags_unique_within_scope() {
        for scope in [Scope::Input, Scope::Output] {
            let mut seen = HashSet::new();
            for field in Options::fields_in(scope) {
                if let Some(flag) = field.flag {
                    assert!(
                        seen.insert(flag),
                        "flag {} declared twice in {:?} scope",
                        flag,
                        scope
                    );
                }
            }
        }
    }

    #[test]
    fn test_scope_tags_match_input_naming() {
        for field in FIELDS {
            let named_input = field.name.starts_with("input");
            assert_eq!(
                named_input,
                field.scope == Scope::Input,
                "field {} has scope {:?}",
                field.name,
                field.scope
            );
        }
    }

    #[test]
    fn test_only_extra_maps_lack_a_flag() {
        for field in FIELDS {
            assert_eq!(
                field.flag.is_none(),
                field.shape == Shape::Extra,
                "field {}",
                field.name
            );
        }
    }

    #[test]
    fn test_descriptor_reads_matching_shape() {
        let options = Options::default();
        for field in FIELDS {
            assert_eq!(field.value(&options).shape(), field.shape, "{}", field.name);
        }
    }

    #[test]
    fn test_field_lookup() {
        let field = Options::field("overwrite").unwrap();
        assert_eq!(field.flag, Some("-y"));
        assert_eq!(field.shape, Shape::Flag);
        assert_eq!(field.scope, Scope::Output);
        assert!(Options::field("threadset").is_none());
    }

    #[test]
    fn test_output_format_leads_output_group() {
        let first = Options::fields_in(Scope::Output).next().unwrap();
        assert_eq!(first.name, "output_format");
    }

    #[test]
    fn test_inputs_close_the_input_group() {
        let last = Options::fields_in(Scope::Input).last().unwrap();
        assert_eq!(last.name, "inputs");
        assert_eq!(last.flag, Some("-i"));
    }

    #[test]
    fn test_deserialize_from_toml() {
        let options: Options = toml::from_str(
            r#"
inputs = ["in.mkv"]
video_codec = "libx264"
crf = 23
overwrite = true
map = ["0:v", "0:a"]

[metadata]
title = "Clip"
"#,
        )
        .unwrap();

        assert_eq!(options.inputs(), ["in.mkv"]);
        assert_eq!(options.video_codec.as_deref(), Some("libx264"));
        assert_eq!(options.crf, Some(23));
        assert_eq!(options.overwrite, Some(true));
        assert_eq!(options.map, vec!["0:v", "0:a"]);
        assert_eq!(options.metadata.get("title").map(String::as_str), Some("Clip"));
        assert!(options.aspect.is_none());
    }

    #[test]
    fn test_unknown_key_rejected() {
        let result: Result<Options, _> = toml::from_str(
            r#"
inputs = ["in.mkv"]
overwirte = true
"#,
        );

        let err = result.unwrap_err().to_string();
        assert!(err.contains("overwirte"), "unexpected error: {}", err);
    }
}
