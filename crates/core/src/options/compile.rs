//! Compilation of an option set into ffmpeg command-line tokens.

use super::field::{FieldDescriptor, FieldValue, Scope};
use super::schema::{Options, FIELDS};

/// Compiles the fields of `options` belonging to `scope`.
///
/// Fields are visited in declaration order. Unset fields emit nothing; map
/// entries are emitted in the map's own iteration order.
pub fn compile(options: &Options, scope: Scope) -> Vec<String> {
    let mut args = Vec::new();

    for field in FIELDS.iter().filter(|f| f.scope == scope) {
        emit(field, field.value(options), &mut args);
    }

    args
}

/// Compiles input-scoped arguments followed by output-scoped arguments.
pub fn compile_all(options: &Options) -> Vec<String> {
    let mut args = compile(options, Scope::Input);
    args.extend(compile(options, Scope::Output));
    args
}

fn emit(field: &FieldDescriptor, value: FieldValue<'_>, args: &mut Vec<String>) {
    if !value.is_set() {
        return;
    }

    // Only extra-argument maps are declared without a flag.
    let flag = field.flag.unwrap_or_default();

    match value {
        FieldValue::Flag(Some(true)) => args.push(flag.to_string()),
        FieldValue::Flag(_) => {}
        FieldValue::Text(Some(v)) => args.extend([flag.to_string(), v.to_string()]),
        FieldValue::Int(Some(v)) => args.extend([flag.to_string(), v.to_string()]),
        FieldValue::UInt(Some(v)) => args.extend([flag.to_string(), v.to_string()]),
        FieldValue::Text(None) | FieldValue::Int(None) | FieldValue::UInt(None) => {}
        FieldValue::List(items) => {
            for item in items {
                args.extend([flag.to_string(), item.clone()]);
            }
        }
        FieldValue::Pairs(map) => {
            for (key, value) in map {
                args.extend([flag.to_string(), format!("{}:{}", key, value)]);
            }
        }
        FieldValue::Extra(map) => {
            for (key, value) in map {
                args.extend([key.clone(), value.clone()]);
            }
        }
    }
}

impl Options {
    /// Compiles the arguments for one scope. See [`compile`].
    pub fn compile(&self, scope: Scope) -> Vec<String> {
        compile(self, scope)
    }

    /// Compiles the full argument list, input group first. See [`compile_all`].
    pub fn compile_all(&self) -> Vec<String> {
        compile_all(self)
    }

    /// Arguments placed before the output destination that describe inputs.
    pub fn input_args(&self) -> Vec<String> {
        compile(self, Scope::Input)
    }

    /// Arguments describing the encoding target.
    pub fn output_args(&self) -> Vec<String> {
        compile(self, Scope::Output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn s(v: &str) -> Option<String> {
        Some(v.to_string())
    }

    fn pairs(args: &[String]) -> Vec<(String, String)> {
        let mut out: Vec<_> = args
            .chunks(2)
            .map(|c| (c[0].clone(), c[1].clone()))
            .collect();
        out.sort();
        out
    }

    #[test]
    fn test_input_and_output_split() {
        let options = Options {
            output_format: s("mp4"),
            aspect: s("16:9"),
            input_format: s("mp4"),
            input_safe: s("0"),
            input_extra_args: HashMap::from([("-test".to_string(), "test".to_string())]),
            ..Default::default()
        };

        assert_eq!(
            compile(&options, Scope::Input),
            ["-f", "mp4", "-safe", "0", "-test", "test"]
        );
        assert_eq!(
            compile(&options, Scope::Output),
            ["-f", "mp4", "-aspect", "16:9"]
        );
    }

    #[test]
    fn test_empty_options() {
        let options = Options::default();
        assert!(compile(&options, Scope::Input).is_empty());
        assert!(compile(&options, Scope::Output).is_empty());
        assert!(compile_all(&options).is_empty());
    }

    #[test]
    fn test_overwrite_only() {
        let options = Options {
            overwrite: Some(true),
            ..Default::default()
        };
        assert_eq!(compile(&options, Scope::Output), ["-y"]);
        assert!(compile(&options, Scope::Input).is_empty());
    }

    #[test]
    fn test_false_flag_emits_nothing() {
        let options = Options {
            overwrite: Some(false),
            skip_audio: Some(false),
            input_native_framerate: Some(false),
            ..Default::default()
        };
        assert!(compile_all(&options).is_empty());
    }

    #[test]
    fn test_true_input_flag() {
        let options = Options {
            input_native_framerate: Some(true),
            inputs: vec!["rtmp://src/live".to_string()],
            ..Default::default()
        };
        assert_eq!(options.input_args(), ["-re", "-i", "rtmp://src/live"]);
    }

    #[test]
    fn test_zero_numbers_are_emitted() {
        let options = Options {
            crf: Some(0),
            threads: Some(0),
            strict: Some(-2),
            ..Default::default()
        };
        assert_eq!(
            options.output_args(),
            ["-threads", "0", "-crf", "0", "-strict", "-2"]
        );
    }

    #[test]
    fn test_sequence_keeps_element_order() {
        let options = Options {
            map: vec!["0:v".to_string(), "1:a".to_string(), "0:s".to_string()],
            ..Default::default()
        };
        assert_eq!(
            options.output_args(),
            ["-map", "0:v", "-map", "1:a", "-map", "0:s"]
        );

        let reversed = Options {
            map: options.map.iter().rev().cloned().collect(),
            ..Default::default()
        };
        assert_eq!(
            reversed.output_args(),
            ["-map", "0:s", "-map", "1:a", "-map", "0:v"]
        );
    }

    #[test]
    fn test_string_map_emits_key_value_tokens() {
        let options = Options {
            metadata: HashMap::from([
                ("title".to_string(), "Clip".to_string()),
                ("artist".to_string(), "Someone".to_string()),
            ]),
            ..Default::default()
        };

        let args = options.output_args();
        assert_eq!(args.len(), 4);
        assert_eq!(
            pairs(&args),
            [
                ("-metadata".to_string(), "artist:Someone".to_string()),
                ("-metadata".to_string(), "title:Clip".to_string()),
            ]
        );
    }

    #[test]
    fn test_extra_args_use_key_as_flag() {
        let options = Options {
            output_extra_args: HashMap::from([
                ("-max_muxing_queue_size".to_string(), "1024".to_string()),
                ("-fflags".to_string(), "+genpts".to_string()),
            ]),
            ..Default::default()
        };

        let args = options.output_args();
        assert_eq!(args.len(), 4);
        assert_eq!(
            pairs(&args),
            [
                ("-fflags".to_string(), "+genpts".to_string()),
                ("-max_muxing_queue_size".to_string(), "1024".to_string()),
            ]
        );
    }

    #[test]
    fn test_inputs_emitted_last_in_input_group() {
        let options = Options {
            inputs: vec!["a.ts".to_string(), "b.ts".to_string()],
            input_format: s("mpegts"),
            input_initial_offset: s("0.5"),
            ..Default::default()
        };
        assert_eq!(
            options.input_args(),
            ["-f", "mpegts", "-itsoffset", "0.5", "-i", "a.ts", "-i", "b.ts"]
        );
    }

    #[test]
    fn test_compile_all_concatenates_scopes() {
        let options = Options {
            inputs: vec!["in.mkv".to_string()],
            input_safe: s("0"),
            video_codec: s("libx264"),
            crf: Some(23),
            overwrite: Some(true),
            hide_banner: Some(true),
            ..Default::default()
        };

        let mut expected = options.input_args();
        expected.extend(options.output_args());
        assert_eq!(options.compile_all(), expected);
        assert_eq!(
            options.compile_all(),
            [
                "-safe",
                "0",
                "-i",
                "in.mkv",
                "-c:v",
                "libx264",
                "-crf",
                "23",
                "-hide_banner",
                "-y",
            ]
        );
    }

    #[test]
    fn test_compile_is_repeatable() {
        let options = Options {
            inputs: vec!["in.mp4".to_string()],
            map: vec!["0".to_string()],
            preset: s("fast"),
            ..Default::default()
        };
        assert_eq!(options.compile_all(), options.compile_all());
    }
}
