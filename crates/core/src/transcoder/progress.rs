//! Progress reporting from ffmpeg's stderr status line.

use regex_lite::Regex;
use serde::{Deserialize, Serialize};

/// Snapshot of a running transcode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    /// Frames written so far.
    pub frames_processed: String,
    /// Output position as printed by ffmpeg, e.g. `00:01:02.50`.
    pub current_time: String,
    /// Current bitrate, e.g. `838.9kbits/s`.
    pub current_bitrate: String,
    /// Completion percentage (0.0 - 100.0). Zero when the total duration is unknown.
    pub progress: f64,
    /// Processing speed relative to real time, e.g. `2.5x`.
    pub speed: String,
}

impl Progress {
    pub fn percent(&self) -> f64 {
        self.progress
    }

    /// Parses one status line. See [`ProgressParser::parse`].
    pub fn parse(line: &str, total_duration_secs: Option<f64>) -> Option<Self> {
        ProgressParser::new().parse(line, total_duration_secs)
    }
}

/// Reusable parser for `frame=... time=... bitrate=... speed=...` lines.
pub struct ProgressParser {
    frame: Option<Regex>,
    time: Option<Regex>,
    bitrate: Option<Regex>,
    speed: Option<Regex>,
}

impl Default for ProgressParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressParser {
    pub fn new() -> Self {
        Self {
            frame: Regex::new(r"frame=\s*(\d+)").ok(),
            time: Regex::new(r"time=\s*(\S+)").ok(),
            bitrate: Regex::new(r"bitrate=\s*(\S+)").ok(),
            speed: Regex::new(r"speed=\s*(\S+)").ok(),
        }
    }

    /// Returns `None` for lines that are not status lines.
    pub fn parse(&self, line: &str, total_duration_secs: Option<f64>) -> Option<Progress> {
        let current_time = capture(self.time.as_ref(), line)?;

        let progress = match (parse_timestamp(&current_time), total_duration_secs) {
            (Some(elapsed), Some(total)) if total > 0.0 => {
                (elapsed / total * 100.0).clamp(0.0, 100.0)
            }
            _ => 0.0,
        };

        Some(Progress {
            frames_processed: capture(self.frame.as_ref(), line).unwrap_or_default(),
            current_time,
            current_bitrate: capture(self.bitrate.as_ref(), line).unwrap_or_default(),
            progress,
            speed: capture(self.speed.as_ref(), line).unwrap_or_default(),
        })
    }
}

fn capture(re: Option<&Regex>, line: &str) -> Option<String> {
    re?.captures(line)?.get(1).map(|m| m.as_str().to_string())
}

/// Converts `HH:MM:SS.frac` into seconds.
pub fn parse_timestamp(value: &str) -> Option<f64> {
    let (negative, value) = match value.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, value),
    };

    let mut parts = value.split(':');
    let hours: f64 = parts.next()?.parse().ok()?;
    let minutes: f64 = parts.next()?.parse().ok()?;
    let seconds: f64 = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }

    let total = hours * 3600.0 + minutes * 60.0 + seconds;
    Some(if negative { -total } else { total })
}
