//! The settings file schema.
//!
//! Four TOML tables: tool locations, conversion defaults, paths, and
//! run-log behavior. Every field carries a serde default, so partial
//! or empty files still load; unknown keys are ignored.

use serde::{Deserialize, Serialize};

use crate::models::{DEFAULT_DIMENSIONS, DEFAULT_FRAME_RATE};

/// Everything the settings file can carry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Where ffmpeg and ffprobe live.
    #[serde(default)]
    pub tools: ToolSettings,

    /// Seed values for the conversion fields.
    #[serde(default)]
    pub defaults: DefaultSettings,

    /// Directories for intermediates and logs.
    #[serde(default)]
    pub paths: PathSettings,

    /// Run-log behavior.
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// External tool locations. Empty strings mean "search PATH".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolSettings {
    /// Explicit ffmpeg path, if any.
    #[serde(default)]
    pub ffmpeg_path: String,

    /// Explicit ffprobe path, if any.
    #[serde(default)]
    pub ffprobe_path: String,
}

/// Default conversion parameters used to seed the front-end fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultSettings {
    /// Default output width.
    #[serde(default = "default_width")]
    pub width: u32,

    /// Default output height.
    #[serde(default = "default_height")]
    pub height: u32,

    /// Default output frame rate.
    #[serde(default = "default_frame_rate")]
    pub frame_rate: u32,
}

fn default_width() -> u32 {
    DEFAULT_DIMENSIONS.width
}

fn default_height() -> u32 {
    DEFAULT_DIMENSIONS.height
}

fn default_frame_rate() -> u32 {
    DEFAULT_FRAME_RATE
}

impl Default for DefaultSettings {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            frame_rate: default_frame_rate(),
        }
    }
}

/// Where intermediates and run logs are written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathSettings {
    /// Directory the intermediate palette image is written to.
    #[serde(default = "default_work_dir")]
    pub work_dir: String,

    /// Directory the run logs land in.
    #[serde(default = "default_logs_folder")]
    pub logs_folder: String,
}

fn default_work_dir() -> String {
    ".".to_string()
}

fn default_logs_folder() -> String {
    ".logs".to_string()
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            work_dir: default_work_dir(),
            logs_folder: default_logs_folder(),
        }
    }
}

/// Knobs for the run logs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Number of recent tool output lines echoed when a pass fails.
    #[serde(default = "default_error_tail")]
    pub error_tail: u32,

    /// Prefix log-file lines with timestamps.
    #[serde(default = "default_true")]
    pub show_timestamps: bool,
}

fn default_error_tail() -> u32 {
    20
}

fn default_true() -> bool {
    true
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            error_tail: default_error_tail(),
            show_timestamps: default_true(),
        }
    }
}
