//! Log levels, run-log configuration, and message prefixes.

use crate::config::LoggingSettings;

/// Severity threshold for run-log messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// The `tracing` filter directive equivalent to this level.
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// How a run log behaves.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Minimum level written at all.
    pub level: LogLevel,
    /// Compact mode: tool output lines go to the tail buffer only.
    pub compact: bool,
    /// How many recent tool output lines to keep for error reports.
    pub error_tail: usize,
    /// Prefix every line with a wall-clock timestamp.
    pub show_timestamps: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            compact: true,
            error_tail: 20,
            show_timestamps: true,
        }
    }
}

impl LogConfig {
    /// Configuration derived from user settings.
    pub fn from_settings(settings: &LoggingSettings) -> Self {
        Self {
            error_tail: settings.error_tail as usize,
            show_timestamps: settings.show_timestamps,
            ..Self::default()
        }
    }

    /// Verbose configuration: every tool output line is echoed.
    pub fn verbose() -> Self {
        Self {
            level: LogLevel::Debug,
            compact: false,
            error_tail: 50,
            show_timestamps: true,
        }
    }
}

/// Callback receiving each display line; the front-end decides where it
/// goes (status area, terminal).
pub type DisplayCallback = Box<dyn Fn(&str) + Send + Sync>;

/// Markers that keep run-log lines scannable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessagePrefix {
    /// A command line about to run, shown as `$ ...`.
    Command,
    /// A `=== name ===` banner between conversion phases.
    Phase,
    /// `[SUCCESS]` marker.
    Success,
    /// `[WARNING]` marker.
    Warning,
    /// `[ERROR]` marker.
    Error,
}

impl MessagePrefix {
    /// Wrap a message in this prefix.
    pub fn format(&self, message: &str) -> String {
        match self {
            MessagePrefix::Command => format!("$ {message}"),
            MessagePrefix::Phase => format!("=== {message} ==="),
            MessagePrefix::Success => format!("[SUCCESS] {message}"),
            MessagePrefix::Warning => format!("[WARNING] {message}"),
            MessagePrefix::Error => format!("[ERROR] {message}"),
        }
    }
}
