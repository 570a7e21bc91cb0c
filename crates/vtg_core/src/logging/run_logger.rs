//! The per-run log: one file per conversion plus an optional display
//! callback, with a bounded tail of raw tool output kept around so a
//! failed pass can show its last lines.

use std::collections::VecDeque;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use parking_lot::Mutex;

use super::types::{DisplayCallback, LogConfig, LogLevel, MessagePrefix};

/// Writer handle and tail buffer, guarded together.
struct LoggerState {
    writer: Option<BufWriter<File>>,
    tail: VecDeque<String>,
}

/// Log sink for a single conversion run.
///
/// Lines go to `<logs_folder>/<run_name>.log` and, when a callback was
/// supplied, to the front-end. Tool output is buffered in a bounded
/// tail rather than written line-by-line unless compact mode is off.
pub struct RunLogger {
    run_name: String,
    log_path: PathBuf,
    config: LogConfig,
    display: Option<DisplayCallback>,
    state: Mutex<LoggerState>,
}

impl RunLogger {
    /// Open the log file for a run, creating the folder if needed.
    ///
    /// The file is named after `run_name` with unsafe characters
    /// replaced.
    pub fn new(
        run_name: impl Into<String>,
        log_dir: impl AsRef<Path>,
        config: LogConfig,
        display: Option<DisplayCallback>,
    ) -> std::io::Result<Self> {
        let run_name = run_name.into();
        let log_dir = log_dir.as_ref();
        fs::create_dir_all(log_dir)?;

        let log_path = log_dir.join(format!("{}.log", sanitize_filename(&run_name)));
        let state = LoggerState {
            writer: Some(BufWriter::new(File::create(&log_path)?)),
            tail: VecDeque::with_capacity(config.error_tail.max(1)),
        };

        Ok(Self {
            run_name,
            log_path,
            config,
            display,
            state: Mutex::new(state),
        })
    }

    /// Name of the run this logger belongs to.
    pub fn run_name(&self) -> &str {
        &self.run_name
    }

    /// Where the log file lives.
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Write a message if it clears the configured level.
    pub fn log(&self, level: LogLevel, message: &str) {
        if level >= self.config.level {
            self.emit(message);
        }
    }

    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    pub fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, &MessagePrefix::Warning.format(message));
    }

    pub fn error(&self, message: &str) {
        self.log(LogLevel::Error, &MessagePrefix::Error.format(message));
    }

    /// Record a command line about to be executed.
    pub fn command(&self, command: &str) {
        self.log(LogLevel::Info, &MessagePrefix::Command.format(command));
    }

    /// Write a phase banner.
    pub fn phase(&self, name: &str) {
        self.log(LogLevel::Info, &MessagePrefix::Phase.format(name));
    }

    pub fn success(&self, message: &str) {
        self.log(LogLevel::Info, &MessagePrefix::Success.format(message));
    }

    /// Record one line of tool stdout/stderr.
    ///
    /// The line always lands in the tail buffer; it is only written out
    /// immediately when compact mode is off.
    pub fn output_line(&self, line: &str, is_stderr: bool) {
        {
            let mut state = self.state.lock();
            if state.tail.len() >= self.config.error_tail {
                state.tail.pop_front();
            }
            state.tail.push_back(line.to_string());
        }

        if self.config.compact {
            return;
        }
        if is_stderr {
            self.emit(&format!("[stderr] {line}"));
        } else {
            self.emit(line);
        }
    }

    /// Dump the buffered tail under a header, typically after a failed
    /// pass.
    pub fn show_tail(&self, header: &str) {
        let lines: Vec<String> = self.state.lock().tail.iter().cloned().collect();
        if lines.is_empty() {
            return;
        }
        self.emit(&format!("[{header}/tail]"));
        for line in &lines {
            self.emit(line);
        }
    }

    /// Drop everything buffered in the tail.
    pub fn clear_tail(&self) {
        self.state.lock().tail.clear();
    }

    /// Snapshot of the current tail contents.
    pub fn tail(&self) -> Vec<String> {
        self.state.lock().tail.iter().cloned().collect()
    }

    /// Flush the underlying file.
    pub fn flush(&self) {
        if let Some(writer) = self.state.lock().writer.as_mut() {
            let _ = writer.flush();
        }
    }

    /// Flush and release the file handle; later lines go to the
    /// callback only.
    pub fn close(&self) {
        let mut state = self.state.lock();
        if let Some(mut writer) = state.writer.take() {
            let _ = writer.flush();
        }
    }

    fn emit(&self, message: &str) {
        let line = if self.config.show_timestamps {
            format!("[{}] {}", Local::now().format("%H:%M:%S"), message)
        } else {
            message.to_string()
        };

        if let Some(writer) = self.state.lock().writer.as_mut() {
            let _ = writeln!(writer, "{line}");
        }
        if let Some(callback) = &self.display {
            callback(&line);
        }
    }
}

impl Drop for RunLogger {
    fn drop(&mut self) {
        self.close();
    }
}

/// Replace characters that are unsafe in file names.
fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| if r#"/\:*?"<>|"#.contains(c) { '_' } else { c })
        .collect()
}
