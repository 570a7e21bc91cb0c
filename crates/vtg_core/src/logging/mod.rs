//! Logging for Video to GIF.
//!
//! Two layers: the process-wide `tracing` subscriber (developer
//! diagnostics, stderr), and a per-run [`RunLogger`] that writes the
//! user-facing record of one conversion to a log file and an optional
//! display callback. Phase banners and executed command lines go there,
//! plus a bounded tail of tool output kept for error reports.
//!
//! # Example
//!
//! ```no_run
//! use vtg_core::logging::{LogConfig, RunLogger};
//!
//! let logger = RunLogger::new("clip", ".logs", LogConfig::default(), None).unwrap();
//! logger.phase("Generating palette");
//! logger.command("ffmpeg -i clip.mp4 ...");
//! logger.success("GIF created successfully: clip.gif");
//! ```

mod run_logger;
mod types;

pub use run_logger::RunLogger;
pub use types::{DisplayCallback, LogConfig, LogLevel, MessagePrefix};

use tracing_subscriber::EnvFilter;

/// Install the process-wide tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise `default_level` filters. Output
/// goes to stderr. Call once at startup.
pub fn init_tracing(default_level: LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level.as_filter()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
