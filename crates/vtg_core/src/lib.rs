//! Video to GIF - Core Library
//!
//! This crate contains all the backend logic for turning a slice of a
//! video file into an animated GIF, with no UI dependencies. It can be
//! used by a graphical front-end or a CLI tool.
//!
//! The conversion itself is delegated to an external `ffmpeg` binary and
//! runs as two passes over the same filter chain: one to generate an
//! optimized palette, one to render the GIF with it.

pub mod aspect;
pub mod config;
pub mod filtergraph;
pub mod logging;
pub mod models;
pub mod pipeline;
pub mod probe;
pub mod runner;
pub mod timecode;
pub mod tools;
pub mod validate;

/// Version of the core library
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
