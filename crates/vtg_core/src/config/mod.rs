//! Persistent settings for Video to GIF.
//!
//! A small TOML file split into tool, defaults, paths, and logging
//! tables. Missing fields fall back to defaults at load time, and every
//! save goes through a staging file so the config is never left half
//! written.
//!
//! # Example
//!
//! ```no_run
//! use vtg_core::config::ConfigManager;
//!
//! let mut config = ConfigManager::new("video_to_gif.toml");
//! config.load_or_create().unwrap();
//!
//! let defaults = &config.settings().defaults;
//! println!("seed size: {}x{}", defaults.width, defaults.height);
//! ```

mod manager;
mod settings;

pub use manager::{ConfigError, ConfigManager, ConfigResult};
pub use settings::{DefaultSettings, LoggingSettings, PathSettings, Settings, ToolSettings};
