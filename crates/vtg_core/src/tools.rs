//! Discovery of the external ffmpeg/ffprobe binaries.
//!
//! An explicitly configured path always wins; otherwise each `PATH`
//! entry is searched. Nothing is downloaded or installed.

use std::env;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::ToolSettings;

/// Failure to locate a required external tool.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolError {
    #[error("{tool} not found on PATH; install it or set its path in the settings")]
    NotFound { tool: &'static str },
    #[error("configured {tool} path does not exist: {}", path.display())]
    ConfiguredPathMissing { tool: &'static str, path: PathBuf },
}

/// Resolved paths of the external binaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolset {
    /// Conversion binary.
    pub ffmpeg: PathBuf,
    /// Probing binary.
    pub ffprobe: PathBuf,
}

impl Toolset {
    /// Resolve both tools from settings.
    pub fn resolve(settings: &ToolSettings) -> Result<Self, ToolError> {
        Ok(Self {
            ffmpeg: resolve_tool("ffmpeg", &settings.ffmpeg_path)?,
            ffprobe: resolve_tool("ffprobe", &settings.ffprobe_path)?,
        })
    }
}

fn resolve_tool(tool: &'static str, configured: &str) -> Result<PathBuf, ToolError> {
    if !configured.is_empty() {
        let path = PathBuf::from(configured);
        if path.is_file() {
            return Ok(path);
        }
        return Err(ToolError::ConfiguredPathMissing { tool, path });
    }
    find_in_path(tool).ok_or(ToolError::NotFound { tool })
}

/// Search each `PATH` entry for an executable with the given name.
pub fn find_in_path(tool: &str) -> Option<PathBuf> {
    let path_var = env::var_os("PATH")?;
    for dir in env::split_paths(&path_var) {
        let candidate = dir.join(tool);
        if candidate.is_file() {
            return Some(candidate);
        }
        #[cfg(windows)]
        {
            let candidate = dir.join(format!("{tool}.exe"));
            if candidate.is_file() {
                return Some(candidate);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn configured_path_wins() {
        let dir = tempfile::tempdir().unwrap();
        let ffmpeg = dir.path().join("my-ffmpeg");
        let ffprobe = dir.path().join("my-ffprobe");
        fs::write(&ffmpeg, b"").unwrap();
        fs::write(&ffprobe, b"").unwrap();

        let settings = ToolSettings {
            ffmpeg_path: ffmpeg.to_string_lossy().into_owned(),
            ffprobe_path: ffprobe.to_string_lossy().into_owned(),
        };
        let tools = Toolset::resolve(&settings).unwrap();
        assert_eq!(tools.ffmpeg, ffmpeg);
        assert_eq!(tools.ffprobe, ffprobe);
    }

    #[test]
    fn missing_configured_path_is_an_error() {
        let settings = ToolSettings {
            ffmpeg_path: "/no/such/ffmpeg".to_string(),
            ffprobe_path: String::new(),
        };
        let err = Toolset::resolve(&settings).unwrap_err();
        assert!(matches!(
            err,
            ToolError::ConfiguredPathMissing { tool: "ffmpeg", .. }
        ));
    }

    #[test]
    fn unknown_tool_is_not_found_on_path() {
        assert_eq!(find_in_path("definitely-not-a-real-tool-xyz"), None);
    }
}
