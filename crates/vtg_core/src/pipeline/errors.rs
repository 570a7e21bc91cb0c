//! Error types for the conversion pipeline.

use std::fmt;

use thiserror::Error;

/// Which of the two external passes was running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassKind {
    /// First pass: palette generation.
    Palette,
    /// Second pass: GIF rendering.
    Render,
}

impl fmt::Display for PassKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PassKind::Palette => write!(f, "palette generation"),
            PassKind::Render => write!(f, "GIF rendering"),
        }
    }
}

/// Errors from a conversion run.
///
/// Variants own their payloads so results can cross the status channel.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    /// The external tool exited with a non-zero code.
    #[error("{tool} command failed during {pass} with return code {exit_code}")]
    ToolFailure {
        tool: String,
        pass: PassKind,
        exit_code: i32,
    },

    /// Any other runtime fault, surfaced verbatim.
    #[error("{0}")]
    Unexpected(String),
}

impl PipelineError {
    /// Create a ToolFailure error.
    pub fn tool_failure(tool: impl Into<String>, pass: PassKind, exit_code: i32) -> Self {
        Self::ToolFailure {
            tool: tool.into(),
            pass,
            exit_code,
        }
    }

    /// Create an Unexpected error.
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected(message.into())
    }
}

/// Shorthand for pipeline results.
pub type PipelineResult<T> = Result<T, PipelineError>;
