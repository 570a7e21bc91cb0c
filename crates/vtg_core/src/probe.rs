//! Source probing via ffprobe.
//!
//! Probing runs when an input is selected, not when a conversion
//! starts. Every failure is non-fatal: callers treat it as "unknown
//! source" and fall back to configured defaults.

use std::path::Path;

use thiserror::Error;
use tracing::debug;

use crate::models::{Dimensions, SourceInfo};
use crate::runner::{CommandRunner, CommandSpec};

/// Errors that can occur while probing a source file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    #[error("Failed to launch ffprobe: {0}")]
    Launch(String),

    #[error("ffprobe exited with code {exit_code}")]
    CommandFailed { exit_code: i32 },

    #[error("Failed to parse ffprobe output: {0}")]
    Parse(String),
}

/// Probe the first video stream for its size and average frame rate.
///
/// The frame rate arrives as a rational (`numerator/denominator`) and is
/// rounded up to a whole number.
pub fn probe_source(
    runner: &dyn CommandRunner,
    ffprobe: &Path,
    input: &Path,
) -> Result<SourceInfo, ProbeError> {
    let spec = CommandSpec::new(ffprobe)
        .args([
            "-v",
            "error",
            "-select_streams",
            "v:0",
            "-show_entries",
            "stream=width,height,avg_frame_rate",
            "-of",
            "csv=p=0",
        ])
        .arg(input.to_string_lossy());

    debug!("probing source: {}", spec.display());

    let output = runner
        .run(&spec)
        .map_err(|e| ProbeError::Launch(e.to_string()))?;
    if !output.success() {
        return Err(ProbeError::CommandFailed {
            exit_code: output.exit_code,
        });
    }

    parse_stream_line(output.stdout.lines().next().unwrap_or(""))
}

/// Parse one `width,height,numerator/denominator` line.
fn parse_stream_line(line: &str) -> Result<SourceInfo, ProbeError> {
    let line = line.trim();
    let bad_line = || ProbeError::Parse(format!("unexpected stream line: '{}'", line));

    let mut fields = line.split(',');
    let (width, height, rate) = match (
        fields.next(),
        fields.next(),
        fields.next(),
        fields.next(),
    ) {
        (Some(w), Some(h), Some(r), None) => (w, h, r),
        _ => return Err(bad_line()),
    };

    let width: u32 = width.trim().parse().map_err(|_| bad_line())?;
    let height: u32 = height.trim().parse().map_err(|_| bad_line())?;
    if width == 0 || height == 0 {
        return Err(ProbeError::Parse(format!("zero-sized stream: '{}'", line)));
    }

    Ok(SourceInfo {
        dimensions: Dimensions::new(width, height),
        frame_rate: parse_frame_rate(rate)?,
    })
}

/// Parse an `avg_frame_rate` rational like `24000/1001`, rounding up.
fn parse_frame_rate(rate: &str) -> Result<u32, ProbeError> {
    let rate = rate.trim();
    let bad_rate = || ProbeError::Parse(format!("unexpected frame rate: '{}'", rate));

    let (num, den) = rate.split_once('/').ok_or_else(bad_rate)?;
    let num: i64 = num.trim().parse().map_err(|_| bad_rate())?;
    let den: i64 = den.trim().parse().map_err(|_| bad_rate())?;
    if num <= 0 || den <= 0 {
        return Err(bad_rate());
    }

    let rounded_up = (num as f64 / den as f64).ceil();
    if rounded_up < 1.0 || rounded_up > u32::MAX as f64 {
        return Err(bad_rate());
    }
    Ok(rounded_up as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::ProcessOutput;
    use parking_lot::Mutex;
    use std::io;
    use std::path::PathBuf;

    /// Runner that records the spec and replies with a scripted output.
    struct ScriptedRunner {
        reply: io::Result<ProcessOutput>,
        seen: Mutex<Vec<CommandSpec>>,
    }

    impl ScriptedRunner {
        fn replying(stdout: &str) -> Self {
            Self {
                reply: Ok(ProcessOutput {
                    exit_code: 0,
                    stdout: stdout.to_string(),
                    stderr: String::new(),
                }),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn failing(exit_code: i32) -> Self {
            Self {
                reply: Ok(ProcessOutput {
                    exit_code,
                    stdout: String::new(),
                    stderr: "boom".to_string(),
                }),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl CommandRunner for ScriptedRunner {
        fn run(&self, spec: &CommandSpec) -> io::Result<ProcessOutput> {
            self.seen.lock().push(spec.clone());
            match &self.reply {
                Ok(output) => Ok(output.clone()),
                Err(e) => Err(io::Error::new(e.kind(), e.to_string())),
            }
        }
    }

    #[test]
    fn probes_size_and_rounded_up_rate() {
        let runner = ScriptedRunner::replying("1920,1080,24000/1001\n");
        let info = probe_source(
            &runner,
            Path::new("ffprobe"),
            Path::new("/media/clip.mp4"),
        )
        .unwrap();
        assert_eq!(info.dimensions, Dimensions::new(1920, 1080));
        assert_eq!(info.frame_rate, 24);

        let seen = runner.seen.lock();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].program, PathBuf::from("ffprobe"));
        assert_eq!(
            seen[0].args,
            vec![
                "-v",
                "error",
                "-select_streams",
                "v:0",
                "-show_entries",
                "stream=width,height,avg_frame_rate",
                "-of",
                "csv=p=0",
                "/media/clip.mp4",
            ]
        );
    }

    #[test]
    fn nonzero_exit_is_command_failed() {
        let runner = ScriptedRunner::failing(1);
        let err = probe_source(&runner, Path::new("ffprobe"), Path::new("x.mp4")).unwrap_err();
        assert_eq!(err, ProbeError::CommandFailed { exit_code: 1 });
    }

    #[test]
    fn launch_failure_is_reported() {
        let runner = ScriptedRunner {
            reply: Err(io::Error::new(io::ErrorKind::NotFound, "missing")),
            seen: Mutex::new(Vec::new()),
        };
        let err = probe_source(&runner, Path::new("ffprobe"), Path::new("x.mp4")).unwrap_err();
        assert!(matches!(err, ProbeError::Launch(_)));
    }

    #[test]
    fn frame_rates_round_up() {
        assert_eq!(parse_frame_rate("30/1").unwrap(), 30);
        assert_eq!(parse_frame_rate("24000/1001").unwrap(), 24);
        assert_eq!(parse_frame_rate("2997/100").unwrap(), 30);
    }

    #[test]
    fn bad_rates_are_rejected() {
        assert!(parse_frame_rate("0/0").is_err());
        assert!(parse_frame_rate("30").is_err());
        assert!(parse_frame_rate("x/y").is_err());
        assert!(parse_frame_rate("-30/1").is_err());
    }

    #[test]
    fn bad_stream_lines_are_rejected() {
        assert!(parse_stream_line("").is_err());
        assert!(parse_stream_line("1920,1080").is_err());
        assert!(parse_stream_line("1920,1080,30/1,extra").is_err());
        assert!(parse_stream_line("0,1080,30/1").is_err());
        assert!(parse_stream_line("w,h,30/1").is_err());
    }
}
