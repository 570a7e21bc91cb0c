//! The two-pass conversion pipeline.
//!
//! A run executes the external binary twice over the same filter chain:
//!
//! ```text
//! GeneratingPalette   ffmpeg [-ss/-to] -i input -vf "<chain>,palettegen" -y palette.png
//! RenderingGif        ffmpeg [-ss/-to] -i input -i palette.png
//!                         -filter_complex "<chain>[x];[x][1:v]paletteuse" -loop 0 -y output
//! ```
//!
//! The second pass consumes the palette produced by the first, so the
//! passes are strictly sequential and a first-pass failure aborts the
//! run. The intermediate palette image is removed on every exit path.

mod errors;
mod status;

pub use errors::{PassKind, PipelineError, PipelineResult};
pub use status::{spawn_conversion, StatusUpdate};

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::filtergraph::FilterGraphBuilder;
use crate::logging::RunLogger;
use crate::models::{ConversionReport, ConversionRequest, TimeRange};
use crate::runner::{CommandRunner, CommandSpec};
use crate::tools::Toolset;

/// Name of the intermediate palette image, created in the working
/// directory and removed when the run ends.
pub const PALETTE_FILENAME: &str = "palette.png";

/// Where a conversion currently stands.
///
/// `Idle → Probing → GeneratingPalette → RenderingGif → Done | Failed`;
/// probing is optional and happens on input selection, not when the
/// conversion starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionPhase {
    /// Nothing running.
    Idle,
    /// Reading source facts with the probing binary.
    Probing,
    /// First pass: generating the palette image.
    GeneratingPalette,
    /// Second pass: rendering the final GIF.
    RenderingGif,
    /// Finished successfully.
    Done,
    /// Finished with an error.
    Failed,
}

impl ConversionPhase {
    /// Status line shown to the user for this phase.
    pub fn message(&self) -> &'static str {
        match self {
            ConversionPhase::Idle => "Ready",
            ConversionPhase::Probing => "Reading video info...",
            ConversionPhase::GeneratingPalette => "Generating palette...",
            ConversionPhase::RenderingGif => "Creating GIF...",
            ConversionPhase::Done => "Conversion completed successfully!",
            ConversionPhase::Failed => "Conversion failed",
        }
    }

    /// True once the run can no longer progress.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ConversionPhase::Done | ConversionPhase::Failed)
    }
}

/// Callback invoked when the run enters a new phase.
pub type PhaseCallback = Box<dyn Fn(ConversionPhase) + Send + Sync>;

/// Removes the palette image when dropped.
///
/// Created before the first pass so the file disappears on every exit
/// path: success, tool failure, or unwind. Removal is best-effort.
struct PaletteGuard {
    path: PathBuf,
}

impl PaletteGuard {
    fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for PaletteGuard {
    fn drop(&mut self) {
        match fs::remove_file(&self.path) {
            Ok(()) => debug!("removed palette file {}", self.path.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!("could not remove {}: {}", self.path.display(), e),
        }
    }
}

/// Runs the two external passes for a single validated request.
pub struct ConversionPipeline<R: CommandRunner> {
    tools: Toolset,
    work_dir: PathBuf,
    runner: R,
    logger: Arc<RunLogger>,
    phase_callback: Option<PhaseCallback>,
}

impl<R: CommandRunner> ConversionPipeline<R> {
    /// Create a pipeline for one run.
    ///
    /// `work_dir` is where the intermediate palette image lives.
    pub fn new(
        tools: Toolset,
        work_dir: impl Into<PathBuf>,
        runner: R,
        logger: Arc<RunLogger>,
    ) -> Self {
        Self {
            tools,
            work_dir: work_dir.into(),
            runner,
            logger,
            phase_callback: None,
        }
    }

    /// Set the phase callback.
    pub fn with_phase_callback(mut self, callback: PhaseCallback) -> Self {
        self.phase_callback = Some(callback);
        self
    }

    /// Path the palette image is written to.
    pub fn palette_path(&self) -> PathBuf {
        self.work_dir.join(PALETTE_FILENAME)
    }

    /// Run both passes to completion.
    ///
    /// Exactly two tool invocations on success; a first-pass failure
    /// skips the second. No retries, no timeout, no cancellation.
    pub fn run(&self, request: &ConversionRequest) -> PipelineResult<ConversionReport> {
        fs::create_dir_all(&self.work_dir).map_err(|e| {
            PipelineError::unexpected(format!(
                "Failed to create working directory {}: {}",
                self.work_dir.display(),
                e
            ))
        })?;

        let graphs = FilterGraphBuilder::new(request);
        let palette = PaletteGuard::new(self.palette_path());

        self.enter_phase(ConversionPhase::GeneratingPalette);
        self.logger.phase("Generating palette");
        let palette_cmd = self.palette_command(request, &graphs, palette.path());
        self.execute(PassKind::Palette, &palette_cmd)?;

        self.enter_phase(ConversionPhase::RenderingGif);
        self.logger.phase("Creating GIF");
        let render_cmd = self.render_command(request, &graphs, palette.path());
        self.execute(PassKind::Render, &render_cmd)?;

        self.logger.success(&format!(
            "GIF created successfully: {}",
            request.output.display()
        ));

        Ok(ConversionReport {
            output_path: request.output.clone(),
            palette_command: palette_cmd.display(),
            render_command: render_cmd.display(),
        })
    }

    /// Pass 1: the shared chain feeding palettegen, writing the
    /// intermediate image.
    fn palette_command(
        &self,
        request: &ConversionRequest,
        graphs: &FilterGraphBuilder<'_>,
        palette: &Path,
    ) -> CommandSpec {
        CommandSpec::new(&self.tools.ffmpeg)
            .args(seek_args(&request.range))
            .arg("-i")
            .arg(request.input.to_string_lossy())
            .arg("-vf")
            .arg(graphs.palette_graph())
            .arg("-y")
            .arg(palette.to_string_lossy())
    }

    /// Pass 2: original input plus the palette image, composited via
    /// paletteuse, looping forever.
    fn render_command(
        &self,
        request: &ConversionRequest,
        graphs: &FilterGraphBuilder<'_>,
        palette: &Path,
    ) -> CommandSpec {
        CommandSpec::new(&self.tools.ffmpeg)
            .args(seek_args(&request.range))
            .arg("-i")
            .arg(request.input.to_string_lossy())
            .arg("-i")
            .arg(palette.to_string_lossy())
            .arg("-filter_complex")
            .arg(graphs.render_graph())
            .args(["-loop", "0"])
            .arg("-y")
            .arg(request.output.to_string_lossy())
    }

    fn execute(&self, pass: PassKind, spec: &CommandSpec) -> PipelineResult<()> {
        self.logger.clear_tail();
        self.logger.command(&spec.display());

        let output = self.runner.run(spec).map_err(|e| {
            PipelineError::unexpected(format!("Failed to launch ffmpeg: {}", e))
        })?;

        for line in output.stdout.lines() {
            self.logger.output_line(line, false);
        }
        for line in output.stderr.lines() {
            self.logger.output_line(line, true);
        }

        if !output.success() {
            self.logger.show_tail("ffmpeg output");
            let err = PipelineError::tool_failure("ffmpeg", pass, output.exit_code);
            self.logger.error(&err.to_string());
            return Err(err);
        }
        Ok(())
    }

    fn enter_phase(&self, phase: ConversionPhase) {
        debug!("entering phase {:?}", phase);
        if let Some(ref callback) = self.phase_callback {
            callback(phase);
        }
    }
}

/// `-ss`/`-to` options for a bounded segment. Seek options precede the
/// input in both passes.
fn seek_args(range: &TimeRange) -> Vec<String> {
    let mut args = Vec::new();
    if let Some(start) = range.start {
        args.push("-ss".to_string());
        args.push(start.to_string());
    }
    if let Some(stop) = range.stop {
        args.push("-to".to_string());
        args.push(stop.to_string());
    }
    args
}
