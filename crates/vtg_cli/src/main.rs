//! Video to GIF - command-line front-end
//!
//! Plays the interactive layer's role: it owns the raw field values,
//! probes the source when the input is selected, keeps width and
//! height linked through the aspect engine, feeds everything through
//! the validator, and drains the status channel while the conversion
//! worker runs.

use std::path::{Path, PathBuf};
use std::process;
use std::sync::{mpsc, Arc};

use clap::Parser;

use vtg_core::aspect::AspectRatioEngine;
use vtg_core::config::{ConfigManager, Settings};
use vtg_core::logging::{init_tracing, LogConfig, LogLevel, RunLogger};
use vtg_core::models::{derive_output_path, find_preset, Dimensions, SIZE_PRESETS};
use vtg_core::pipeline::{spawn_conversion, ConversionPipeline, StatusUpdate};
use vtg_core::probe;
use vtg_core::runner::SystemRunner;
use vtg_core::tools::Toolset;
use vtg_core::validate::{self, RawParams};

#[derive(Parser)]
#[command(name = "video-to-gif")]
#[command(version, about = "Convert a slice of a video file into an animated GIF", long_about = None)]
struct Cli {
    /// Input video file
    #[arg(value_name = "INPUT")]
    input: String,

    /// Output GIF path (default: the input with a .gif extension)
    #[arg(short, long)]
    output: Option<String>,

    /// Output width; the height follows while the aspect lock is on
    #[arg(long)]
    width: Option<String>,

    /// Output height; the width follows while the aspect lock is on
    /// (pass both to set an exact size)
    #[arg(long)]
    height: Option<String>,

    /// Output frame rate (default: the probed source rate)
    #[arg(long)]
    fps: Option<String>,

    /// Segment start: seconds, MM:SS or HH:MM:SS
    #[arg(long)]
    start: Option<String>,

    /// Segment stop: seconds, MM:SS or HH:MM:SS
    #[arg(long)]
    to: Option<String>,

    /// Crop region applied before scaling
    #[arg(long, value_name = "W:H:X:Y")]
    crop: Option<String>,

    /// Size preset (360p, 720p, 1080p, square, instagram, story)
    #[arg(long)]
    preset: Option<String>,

    /// Do not keep width and height linked to the aspect ratio
    #[arg(long)]
    no_lock: bool,

    /// Print the final report as JSON
    #[arg(long)]
    json: bool,

    /// Settings file (default: in-memory defaults)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    init_tracing(if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Warn
    });
    tracing::debug!("video-to-gif {} starting", vtg_core::version());

    // Settings: explicit file when given, in-memory defaults otherwise.
    let settings = match &cli.config {
        Some(path) => {
            let mut manager = ConfigManager::new(path);
            if let Err(e) = manager.load_or_create() {
                eprintln!("Warning: Failed to load config: {}. Using defaults.", e);
            }
            manager.settings().clone()
        }
        None => Settings::default(),
    };

    let tools = match Toolset::resolve(&settings.tools) {
        Ok(tools) => tools,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(2);
        }
    };
    tracing::debug!("using ffmpeg at {}", tools.ffmpeg.display());

    // Probe on input selection. Failure is non-fatal: the fields fall
    // back to the configured defaults.
    let runner = SystemRunner;
    let mut engine = AspectRatioEngine::with_defaults(Dimensions::new(
        settings.defaults.width,
        settings.defaults.height,
    ));
    let mut fps_field = settings.defaults.frame_rate.to_string();

    match probe::probe_source(&runner, &tools.ffprobe, Path::new(&cli.input)) {
        Ok(info) => {
            engine.set_source(info.dimensions);
            fps_field = info.frame_rate.to_string();
            tracing::debug!("source: {} @ {} fps", info.dimensions, info.frame_rate);
        }
        Err(e) => {
            tracing::warn!("Could not probe source: {}; using defaults", e);
        }
    }

    if cli.no_lock {
        engine.set_locked(false);
    }

    if let Some(name) = &cli.preset {
        match find_preset(name) {
            Some(preset) => engine.apply_preset(preset.dimensions()),
            None => {
                let names: Vec<&str> = SIZE_PRESETS.iter().map(|p| p.name).collect();
                eprintln!(
                    "Error: unknown preset '{}' (expected one of: {})",
                    name,
                    names.join(", ")
                );
                process::exit(2);
            }
        }
    }

    let (raw_width, raw_height) =
        apply_size_edits(&mut engine, cli.width.as_deref(), cli.height.as_deref());
    let dims = engine.dimensions();
    if let Some(line) = engine.describe() {
        tracing::debug!("{}", line);
    }

    let (use_crop, crop_fields) = match &cli.crop {
        Some(text) => (true, split_crop(text)),
        None => (false, Default::default()),
    };
    let [crop_width, crop_height, crop_x, crop_y] = crop_fields;

    let raw = RawParams {
        input: cli.input.clone(),
        output: cli.output.clone().unwrap_or_else(|| {
            derive_output_path(Path::new(&cli.input))
                .to_string_lossy()
                .into_owned()
        }),
        width: raw_width.unwrap_or_else(|| dims.width.to_string()),
        height: raw_height.unwrap_or_else(|| dims.height.to_string()),
        fps: cli.fps.clone().unwrap_or(fps_field),
        start_time: cli.start.clone().unwrap_or_default(),
        stop_time: cli.to.clone().unwrap_or_default(),
        use_crop,
        crop_width,
        crop_height,
        crop_x,
        crop_y,
    };

    let request = match validate::validate(&raw) {
        Ok(request) => request,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(2);
        }
    };

    let run_name = request
        .input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "conversion".to_string());
    let log_config = if cli.verbose {
        LogConfig::verbose()
    } else {
        LogConfig::from_settings(&settings.logging)
    };
    let logger = match RunLogger::new(&run_name, &settings.paths.logs_folder, log_config, None) {
        Ok(logger) => Arc::new(logger),
        Err(e) => {
            eprintln!("Error: failed to create log file: {}", e);
            process::exit(2);
        }
    };
    tracing::debug!("run log: {}", logger.log_path().display());

    let pipeline = ConversionPipeline::new(tools, &settings.paths.work_dir, runner, logger);

    let (sender, receiver) = mpsc::channel();
    let handle = spawn_conversion(pipeline, request, sender);

    let mut outcome = None;
    for update in receiver {
        match update {
            StatusUpdate::PhaseChanged { message, .. } => {
                // Status lines stay off stdout in JSON mode.
                if cli.json {
                    eprintln!("{}", message);
                } else {
                    println!("{}", message);
                }
            }
            StatusUpdate::Finished(result) => outcome = Some(result),
        }
    }
    let _ = handle.join();

    match outcome {
        Some(Ok(report)) => {
            if cli.json {
                match serde_json::to_string_pretty(&report) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("Error: could not serialize report: {}", e);
                        process::exit(1);
                    }
                }
            } else {
                println!("GIF created successfully: {}", report.output_path.display());
            }
        }
        Some(Err(e)) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
        None => {
            eprintln!("Error: conversion worker exited without reporting");
            process::exit(1);
        }
    }
}

/// Feed raw `--width`/`--height` values through the engine the way the
/// linked fields would: a parseable value updates the engine (deriving
/// the opposite dimension under lock; both at once set an exact size,
/// like a preset). Unparseable text is returned untouched so the
/// validator reports it.
fn apply_size_edits(
    engine: &mut AspectRatioEngine,
    width: Option<&str>,
    height: Option<&str>,
) -> (Option<String>, Option<String>) {
    let parsed_width = width.and_then(|text| text.trim().parse::<u32>().ok());
    let parsed_height = height.and_then(|text| text.trim().parse::<u32>().ok());

    match (parsed_width, parsed_height) {
        (Some(w), Some(h)) => engine.apply_preset(Dimensions::new(w, h)),
        (Some(w), None) => engine.set_width(w),
        (None, Some(h)) => engine.set_height(h),
        (None, None) => {}
    }

    let leftover = |text: Option<&str>, parsed: Option<u32>| match (text, parsed) {
        (Some(text), None) => Some(text.to_string()),
        _ => None,
    };
    (
        leftover(width, parsed_width),
        leftover(height, parsed_height),
    )
}

/// Split a `W:H:X:Y` crop argument into the four raw fields.
///
/// Missing parts stay empty and surplus text sticks to the last field,
/// so malformed values surface through the validator's usual messages.
fn split_crop(text: &str) -> [String; 4] {
    let mut fields: [String; 4] = Default::default();
    for (slot, part) in fields.iter_mut().zip(text.splitn(4, ':')) {
        *slot = part.trim().to_string();
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crop_argument_splits_into_fields() {
        assert_eq!(split_crop("100:100:10:20"), ["100", "100", "10", "20"]);
        assert_eq!(split_crop(" 640 : 360 :0:0"), ["640", "360", "0", "0"]);
    }

    #[test]
    fn short_crop_argument_leaves_fields_empty() {
        assert_eq!(split_crop("100:100"), ["100", "100", "", ""]);
    }

    #[test]
    fn long_crop_argument_keeps_the_surplus() {
        // "20:5" fails integer parsing downstream instead of being
        // silently truncated.
        assert_eq!(split_crop("100:100:10:20:5"), ["100", "100", "10", "20:5"]);
    }

    #[test]
    fn single_width_edit_derives_height() {
        let mut engine = AspectRatioEngine::with_defaults(Dimensions::new(420, 333));
        let (raw_w, raw_h) = apply_size_edits(&mut engine, Some("1280"), None);
        assert_eq!(raw_w, None);
        assert_eq!(raw_h, None);
        assert_eq!(engine.dimensions(), Dimensions::new(1280, 720));
    }

    #[test]
    fn both_edits_set_an_exact_size() {
        let mut engine = AspectRatioEngine::with_defaults(Dimensions::new(420, 333));
        apply_size_edits(&mut engine, Some("640"), Some("480"));
        assert_eq!(engine.dimensions(), Dimensions::new(640, 480));
    }

    #[test]
    fn unparseable_edits_pass_through_for_validation() {
        let mut engine = AspectRatioEngine::with_defaults(Dimensions::new(420, 333));
        let (raw_w, raw_h) = apply_size_edits(&mut engine, Some("abc"), Some("480"));
        assert_eq!(raw_w, Some("abc".to_string()));
        assert_eq!(raw_h, None);
        // The height edit still went through.
        assert_eq!(engine.dimensions().height, 480);
    }
}
