//! Status hand-off from the conversion worker to the front-end.
//!
//! The worker owns the pipeline and never touches caller state; every
//! update crosses an `mpsc` channel in the order it was emitted, and
//! the single consumer drains it. A run produces zero or more
//! `PhaseChanged` updates followed by exactly one `Finished`.

use std::sync::mpsc;
use std::thread;

use crate::models::{ConversionReport, ConversionRequest};
use crate::runner::CommandRunner;

use super::{ConversionPhase, ConversionPipeline, PipelineError};

/// One message from the worker.
#[derive(Debug, Clone)]
pub enum StatusUpdate {
    /// The run entered a new phase.
    PhaseChanged {
        /// The phase just entered.
        phase: ConversionPhase,
        /// Status line for display.
        message: String,
    },
    /// Terminal message, sent exactly once per run.
    Finished(Result<ConversionReport, PipelineError>),
}

/// Run the pipeline on a background thread, reporting through `sender`.
///
/// At most one conversion may be active at a time; callers wait for
/// `Finished` before launching another.
pub fn spawn_conversion<R>(
    pipeline: ConversionPipeline<R>,
    request: ConversionRequest,
    sender: mpsc::Sender<StatusUpdate>,
) -> thread::JoinHandle<()>
where
    R: CommandRunner + 'static,
{
    thread::spawn(move || {
        let phase_sender = sender.clone();
        let pipeline = pipeline.with_phase_callback(Box::new(move |phase| {
            let _ = phase_sender.send(StatusUpdate::PhaseChanged {
                phase,
                message: phase.message().to_string(),
            });
        }));

        let result = pipeline.run(&request);
        let _ = sender.send(StatusUpdate::Finished(result));
    })
}
