//! Demo Run Services
//!
//! The request-level driver: validates the demo request, consults the rate
//! limiter, runs all three catalog personas sequentially (live or fallback),
//! evaluates, and pushes ordered progress events to the caller.

pub mod runner;

use tokio::sync::mpsc;
use tracing::debug;

use pilot_run_core::ProgressEvent;

pub use runner::{DemoRunOutcome, DemoRunRequest, DemoRunner, SimulationOverrides};

/// Per-persona progress emitter handed to the simulators.
///
/// Send failures mean the consumer dropped the stream; they are logged and
/// otherwise ignored so an abandoned client never errors a run mid-flight.
pub struct ProgressReporter {
    tx: mpsc::Sender<ProgressEvent>,
    index: usize,
}

impl ProgressReporter {
    /// Create a reporter bound to one persona index.
    pub fn new(tx: mpsc::Sender<ProgressEvent>, index: usize) -> Self {
        Self { tx, index }
    }

    /// Report a transcript turn (or a progress note) for this persona.
    pub async fn turn(&self, turn: usize, message: &str) {
        let event = ProgressEvent::PersonaProgress {
            index: self.index,
            turn,
            message: message.to_string(),
        };
        if self.tx.send(event).await.is_err() {
            debug!(index = self.index, "progress receiver dropped");
        }
    }
}
