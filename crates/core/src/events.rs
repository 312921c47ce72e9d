//! Progress Event Types
//!
//! Typed events pushed over the one-directional progress stream while a demo
//! request runs. Events are ordered; the stream terminates on `Complete` or
//! `Error`.

use serde::{Deserialize, Serialize};

use crate::result::{DemoEvaluation, SimulationResult};

/// Minimal persona descriptor announced at stream start.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonaSummary {
    pub id: String,
    pub name: String,
}

/// One event on the demo progress stream.
///
/// Serialized with a `type` tag so the consuming dashboard can dispatch on
/// event kind without knowing the payload shape up front.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProgressEvent {
    /// Stream opened; lists the personas that will run, in order
    Init { personas: Vec<PersonaSummary> },

    /// A persona's simulation is starting
    PersonaStart { index: usize },

    /// A turn landed in a persona's transcript (or a fallback note)
    PersonaProgress {
        index: usize,
        turn: usize,
        message: String,
    },

    /// A persona's simulation finished and was evaluated
    PersonaComplete {
        index: usize,
        duration_minutes: f64,
        messages_count: usize,
    },

    /// A persona's simulation failed even through the fallback path
    PersonaError { index: usize, error: String },

    /// All personas done; aggregate evaluation is running
    Evaluating,

    /// Terminal: full results and the aggregate evaluation
    Complete {
        results: Vec<SimulationResult>,
        evaluation: DemoEvaluation,
        demo_id: String,
    },

    /// Terminal: the request failed before producing results
    Error { message: String },
}
