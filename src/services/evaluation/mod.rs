//! Evaluation Services
//!
//! Pure evaluators over finished transcripts. There is exactly one metric
//! implementation: both the live orchestrator and the deterministic fallback
//! feed the same `ConversationMessage` shape through `evaluate_run`, so the
//! two generation paths can never drift apart on scoring.

pub mod agent_performance;
pub mod brief_quality;
pub mod patterns;
pub mod recommendation;

use pilot_run_core::{ConversationMessage, InterviewGuide, Persona, SimulationMetrics};

pub use agent_performance::evaluate_agent_performance;
pub use brief_quality::evaluate_brief_quality;
pub use recommendation::evaluate_demo;

/// Run both evaluators over one finished transcript.
pub fn evaluate_run(
    transcript: &[ConversationMessage],
    guide: &InterviewGuide,
    persona: &Persona,
    objectives: &[String],
) -> SimulationMetrics {
    SimulationMetrics {
        agent: evaluate_agent_performance(transcript, guide),
        brief: evaluate_brief_quality(transcript, guide, persona, objectives),
    }
}
