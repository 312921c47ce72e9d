//! Pilot Run Core
//!
//! Foundational domain types for the Pilot Run simulation workspace: the
//! interview guide model, the persona behavior model, the transcript model,
//! simulation results and metrics, and the progress event stream types.
//! This crate has zero dependencies on application-level code (HTTP, LLM
//! providers, async runtime).
//!
//! ## Module Organization
//!
//! - `error` - Core error types (`CoreError`, `CoreResult`)
//! - `guide` - Interview guide input model (`InterviewGuide`, `GuideQuestion`)
//! - `persona` - Synthetic participant profiles (`Persona`, `BehaviorModel`)
//! - `transcript` - Conversation messages (`ConversationMessage`, `Speaker`)
//! - `result` - Simulation output (`SimulationResult`, metrics, recommendations)
//! - `events` - Progress event stream types (`ProgressEvent`)
//!
//! ## Design Principles
//!
//! 1. **Zero external dependencies beyond serde/chrono/thiserror** - keeps build times minimal
//! 2. **Plain data, no I/O** - every type here is constructed and consumed by the engine crate
//! 3. **Unidirectional dependency** - this crate depends on nothing else in the workspace

pub mod error;
pub mod events;
pub mod guide;
pub mod persona;
pub mod result;
pub mod transcript;

// ── Error Types ────────────────────────────────────────────────────────
pub use error::{CoreError, CoreResult};

// ── Guide Model ────────────────────────────────────────────────────────
pub use guide::{GuideQuestion, InterviewGuide, QuestionType};

// ── Persona Model ──────────────────────────────────────────────────────
pub use persona::{BehaviorModel, Comprehension, DetailLevel, Persona, ResponsePatterns};

// ── Transcript Model ───────────────────────────────────────────────────
pub use transcript::{ConversationMessage, MessageMetadata, Speaker};

// ── Simulation Results ─────────────────────────────────────────────────
pub use result::{
    AgentMetrics, BriefMetrics, DemoEvaluation, LengthRealism, MetricAverages, OverallScore,
    QuestionClarity, Recommendation, Severity, SimulationMetrics, SimulationResult,
};

// ── Progress Events ────────────────────────────────────────────────────
pub use events::{PersonaSummary, ProgressEvent};
