//! Pilot Run
//!
//! Simulation-and-evaluation engine for validating AI-moderated interview
//! scripts before they run on real people. A demo request simulates full
//! multi-turn interviews with three synthetic participant archetypes,
//! evaluates every transcript, and aggregates the metrics into
//! severity-ranked recommendations and a readiness verdict.
//!
//! The engine degrades gracefully: with no completion provider configured
//! (or on any mid-run provider failure) a persona's interview is produced by
//! a deterministic offline simulator with the exact same result shape, so
//! downstream consumers never see which path ran.
//!
//! Out of scope here: the guide-building UI, audio capture, auth, dashboard
//! rendering, and persistence — all external collaborators.

pub mod services;
pub mod utils;

pub use services::clock::{Clock, ManualClock, SystemClock};
pub use services::demo::{DemoRunOutcome, DemoRunRequest, DemoRunner, SimulationOverrides};
pub use services::persona::{PersonaAgent, PersonaCatalog, PersonaReply};
pub use services::rate_limit::{RateLimitConfig, RateLimitDecision, RateLimiter};
pub use services::simulation::{
    FallbackSimulator, SimulationConfig, SimulationOrchestrator, SimulationState,
};
pub use utils::error::{AppError, AppResult};
