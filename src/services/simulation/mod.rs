//! Simulation Services
//!
//! The conversation machinery: the explicit state machine, the text
//! heuristics it leans on, the live orchestrator, and the deterministic
//! fallback simulator that replaces it when the generative dependency is
//! unavailable.

pub mod fallback;
pub mod heuristics;
pub mod orchestrator;
pub mod state;

pub use fallback::FallbackSimulator;
pub use orchestrator::{SimulationConfig, SimulationOrchestrator};
pub use state::{SimulationEvent, SimulationState};
