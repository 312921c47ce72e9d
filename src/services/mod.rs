//! Engine Services
//!
//! Service modules composing the simulation-and-evaluation engine.

pub mod clock;
pub mod demo;
pub mod evaluation;
pub mod persona;
pub mod rate_limit;
pub mod simulation;
