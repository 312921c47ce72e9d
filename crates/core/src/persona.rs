//! Persona Model
//!
//! Immutable definitions of synthetic participant archetypes. The numeric
//! knobs here drive both the live persona agent and the deterministic
//! fallback simulator; nothing in this module has behavior of its own.

use serde::{Deserialize, Serialize};

/// How well the simulated participant understands questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Comprehension {
    High,
    Medium,
    Low,
}

/// How much detail the simulated participant volunteers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailLevel {
    High,
    Medium,
    Low,
}

/// Numeric behavior knobs for a persona.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BehaviorModel {
    /// Question comprehension level
    pub comprehension: Comprehension,
    /// Willingness to engage, 0-100
    pub cooperativeness: u8,
    /// Probability of drifting off topic per answer, 0-1
    pub tangent_rate: f64,
    /// Per-response fatigue accumulation factor
    pub fatigue_rate: f64,
    /// Frustration level at which the persona becomes volatile, 0-100
    pub frustration_threshold: u8,
    /// Probability of asking for clarification, 0-1
    pub clarification_likelihood: f64,
}

/// Shape of the persona's answers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponsePatterns {
    /// Target answer length in words
    pub average_word_count: usize,
    /// How elaborate answers are
    pub detail_level: DetailLevel,
    /// Nominal seconds the persona takes to answer
    pub response_time_seconds: u32,
}

/// A synthetic participant profile.
///
/// Loaded once into the catalog and never mutated; per-run state (fatigue,
/// frustration) lives in the persona agent, not here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Persona {
    /// Stable persona ID (`ideal`, `typical`, `difficult`)
    pub id: String,
    /// Human-readable display name
    pub name: String,
    /// One-line description shown in run summaries
    pub description: String,
    /// Personality traits referenced by generated answers
    pub traits: Vec<String>,
    /// Behavior knobs
    pub behavior_model: BehaviorModel,
    /// Answer shape
    pub response_patterns: ResponsePatterns,
}

impl Persona {
    /// Whether this persona is the difficult archetype.
    ///
    /// The difficult archetype is the only one subject to random frustration
    /// spikes and mid-interview opt-out.
    pub fn is_difficult(&self) -> bool {
        self.id == "difficult"
    }
}
