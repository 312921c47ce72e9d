//! Persona Catalog
//!
//! Provides the three built-in participant archetypes. Definitions are
//! immutable: they are constructed once and handed out by reference.

use std::collections::HashMap;

use pilot_run_core::{
    BehaviorModel, Comprehension, DetailLevel, Persona, ResponsePatterns,
};

use crate::utils::error::{AppError, AppResult};

/// Catalog of built-in personas, keyed by id.
///
/// Pure lookup; no side effects. The run order of `all()` is fixed:
/// ideal, typical, difficult.
pub struct PersonaCatalog {
    ordered: Vec<Persona>,
    by_id: HashMap<String, usize>,
}

impl PersonaCatalog {
    /// Build the catalog with the three built-in archetypes.
    pub fn new() -> Self {
        let ordered = vec![Self::ideal(), Self::typical(), Self::difficult()];
        let by_id = ordered
            .iter()
            .enumerate()
            .map(|(i, p)| (p.id.clone(), i))
            .collect();
        Self { ordered, by_id }
    }

    /// Look up a persona by id.
    pub fn get(&self, id: &str) -> AppResult<&Persona> {
        self.by_id
            .get(id)
            .map(|&i| &self.ordered[i])
            .ok_or_else(|| AppError::not_found(format!("Persona not found: {}", id)))
    }

    /// All personas in run order.
    pub fn all(&self) -> &[Persona] {
        &self.ordered
    }

    fn ideal() -> Persona {
        Persona {
            id: "ideal".to_string(),
            name: "Ideal Participant".to_string(),
            description: "Engaged, articulate, and happy to elaborate on every answer".to_string(),
            traits: vec![
                "thoughtful".to_string(),
                "articulate".to_string(),
                "enthusiastic about sharing experiences".to_string(),
            ],
            behavior_model: BehaviorModel {
                comprehension: Comprehension::High,
                cooperativeness: 95,
                tangent_rate: 0.1,
                fatigue_rate: 0.5,
                frustration_threshold: 90,
                clarification_likelihood: 0.05,
            },
            response_patterns: ResponsePatterns {
                average_word_count: 80,
                detail_level: DetailLevel::High,
                response_time_seconds: 8,
            },
        }
    }

    fn typical() -> Persona {
        Persona {
            id: "typical".to_string(),
            name: "Typical Participant".to_string(),
            description: "Cooperative but wanders off topic and tires over a long session"
                .to_string(),
            traits: vec![
                "friendly".to_string(),
                "easily distracted".to_string(),
                "pragmatic".to_string(),
            ],
            behavior_model: BehaviorModel {
                comprehension: Comprehension::Medium,
                cooperativeness: 75,
                tangent_rate: 0.35,
                fatigue_rate: 1.5,
                frustration_threshold: 70,
                clarification_likelihood: 0.2,
            },
            response_patterns: ResponsePatterns {
                average_word_count: 45,
                detail_level: DetailLevel::Medium,
                response_time_seconds: 6,
            },
        }
    }

    fn difficult() -> Persona {
        Persona {
            id: "difficult".to_string(),
            name: "Difficult Participant".to_string(),
            description: "Terse, skeptical, quick to tire and quick to frustrate".to_string(),
            traits: vec![
                "impatient".to_string(),
                "skeptical of research".to_string(),
                "short on time".to_string(),
            ],
            behavior_model: BehaviorModel {
                comprehension: Comprehension::Low,
                cooperativeness: 55,
                tangent_rate: 0.6,
                fatigue_rate: 2.0,
                frustration_threshold: 40,
                clarification_likelihood: 0.4,
            },
            response_patterns: ResponsePatterns {
                average_word_count: 20,
                detail_level: DetailLevel::Low,
                response_time_seconds: 4,
            },
        }
    }
}

impl Default for PersonaCatalog {
    fn default() -> Self {
        Self::new()
    }
}
