//! Simulation Results and Metrics
//!
//! Output types produced by the simulators and evaluators. All of these are
//! derived, stateless values: computed once from a finished transcript and
//! never mutated afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::transcript::ConversationMessage;

/// Moderator-behavior metrics computed from a finished transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentMetrics {
    /// Percent of main guide questions detected as asked, 0-100
    pub coverage_rate: f64,
    /// Elapsed minutes between first and last transcript timestamp
    pub average_time_minutes: f64,
    /// (actual - estimated) / estimated x 100
    pub time_variance_percent: f64,
    /// How gracefully the moderator handled tangents/profanity/refusals, 0-10
    pub adversarial_score: f64,
    /// Quality of follow-up probes, 0-10
    pub probing_quality: f64,
    /// Number of off-topic tangents the participant produced
    pub tangent_count: usize,
}

/// Per-question clarity score.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionClarity {
    /// Guide question ID
    pub question_id: String,
    /// Clarity score, 0-10
    pub score: f64,
}

/// Whether the simulated duration matched the guide's estimate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LengthRealism {
    /// Guide's estimated duration in minutes
    pub estimated_minutes: f64,
    /// Transcript-derived actual duration in minutes
    pub actual_minutes: f64,
    /// (actual - estimated) / estimated x 100
    pub variance_percent: f64,
    /// True when |variance| <= 20%
    pub realistic: bool,
}

/// Guide-quality metrics computed from a finished transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BriefMetrics {
    /// Clarity score per asked question
    pub question_clarity: Vec<QuestionClarity>,
    /// Mean clarity across asked questions, 0-10
    pub clarity_index: f64,
    /// Percent of declared objectives addressed by asked questions, 0-100
    pub objective_coverage: f64,
    /// Duration realism check
    pub length_realism: LengthRealism,
}

/// Both metric families for one persona run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationMetrics {
    /// Moderator-behavior metrics
    pub agent: AgentMetrics,
    /// Guide-quality metrics
    pub brief: BriefMetrics,
}

/// The outcome of one persona's simulated interview.
///
/// Metrics are always populated, including for dropped-off or forcibly
/// terminated runs; a partial transcript is valid evaluation input.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    /// Persona that was simulated
    pub persona_id: String,
    /// True iff the coverage-based completion check passed before any
    /// forced or time-based termination fired
    pub completed: bool,
    /// Guide question in play when the participant dropped off
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dropped_at: Option<String>,
    /// Why the participant disengaged, when they did
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drop_off_reason: Option<String>,
    /// Full conversation transcript
    pub transcript: Vec<ConversationMessage>,
    /// Simulated interview duration in minutes
    pub duration_minutes: f64,
    /// Evaluator output for this run
    pub metrics: SimulationMetrics,
    /// When the run finished
    pub completed_at: DateTime<Utc>,
}

/// Recommendation severity, ordered most severe first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Warning,
    Suggestion,
}

/// One actionable finding aggregated across persona runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    /// How urgent the finding is
    #[serde(rename = "type")]
    pub severity: Severity,
    /// Metric family the finding belongs to (coverage, clarity, pacing, ...)
    pub category: String,
    /// Short headline
    pub title: String,
    /// What was observed
    pub description: String,
    /// Why it matters for the real study
    pub impact: String,
    /// What the researcher should change
    pub actionable: String,
    /// Guide questions implicated, when specific ones are
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affected_questions: Option<Vec<String>>,
}

/// Per-metric averages across the three persona runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricAverages {
    pub coverage_rate: f64,
    pub time_variance_percent: f64,
    pub clarity_index: f64,
    pub objective_coverage: f64,
    pub adversarial_score: f64,
    pub probing_quality: f64,
}

/// Composite readiness scores.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallScore {
    /// Moderator readiness, 0-10
    pub agent_score: f64,
    /// Guide readiness, 0-10
    pub brief_score: f64,
    /// True when both scores pass and no critical recommendations exist
    pub ready_to_launch: bool,
}

/// Aggregate evaluation over all persona runs in a demo request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoEvaluation {
    /// Per-metric averages
    pub averages: MetricAverages,
    /// Question IDs whose clarity fell below 5 for any persona
    pub high_risk_questions: Vec<String>,
    /// Findings sorted critical, warning, suggestion
    pub recommendations: Vec<Recommendation>,
    /// Composite readiness verdict
    pub overall: OverallScore,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Critical < Severity::Warning);
        assert!(Severity::Warning < Severity::Suggestion);
    }

    #[test]
    fn test_recommendation_serializes_severity_as_type() {
        let rec = Recommendation {
            severity: Severity::Critical,
            category: "coverage".to_string(),
            title: "Low question coverage".to_string(),
            description: "Average coverage was 65%".to_string(),
            impact: "Key topics will go unexplored".to_string(),
            actionable: "Trim or reorder the guide".to_string(),
            affected_questions: None,
        };
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["type"], "critical");
        assert!(json.get("affectedQuestions").is_none());
    }
}
