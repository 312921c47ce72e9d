//! Interview Guide Model
//!
//! Read-only input supplied by the guide-building collaborator. The engine
//! never mutates a guide; it only reads questions and the duration estimate.

use serde::{Deserialize, Serialize};

/// Kind of question in the interview guide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    /// Open-ended main question
    Open,
    /// Closed (yes/no or short-answer) main question
    Closed,
    /// Follow-up probe attached to a prior question
    Probe,
}

/// A single question in the interview guide.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuideQuestion {
    /// Stable question ID (referenced from transcript metadata)
    pub id: String,
    /// The question text as the moderator should ask it
    pub question: String,
    /// Question kind
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    /// Research objective this question serves, if declared
    #[serde(skip_serializing_if = "Option::is_none")]
    pub objective: Option<String>,
    /// Expected time to cover this question, in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_duration_seconds: Option<u32>,
}

impl GuideQuestion {
    /// Create an open question with just an id and text.
    pub fn open(id: impl Into<String>, question: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            question: question.into(),
            question_type: QuestionType::Open,
            objective: None,
            expected_duration_seconds: None,
        }
    }

    /// Attach a research objective.
    pub fn with_objective(mut self, objective: impl Into<String>) -> Self {
        self.objective = Some(objective.into());
        self
    }
}

/// An ordered interview guide.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewGuide {
    /// Questions in the order the moderator should ask them
    pub questions: Vec<GuideQuestion>,
    /// Estimated total interview duration in minutes
    pub estimated_duration_minutes: f64,
}

impl InterviewGuide {
    /// Create a guide from questions and a duration estimate.
    pub fn new(questions: Vec<GuideQuestion>, estimated_duration_minutes: f64) -> Self {
        Self {
            questions,
            estimated_duration_minutes,
        }
    }

    /// Iterate over the main (non-probe) questions in guide order.
    pub fn main_questions(&self) -> impl Iterator<Item = &GuideQuestion> {
        self.questions
            .iter()
            .filter(|q| q.question_type != QuestionType::Probe)
    }

    /// Number of main (non-probe) questions.
    pub fn main_question_count(&self) -> usize {
        self.main_questions().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_main_questions_exclude_probes() {
        let guide = InterviewGuide::new(
            vec![
                GuideQuestion::open("q1", "How do you plan your week?"),
                GuideQuestion {
                    id: "q1-probe".to_string(),
                    question: "Tell me more about that.".to_string(),
                    question_type: QuestionType::Probe,
                    objective: None,
                    expected_duration_seconds: None,
                },
                GuideQuestion::open("q2", "What tools do you rely on?"),
            ],
            15.0,
        );

        assert_eq!(guide.main_question_count(), 2);
        let ids: Vec<&str> = guide.main_questions().map(|q| q.id.as_str()).collect();
        assert_eq!(ids, vec!["q1", "q2"]);
    }

    #[test]
    fn test_question_serialization_uses_type_tag() {
        let q = GuideQuestion::open("q1", "Why?").with_objective("understand motivation");
        let json = serde_json::to_value(&q).unwrap();
        assert_eq!(json["type"], "open");
        assert_eq!(json["objective"], "understand motivation");
    }
}
