//! Brief Quality Evaluator
//!
//! Pure function over a finished transcript and the guide, scoring the
//! interview guide itself: how clearly each question landed, how well the
//! declared objectives are covered, and whether the estimated duration held.

use pilot_run_core::{
    BriefMetrics, Comprehension, ConversationMessage, InterviewGuide, LengthRealism, Persona,
    QuestionClarity, Speaker,
};

use super::agent_performance::{asked_question_ids, transcript_minutes};
use super::patterns::{count_matches, CONFUSION_PHRASES, REPHRASE_PHRASES};

/// Turns after a question inspected for confusion and rephrasing.
const CLARITY_WINDOW: usize = 3;
/// Clarity deduction per confusion phrase.
const CONFUSION_PENALTY: f64 = 3.0;
/// Clarity deduction per rephrase phrase.
const REPHRASE_PENALTY: f64 = 2.0;
/// Variance band (percent) inside which the duration estimate is realistic.
const REALISM_BAND_PERCENT: f64 = 20.0;

/// Evaluate guide quality over one finished transcript.
pub fn evaluate_brief_quality(
    transcript: &[ConversationMessage],
    guide: &InterviewGuide,
    persona: &Persona,
    objectives: &[String],
) -> BriefMetrics {
    let question_clarity = question_clarity_scores(transcript, guide, persona);
    let clarity_index = if question_clarity.is_empty() {
        10.0
    } else {
        question_clarity.iter().map(|q| q.score).sum::<f64>() / question_clarity.len() as f64
    };

    BriefMetrics {
        question_clarity,
        clarity_index,
        objective_coverage: objective_coverage(transcript, guide, objectives),
        length_realism: length_realism(transcript, guide),
    }
}

/// Per-question clarity, scored only for questions that were actually asked.
fn question_clarity_scores(
    transcript: &[ConversationMessage],
    guide: &InterviewGuide,
    persona: &Persona,
) -> Vec<QuestionClarity> {
    let mut scores = Vec::new();

    for question in guide.main_questions() {
        let Some(pos) = transcript.iter().position(|m| {
            m.role == Speaker::Agent
                && m.metadata.is_probe != Some(true)
                && m.metadata.question_id.as_deref() == Some(question.id.as_str())
        }) else {
            continue;
        };

        let window = &transcript[pos + 1..transcript.len().min(pos + 1 + CLARITY_WINDOW)];
        let mut deduction = 0.0;
        for msg in window {
            match msg.role {
                Speaker::User => {
                    deduction +=
                        count_matches(&msg.content, CONFUSION_PHRASES) as f64 * CONFUSION_PENALTY;
                }
                Speaker::Agent => {
                    deduction +=
                        count_matches(&msg.content, REPHRASE_PHRASES) as f64 * REPHRASE_PENALTY;
                }
            }
        }

        let mut score = 10.0 - deduction;
        if deduction > 0.0 {
            // Confusion from a low-comprehension persona is expected; from a
            // high-comprehension one it is a stronger signal about the question.
            match persona.behavior_model.comprehension {
                Comprehension::Low => score += 1.0,
                Comprehension::High => score -= 2.0,
                Comprehension::Medium => {}
            }
        }

        scores.push(QuestionClarity {
            question_id: question.id.clone(),
            score: score.clamp(0.0, 10.0),
        });
    }

    scores
}

/// Percent of declared objectives addressed by asked questions, 0-100.
fn objective_coverage(
    transcript: &[ConversationMessage],
    guide: &InterviewGuide,
    objectives: &[String],
) -> f64 {
    if objectives.is_empty() {
        return 0.0;
    }
    let asked = asked_question_ids(transcript);

    let per_objective: Vec<f64> = objectives
        .iter()
        .map(|objective| {
            let needle = objective.to_lowercase();
            let related: Vec<&str> = guide
                .main_questions()
                .filter(|q| {
                    q.objective
                        .as_deref()
                        .is_some_and(|o| o.to_lowercase().contains(&needle))
                })
                .map(|q| q.id.as_str())
                .collect();
            if related.is_empty() {
                return 0.0;
            }
            let hit = related.iter().filter(|id| asked.contains(**id)).count();
            hit as f64 / related.len() as f64
        })
        .collect();

    per_objective.iter().sum::<f64>() / per_objective.len() as f64 * 100.0
}

/// Compare the transcript-derived duration against the guide's estimate.
fn length_realism(transcript: &[ConversationMessage], guide: &InterviewGuide) -> LengthRealism {
    let actual_minutes = transcript_minutes(transcript);
    let estimated_minutes = guide.estimated_duration_minutes;
    let variance_percent = if estimated_minutes > 0.0 {
        (actual_minutes - estimated_minutes) / estimated_minutes * 100.0
    } else {
        0.0
    };

    LengthRealism {
        estimated_minutes,
        actual_minutes,
        variance_percent,
        realistic: variance_percent.abs() <= REALISM_BAND_PERCENT,
    }
}
