//! Agent Performance Evaluator
//!
//! Pure function over a finished transcript and the guide, computing
//! quantitative metrics about moderator behavior: question coverage, timing,
//! adversarial handling, and probing quality.

use std::collections::HashSet;

use pilot_run_core::{AgentMetrics, ConversationMessage, InterviewGuide, Speaker};

use super::patterns::{
    contains_any, FRUSTRATION_WORDS, GRACEFUL_PHRASES, INSIGHTFUL_PROBE_PATTERNS, PROFANITY,
    REDIRECT_PHRASES, REFUSAL_PHRASES, TANGENT_PHRASES,
};

/// Score granted per graceful-handling occurrence.
const GRACEFUL_POINTS: f64 = 0.5;
/// Cap on graceful-handling points.
const GRACEFUL_CAP: f64 = 2.0;
/// Probing score when the transcript contains no probe turns.
const NEUTRAL_PROBING_SCORE: f64 = 5.0;

/// Evaluate moderator behavior over one finished transcript.
///
/// Works on partial transcripts too: a dropped-off run still gets the full
/// metric set.
pub fn evaluate_agent_performance(
    transcript: &[ConversationMessage],
    guide: &InterviewGuide,
) -> AgentMetrics {
    let actual_minutes = transcript_minutes(transcript);
    let estimated = guide.estimated_duration_minutes;
    let time_variance_percent = if estimated > 0.0 {
        (actual_minutes - estimated) / estimated * 100.0
    } else {
        0.0
    };

    let adversarial = AdversarialCounts::scan(transcript);

    AgentMetrics {
        coverage_rate: coverage_rate(transcript, guide),
        average_time_minutes: actual_minutes,
        time_variance_percent,
        adversarial_score: adversarial.score(),
        probing_quality: probing_quality(transcript),
        tangent_count: adversarial.tangents,
    }
}

/// Elapsed minutes between the first and last transcript timestamp.
pub fn transcript_minutes(transcript: &[ConversationMessage]) -> f64 {
    match (transcript.first(), transcript.last()) {
        (Some(first), Some(last)) => {
            (last.timestamp - first.timestamp).num_seconds() as f64 / 60.0
        }
        _ => 0.0,
    }
}

/// Distinct main-question ids appearing on non-probe agent turns, as a
/// percentage of the guide's main questions.
pub fn coverage_rate(transcript: &[ConversationMessage], guide: &InterviewGuide) -> f64 {
    let total = guide.main_question_count();
    if total == 0 {
        return 100.0;
    }
    let main_ids: HashSet<&str> = guide.main_questions().map(|q| q.id.as_str()).collect();
    let asked: HashSet<&str> = transcript
        .iter()
        .filter(|m| m.role == Speaker::Agent && m.metadata.is_probe != Some(true))
        .filter_map(|m| m.metadata.question_id.as_deref())
        .filter(|id| main_ids.contains(id))
        .collect();
    asked.len() as f64 / total as f64 * 100.0
}

/// The set of main-question ids detected as asked.
pub fn asked_question_ids(transcript: &[ConversationMessage]) -> HashSet<String> {
    transcript
        .iter()
        .filter(|m| m.role == Speaker::Agent && m.metadata.is_probe != Some(true))
        .filter_map(|m| m.metadata.question_id.clone())
        .collect()
}

/// Counts collected from user/agent turn pairs.
#[derive(Debug, Default)]
struct AdversarialCounts {
    tangents: usize,
    redirects: usize,
    profanity: usize,
    profanity_handled: usize,
    refusals: usize,
    graceful: usize,
}

impl AdversarialCounts {
    /// Scan each user turn together with the agent turn that follows it.
    fn scan(transcript: &[ConversationMessage]) -> Self {
        let mut counts = Self::default();

        for (i, msg) in transcript.iter().enumerate() {
            if msg.role != Speaker::User {
                continue;
            }
            let next_agent = transcript
                .get(i + 1)
                .filter(|m| m.role == Speaker::Agent)
                .map(|m| m.content.as_str());

            if contains_any(&msg.content, TANGENT_PHRASES) {
                counts.tangents += 1;
                if next_agent.is_some_and(|t| contains_any(t, REDIRECT_PHRASES)) {
                    counts.redirects += 1;
                }
            }
            if contains_any(&msg.content, PROFANITY) {
                counts.profanity += 1;
                if next_agent.is_some_and(|t| {
                    contains_any(t, GRACEFUL_PHRASES) || contains_any(t, REDIRECT_PHRASES)
                }) {
                    counts.profanity_handled += 1;
                }
            }
            if contains_any(&msg.content, FRUSTRATION_WORDS)
                || contains_any(&msg.content, REFUSAL_PHRASES)
            {
                counts.refusals += 1;
                if next_agent.is_some_and(|t| contains_any(t, GRACEFUL_PHRASES)) {
                    counts.graceful += 1;
                }
            }
        }

        counts
    }

    /// Adversarial handling score, 0-10.
    ///
    /// A run with no adversarial behavior at all scores the default 10: the
    /// moderator cannot mishandle what never happened.
    fn score(&self) -> f64 {
        if self.tangents == 0 && self.profanity == 0 && self.refusals == 0 {
            return 10.0;
        }

        let redirect_ratio = if self.tangents > 0 {
            (self.redirects as f64 / self.tangents as f64).min(1.0)
        } else {
            1.0
        };
        let profanity_ratio = if self.profanity > 0 {
            (self.profanity_handled as f64 / self.profanity as f64).min(1.0)
        } else {
            1.0
        };
        let graceful_points = (self.graceful as f64 * GRACEFUL_POINTS).min(GRACEFUL_CAP);

        (5.0 + 3.0 * redirect_ratio + 2.0 * profanity_ratio + graceful_points).min(10.0)
    }
}

/// Probing quality over agent turns flagged as probes, 0-10.
fn probing_quality(transcript: &[ConversationMessage]) -> f64 {
    let mut probes = 0usize;
    let mut insightful = 0usize;
    let mut relevant = 0usize;

    for (i, msg) in transcript.iter().enumerate() {
        if msg.role != Speaker::Agent || msg.metadata.is_probe != Some(true) {
            continue;
        }
        probes += 1;
        if contains_any(&msg.content, INSIGHTFUL_PROBE_PATTERNS) {
            insightful += 1;
        }
        // A probe immediately following a participant answer is contextually
        // relevant; anything else counts as irrelevant placement.
        if i > 0 && transcript[i - 1].role == Speaker::User {
            relevant += 1;
        }
    }

    if probes == 0 {
        return NEUTRAL_PROBING_SCORE;
    }
    let insightful_rate = insightful as f64 / probes as f64;
    let relevant_rate = relevant as f64 / probes as f64;
    (insightful_rate * 6.0 + relevant_rate * 4.0).min(10.0)
}
