//! Conversation Heuristics
//!
//! Pure text heuristics used by the orchestrator: keyword-based question
//! coverage and natural-closing detection. Everything here operates on plain
//! strings so the live and fallback paths share one implementation.

use std::collections::HashSet;

use pilot_run_core::{ConversationMessage, InterviewGuide, Speaker};

/// Fraction of a question's keywords that must appear in agent turns for the
/// question to count as asked.
const KEYWORD_OVERLAP_THRESHOLD: f64 = 0.4;

/// Common words excluded from question keywords despite their length.
const STOP_WORDS: &[&str] = &[
    "about", "after", "again", "before", "being", "could", "doing", "every", "going", "least",
    "might", "other", "often", "really", "right", "should", "their", "there", "these", "thing",
    "things", "think", "those", "what's", "where", "which", "while", "would", "your", "yours",
];

/// Phrases that mark an interviewer message as a wrap-up.
const CLOSING_PHRASES: &[&str] = &[
    "that concludes",
    "this concludes",
    "that's all the questions",
    "that is all the questions",
    "we've covered everything",
    "that wraps up",
    "this wraps up",
    "thank you for your time",
    "thank you so much for your time",
    "we're all done",
];

/// Standalone goodbye words.
const GOODBYE_WORDS: &[&str] = &["goodbye", "farewell", "bye for now", "take care", "have a great day"];

/// Gratitude phrases; only treated as a closing in short messages.
const GRATITUDE_PHRASES: &[&str] = &["thank you", "thanks so much", "i appreciate you"];

/// Messages shorter than this many words can close on gratitude alone.
const GRATITUDE_WORD_LIMIT: usize = 20;

/// Extract a question's filtered keywords: lowercase words longer than four
/// characters, minus the stop-list, deduplicated.
pub fn question_keywords(question: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    question
        .split_whitespace()
        .map(|w| {
            w.trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase()
        })
        .filter(|w| w.len() > 4 && !STOP_WORDS.contains(&w.as_str()))
        .filter(|w| seen.insert(w.clone()))
        .collect()
}

/// Fraction of a question's keywords present in the given text.
pub fn keyword_overlap(question: &str, text: &str) -> f64 {
    let keywords = question_keywords(question);
    if keywords.is_empty() {
        return 0.0;
    }
    let text = text.to_lowercase();
    let hits = keywords.iter().filter(|k| text.contains(k.as_str())).count();
    hits as f64 / keywords.len() as f64
}

/// True when any agent turn in the transcript covers the question's keywords.
pub fn question_asked(question: &str, transcript: &[ConversationMessage]) -> bool {
    transcript
        .iter()
        .filter(|m| m.role == Speaker::Agent)
        .any(|m| keyword_overlap(question, &m.content) >= KEYWORD_OVERLAP_THRESHOLD)
}

/// Coverage of the guide's main questions by the transcript so far, 0-1.
///
/// Monotonically non-decreasing as agent turns referencing more distinct
/// questions are appended.
pub fn guide_coverage(guide: &InterviewGuide, transcript: &[ConversationMessage]) -> f64 {
    let total = guide.main_question_count();
    if total == 0 {
        return 1.0;
    }
    let asked = guide
        .main_questions()
        .filter(|q| question_asked(&q.question, transcript))
        .count();
    asked as f64 / total as f64
}

/// Find the guide question an interviewer message is asking, if any.
///
/// Returns the best keyword match at or above the overlap threshold among
/// questions not yet tagged; used to annotate live agent turns.
pub fn match_question<'a>(
    guide: &'a InterviewGuide,
    text: &str,
    already_tagged: &HashSet<String>,
) -> Option<&'a pilot_run_core::GuideQuestion> {
    guide
        .main_questions()
        .filter(|q| !already_tagged.contains(&q.id))
        .map(|q| (q, keyword_overlap(&q.question, text)))
        .filter(|(_, overlap)| *overlap >= KEYWORD_OVERLAP_THRESHOLD)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(q, _)| q)
}

/// Classify an interviewer message as a natural closing.
///
/// A closing has no question mark AND matches a closing phrase, a goodbye
/// word, or a gratitude phrase in a short message.
pub fn is_natural_closing(text: &str) -> bool {
    if text.contains('?') {
        return false;
    }
    let lowered = text.to_lowercase();

    if CLOSING_PHRASES.iter().any(|p| lowered.contains(p)) {
        return true;
    }
    if GOODBYE_WORDS.iter().any(|w| lowered.contains(w)) {
        return true;
    }
    let word_count = text.split_whitespace().count();
    word_count < GRATITUDE_WORD_LIMIT && GRATITUDE_PHRASES.iter().any(|p| lowered.contains(p))
}
