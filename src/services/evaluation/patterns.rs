//! Detection Pattern Lists
//!
//! Fixed phrase lists the evaluators scan transcripts with. Matching is
//! case-insensitive substring containment; the lists are deliberately small
//! and conservative so false positives stay rare.

/// Mild profanity the adversarial evaluator counts.
pub const PROFANITY: &[&str] = &["damn", "hell no", "crap", "bullshit", "stupid question", "wtf"];

/// Words signalling participant frustration.
pub const FRUSTRATION_WORDS: &[&str] = &[
    "annoying",
    "frustrated",
    "frustrating",
    "waste of time",
    "pointless",
    "ridiculous",
    "this isn't working",
];

/// Phrases that introduce an off-topic tangent.
pub const TANGENT_PHRASES: &[&str] = &[
    "by the way",
    "that reminds me",
    "off topic",
    "speaking of",
    "unrelated, but",
    "anyway, the other day",
];

/// Phrases a moderator uses to bring the conversation back.
pub const REDIRECT_PHRASES: &[&str] = &[
    "let's get back",
    "getting back to",
    "returning to",
    "back to the question",
    "let's refocus",
    "circling back",
    "back on track",
];

/// Phrases that refuse a question outright.
pub const REFUSAL_PHRASES: &[&str] = &[
    "i'd rather not",
    "i don't want to answer",
    "skip that",
    "no comment",
    "i won't answer",
    "i'm done here",
    "i think i'm done",
];

/// Graceful acknowledgements of difficult participant behavior.
pub const GRACEFUL_PHRASES: &[&str] = &[
    "no problem",
    "that's completely fine",
    "that's okay",
    "i understand",
    "totally fair",
    "no worries",
    "thanks for being honest",
];

/// Probe phrasings that dig into comparisons, impact, or importance.
pub const INSIGHTFUL_PROBE_PATTERNS: &[&str] = &[
    "compare",
    "compared to",
    "how does that affect",
    "what impact",
    "why is that important",
    "what difference",
    "how did that change",
];

/// Generic elaboration probes.
pub const GENERIC_PROBE_PATTERNS: &[&str] = &[
    "tell me more",
    "can you elaborate",
    "could you expand",
    "anything else",
    "more detail",
];

/// Phrases a confused participant produces.
pub const CONFUSION_PHRASES: &[&str] = &[
    "i don't understand",
    "what do you mean",
    "i'm confused",
    "not sure what you",
    "can you repeat",
    "what does that mean",
    "i'm not sure i follow",
];

/// Phrases a moderator uses when rephrasing a question.
pub const REPHRASE_PHRASES: &[&str] = &[
    "in other words",
    "let me rephrase",
    "put it another way",
    "what i mean is",
    "let me clarify",
    "to clarify",
    "said differently",
];

/// True when the text contains any of the patterns (case-insensitive).
pub fn contains_any(text: &str, patterns: &[&str]) -> bool {
    let lowered = text.to_lowercase();
    patterns.iter().any(|p| lowered.contains(p))
}

/// Number of distinct patterns the text contains (case-insensitive).
pub fn count_matches(text: &str, patterns: &[&str]) -> usize {
    let lowered = text.to_lowercase();
    patterns.iter().filter(|p| lowered.contains(*p)).count()
}
