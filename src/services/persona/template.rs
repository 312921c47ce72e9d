//! Deterministic Response Templates
//!
//! The single templating implementation behind both offline generation
//! paths: the persona agent's local fallback and the deterministic fallback
//! simulator. Both paths must only vary in how they assemble the transcript,
//! never in how participant text is synthesized.

use rand::rngs::StdRng;
use rand::Rng;

use pilot_run_core::{DetailLevel, GuideQuestion, Persona};

/// Canned farewell for a fatigue-driven drop-off.
pub const FATIGUE_FAREWELL: &str =
    "I'm sorry, I'm running out of steam here. I think I need to stop. Thanks anyway.";

/// Canned farewell for a frustration-driven drop-off.
pub const FRUSTRATION_FAREWELL: &str =
    "Honestly, this isn't working for me. I'd rather end it here.";

/// Synthesize a persona-flavored answer to a guide question.
///
/// Tone follows the persona's detail level; the body cites one or two of the
/// persona's traits and, when the question declares one, its objective.
pub fn templated_answer(persona: &Persona, question: &GuideQuestion, rng: &mut StdRng) -> String {
    let opener = match persona.response_patterns.detail_level {
        DetailLevel::High => {
            "That's a good question, let me walk you through how I actually think about it. "
        }
        DetailLevel::Medium => "Sure, I can speak to that. ",
        DetailLevel::Low => "Hmm. Okay. ",
    };

    let topic = topic_fragment(&question.question);
    let mut parts = vec![format!("{}When it comes to {}, ", opener, topic)];

    // One or two traits, picked by the seeded RNG so runs are reproducible.
    let trait_count = if persona.traits.len() > 1 && rng.gen_bool(0.5) {
        2
    } else {
        1
    };
    let start = if persona.traits.is_empty() {
        0
    } else {
        rng.gen_range(0..persona.traits.len())
    };
    let cited: Vec<&str> = (0..trait_count)
        .filter_map(|offset| {
            persona
                .traits
                .get((start + offset) % persona.traits.len().max(1))
                .map(|t| t.as_str())
        })
        .collect();
    if !cited.is_empty() {
        parts.push(format!(
            "I'd say being {} shapes a lot of my answer. ",
            cited.join(" and ")
        ));
    }

    match persona.response_patterns.detail_level {
        DetailLevel::High => parts.push(
            "In my day to day it comes up more often than you'd expect, and I've settled into \
             a routine that mostly works, though there are exceptions I could talk about for a \
             while."
                .to_string(),
        ),
        DetailLevel::Medium => {
            parts.push("It comes up fairly often and I have a rough routine for it.".to_string());
        }
        DetailLevel::Low => parts.push("It's not something I think about much.".to_string()),
    }

    if let Some(objective) = &question.objective {
        parts.push(format!(
            " I suppose that gets at {} for you, right?",
            objective.to_lowercase()
        ));
    }

    parts.concat()
}

/// One off-topic sentence appended when the persona drifts.
pub fn tangent_sentence(persona: &Persona, rng: &mut StdRng) -> String {
    let tangents = [
        " By the way, that reminds me of something completely different that happened last week.",
        " Sorry, off topic, but is this the kind of thing other people struggle with too?",
        " Anyway, the other day I ended up talking about this with a friend for an hour.",
    ];
    let pick = rng.gen_range(0..tangents.len());
    let _ = persona;
    tangents[pick].to_string()
}

/// Elaboration answer to a probe, shaped by the persona's detail level.
pub fn elaboration_answer(persona: &Persona) -> String {
    match persona.response_patterns.detail_level {
        DetailLevel::High => "Happily. The longer version is that it took me a few tries to land \
                              on my current approach, and the turning point was realizing what \
                              I was optimizing for in the first place."
            .to_string(),
        DetailLevel::Medium => {
            "Sure. Mostly it comes down to habit and a bit of trial and error.".to_string()
        }
        DetailLevel::Low => "Not much more to say, really.".to_string(),
    }
}

/// Exactly one short farewell (5-10 words), no question, no elaboration.
///
/// Used when the interviewer message is itself a closing, so the goodbye
/// exchange terminates instead of echoing back and forth.
pub fn short_goodbye(persona: &Persona) -> String {
    match persona.response_patterns.detail_level {
        DetailLevel::High => "Thanks so much, this was genuinely enjoyable.".to_string(),
        DetailLevel::Medium => "Thanks, this was fine. Take care.".to_string(),
        DetailLevel::Low => "Okay, thanks. Bye for now.".to_string(),
    }
}

/// Pull a short topic fragment out of a question's text.
fn topic_fragment(question: &str) -> String {
    let cleaned: String = question
        .chars()
        .map(|c| if c == '?' || c == '.' { ' ' } else { c })
        .collect();
    let words: Vec<&str> = cleaned.split_whitespace().collect();
    let content: Vec<&str> = words
        .iter()
        .copied()
        .filter(|w| w.len() > 3)
        .take(4)
        .collect();
    if content.is_empty() {
        "that".to_string()
    } else {
        content.join(" ").to_lowercase()
    }
}
