//! Persona Prompt Builder
//!
//! Builds system prompts for the two live roles: the simulated participant
//! (persona agent) and the interviewer driver.

use pilot_run_core::{Comprehension, DetailLevel, InterviewGuide, Persona};

/// Build the system prompt for the simulated participant.
///
/// Embeds the persona profile plus the agent's current fatigue/frustration
/// bands so the model degrades the participant naturally over a session.
pub fn build_participant_system_prompt(
    persona: &Persona,
    current_fatigue: f64,
    current_frustration: f64,
) -> String {
    let mut parts = Vec::with_capacity(6);

    parts.push(format!(
        "You are playing a research interview participant: {} — {}.",
        persona.name, persona.description
    ));

    if !persona.traits.is_empty() {
        parts.push(format!(
            "\n## Your Personality\n{}",
            persona
                .traits
                .iter()
                .map(|t| format!("- {}", t))
                .collect::<Vec<_>>()
                .join("\n")
        ));
    }

    parts.push(format!(
        "\n## Behavior\n- Comprehension: {}\n- Cooperativeness: {}/100\n- Tendency to go off on tangents: {:.0}%\n- Likelihood of asking for clarification: {:.0}%",
        comprehension_label(persona.behavior_model.comprehension),
        persona.behavior_model.cooperativeness,
        persona.behavior_model.tangent_rate * 100.0,
        persona.behavior_model.clarification_likelihood * 100.0,
    ));

    parts.push(format!(
        "\n## Current State\n- Fatigue: {}\n- Frustration: {}",
        fatigue_band(current_fatigue),
        frustration_band(current_frustration),
    ));

    parts.push(format!(
        "\n## Answer Style\nAnswer in roughly {} words with {} detail. Stay in character; never mention that you are simulated.",
        persona.response_patterns.average_word_count,
        detail_label(persona.response_patterns.detail_level),
    ));

    parts.push(
        "\n## Closing Rule\nIf the interviewer says goodbye or wraps up, reply with a single short farewell of 5-10 words. No questions, no new topics."
            .to_string(),
    );

    parts.join("\n")
}

/// Build the system prompt for the interviewer driver.
///
/// The interviewer works through the guide one question at a time, probes
/// occasionally, and closes once the guide is covered.
pub fn build_interviewer_system_prompt(guide: &InterviewGuide, brief: &str) -> String {
    let mut parts = Vec::with_capacity(4);

    parts.push(
        "You are a warm, professional research interview moderator conducting a one-on-one interview."
            .to_string(),
    );

    if !brief.is_empty() {
        parts.push(format!("\n## Study Context\n{}", brief));
    }

    let questions = guide
        .main_questions()
        .enumerate()
        .map(|(i, q)| format!("{}. {}", i + 1, q.question))
        .collect::<Vec<_>>()
        .join("\n");
    parts.push(format!(
        "\n## Interview Guide\nWork through these questions in order, one per message:\n{}",
        questions
    ));

    parts.push(
        "\n## Style\nAsk exactly one question per message. Briefly acknowledge the previous \
         answer first. Probe deeper when an answer is vague or interesting. If the participant \
         drifts off topic, gently bring them back. Once every question has been covered, thank \
         them and end the interview with a short closing message that contains no question."
            .to_string(),
    );

    parts.join("\n")
}

fn comprehension_label(c: Comprehension) -> &'static str {
    match c {
        Comprehension::High => "high — you understand questions immediately",
        Comprehension::Medium => "medium — you occasionally need a question restated",
        Comprehension::Low => "low — you often misread what is being asked",
    }
}

fn detail_label(d: DetailLevel) -> &'static str {
    match d {
        DetailLevel::High => "rich",
        DetailLevel::Medium => "moderate",
        DetailLevel::Low => "minimal",
    }
}

fn fatigue_band(fatigue: f64) -> &'static str {
    if fatigue > 70.0 {
        "worn out — your answers are getting shorter and flatter"
    } else if fatigue > 40.0 {
        "tiring — you still answer, but with less energy"
    } else {
        "fresh"
    }
}

fn frustration_band(frustration: f64) -> &'static str {
    if frustration > 50.0 {
        "irritated — it shows in your tone"
    } else if frustration > 20.0 {
        "mildly annoyed"
    } else {
        "calm"
    }
}
