//! Deterministic Fallback Simulator
//!
//! A self-contained alternate pathway that produces a full, plausible
//! transcript and result without any external dependency. Used whenever the
//! generative dependency is unconfigured or failed mid-run; downstream
//! consumers cannot tell which path produced a result.

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::Rng;
use tracing::debug;

use pilot_run_core::{
    ConversationMessage, DetailLevel, InterviewGuide, Persona, SimulationResult,
};

use crate::services::clock::Clock;
use crate::services::evaluation::evaluate_run;
use crate::services::persona::template;

/// Transcript length after which the difficult archetype may opt out.
const OPT_OUT_TURN: usize = 6;
/// Per-question opt-out chance once eligible.
const OPT_OUT_CHANCE: f64 = 0.3;
/// Drop-off reason recorded on an early opt-out.
const OPT_OUT_REASON: &str = "Participant opted out mid-interview";

/// Seconds an agent turn advances the simulated clock.
const AGENT_TURN_SECONDS: i64 = 4;

/// Offline simulator for one persona run.
pub struct FallbackSimulator<'a> {
    guide: &'a InterviewGuide,
    persona: &'a Persona,
    objectives: &'a [String],
    clock: &'a dyn Clock,
}

impl<'a> FallbackSimulator<'a> {
    /// Create a simulator over the given guide and persona.
    pub fn new(
        guide: &'a InterviewGuide,
        persona: &'a Persona,
        objectives: &'a [String],
        clock: &'a dyn Clock,
    ) -> Self {
        Self {
            guide,
            persona,
            objectives,
            clock,
        }
    }

    /// Produce a complete simulation result.
    ///
    /// Ends with both evaluators run over the assembled transcript, exactly
    /// like the live path.
    pub fn run(&self, rng: &mut StdRng) -> SimulationResult {
        let mut transcript: Vec<ConversationMessage> = Vec::new();
        let mut now = self.clock.now();
        let started_at = now;

        let behavior = &self.persona.behavior_model;
        let patterns = &self.persona.response_patterns;

        push_agent(
            &mut transcript,
            &mut now,
            format!(
                "Hi, thanks for making the time today! I have {} questions about your \
                 experiences, and there are no wrong answers. Ready when you are.",
                self.guide.main_question_count()
            ),
        );

        let mut dropped_at = None;
        let mut drop_off_reason = None;
        let mut tangent_pending = false;

        for question in self.guide.main_questions() {
            // Only the difficult archetype walks out mid-interview, and only
            // once the session has been going for a while.
            if transcript.len() >= OPT_OUT_TURN
                && self.persona.is_difficult()
                && rng.gen_bool(OPT_OUT_CHANCE)
            {
                debug!(persona = %self.persona.id, question = %question.id, "fallback participant opting out");
                push_user(
                    &mut transcript,
                    &mut now,
                    "You know what, I think I'm done here. Sorry.".to_string(),
                    patterns.response_time_seconds,
                );
                dropped_at = Some(question.id.clone());
                drop_off_reason = Some(OPT_OUT_REASON.to_string());
                break;
            }

            let question_text = if tangent_pending {
                format!("Let's get back on track. {}", question.question)
            } else {
                question.question.clone()
            };
            tangent_pending = false;
            now += Duration::seconds(AGENT_TURN_SECONDS);
            transcript.push(
                ConversationMessage::agent(question_text, now).with_question_id(&question.id),
            );

            let mut answer = template::templated_answer(self.persona, question, rng);
            if behavior.tangent_rate > 0.3 {
                answer.push_str(&template::tangent_sentence(self.persona, rng));
                tangent_pending = true;
            }
            push_user(&mut transcript, &mut now, answer, patterns.response_time_seconds);

            if patterns.detail_level != DetailLevel::Low {
                let probe_text = if rng.gen_bool(0.5) {
                    "How does that compare to what you expected going in?"
                } else {
                    "Could you tell me more about that?"
                };
                now += Duration::seconds(AGENT_TURN_SECONDS);
                transcript.push(
                    ConversationMessage::agent(probe_text, now)
                        .with_question_id(&question.id)
                        .as_probe(),
                );

                push_user(
                    &mut transcript,
                    &mut now,
                    template::elaboration_answer(self.persona),
                    patterns.response_time_seconds,
                );
            }
        }

        let completed = drop_off_reason.is_none();
        if completed {
            push_agent(
                &mut transcript,
                &mut now,
                "Thank you so much for your time! This concludes our interview.".to_string(),
            );
        }

        let duration_minutes = (now - started_at).num_seconds() as f64 / 60.0;
        let metrics = evaluate_run(&transcript, self.guide, self.persona, self.objectives);

        SimulationResult {
            persona_id: self.persona.id.clone(),
            completed,
            dropped_at,
            drop_off_reason,
            transcript,
            duration_minutes,
            metrics,
            completed_at: now,
        }
    }
}

fn push_agent(transcript: &mut Vec<ConversationMessage>, now: &mut DateTime<Utc>, content: String) {
    *now += Duration::seconds(AGENT_TURN_SECONDS);
    transcript.push(ConversationMessage::agent(content, *now));
}

fn push_user(
    transcript: &mut Vec<ConversationMessage>,
    now: &mut DateTime<Utc>,
    content: String,
    response_time_seconds: u32,
) {
    let words = content.split_whitespace().count() as i64;
    *now += Duration::seconds(i64::from(response_time_seconds) + words / 4);
    transcript.push(
        ConversationMessage::user(content, *now).with_duration(response_time_seconds),
    );
}
