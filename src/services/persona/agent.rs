//! Persona Agent
//!
//! Stateful per-run driver for one simulated participant. Tracks fatigue and
//! frustration across the session, decides whether the participant keeps
//! going, and produces each reply either through the configured completion
//! provider or through the deterministic template path.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::Rng;
use tracing::{debug, warn};

use pilot_run_core::{Comprehension, GuideQuestion, Persona};
use pilot_run_llm::{ChatMessage, CompletionProvider};

use super::prompt_builder::build_participant_system_prompt;
use super::template;
use crate::services::simulation::heuristics::is_natural_closing;

/// Fatigue added per response is `fatigue_rate * FATIGUE_STEP`.
const FATIGUE_STEP: f64 = 10.0;
/// Fatigue level beyond which a low-cooperativeness persona disengages.
const FATIGUE_DROP_OFF: f64 = 85.0;
/// Cooperativeness below which fatigue alone ends the session.
const COOPERATIVENESS_FLOOR: u8 = 70;
/// Chance per response of a frustration spike (difficult archetype only).
const FRUSTRATION_SPIKE_CHANCE: f64 = 0.15;
/// Size of a frustration spike.
const FRUSTRATION_SPIKE: f64 = 15.0;
/// Margin over the persona threshold before frustration ends the session.
const FRUSTRATION_MARGIN: f64 = 30.0;

/// One reply from the simulated participant.
#[derive(Debug, Clone)]
pub struct PersonaReply {
    /// The participant's message text
    pub response: String,
    /// False when the participant just disengaged
    pub should_continue: bool,
    /// Why the participant disengaged, when they did
    pub drop_off_reason: Option<String>,
}

/// Per-run participant driver.
pub struct PersonaAgent {
    persona: Persona,
    provider: Option<Arc<dyn CompletionProvider>>,
    rng: StdRng,
    current_fatigue: f64,
    current_frustration: f64,
    questions_answered: usize,
    /// Role-tagged mirror of the transcript, used as generation context.
    /// Interviewer turns are `user`, the persona's own turns `assistant`.
    history: Vec<ChatMessage>,
}

impl PersonaAgent {
    /// Create an agent for one persona run.
    ///
    /// `provider` being `None` means the deterministic template path is used
    /// for every reply.
    pub fn new(
        persona: Persona,
        provider: Option<Arc<dyn CompletionProvider>>,
        rng: StdRng,
    ) -> Self {
        Self {
            persona,
            provider,
            rng,
            current_fatigue: 0.0,
            current_frustration: 0.0,
            questions_answered: 0,
            history: Vec::new(),
        }
    }

    /// Current fatigue level, 0-100+.
    pub fn current_fatigue(&self) -> f64 {
        self.current_fatigue
    }

    /// Current frustration level, 0-100+.
    pub fn current_frustration(&self) -> f64 {
        self.current_frustration
    }

    /// Number of interviewer messages answered so far.
    pub fn questions_answered(&self) -> usize {
        self.questions_answered
    }

    /// Produce the participant's reply to an interviewer message.
    ///
    /// `question` is the guide question the interviewer message was matched
    /// to, when one was; it only shapes the deterministic template path.
    pub async fn respond_to(
        &mut self,
        agent_message: &str,
        question: Option<&GuideQuestion>,
    ) -> PersonaReply {
        self.questions_answered += 1;
        self.current_fatigue += self.persona.behavior_model.fatigue_rate * FATIGUE_STEP;

        if self.persona.is_difficult() && self.rng.gen_bool(FRUSTRATION_SPIKE_CHANCE) {
            self.current_frustration += FRUSTRATION_SPIKE;
        }

        // Drop-off checks run before any content is generated.
        if self.current_fatigue > FATIGUE_DROP_OFF
            && self.persona.behavior_model.cooperativeness < COOPERATIVENESS_FLOOR
        {
            debug!(persona = %self.persona.id, fatigue = self.current_fatigue, "participant dropping off");
            return self.disengage(
                template::FATIGUE_FAREWELL,
                "Fatigue and low cooperativeness",
                agent_message,
            );
        }
        let frustration_limit =
            f64::from(self.persona.behavior_model.frustration_threshold) + FRUSTRATION_MARGIN;
        if self.current_frustration > frustration_limit {
            debug!(persona = %self.persona.id, frustration = self.current_frustration, "participant dropping off");
            return self.disengage(
                template::FRUSTRATION_FAREWELL,
                "High frustration",
                agent_message,
            );
        }

        // Goodbye guard: a closing from the interviewer gets one short
        // farewell and nothing else, so goodbyes cannot loop.
        let response = if is_natural_closing(agent_message) {
            template::short_goodbye(&self.persona)
        } else {
            self.generate(agent_message, question).await
        };

        self.history.push(ChatMessage::user(agent_message));
        self.history.push(ChatMessage::assistant(&response));

        PersonaReply {
            response,
            should_continue: true,
            drop_off_reason: None,
        }
    }

    /// Nominal seconds this persona takes per answer.
    pub fn response_time_seconds(&self) -> u32 {
        self.persona.response_patterns.response_time_seconds
    }

    fn disengage(&mut self, farewell: &str, reason: &str, agent_message: &str) -> PersonaReply {
        self.history.push(ChatMessage::user(agent_message));
        self.history.push(ChatMessage::assistant(farewell));
        PersonaReply {
            response: farewell.to_string(),
            should_continue: false,
            drop_off_reason: Some(reason.to_string()),
        }
    }

    async fn generate(&mut self, agent_message: &str, question: Option<&GuideQuestion>) -> String {
        if let Some(provider) = self.provider.clone() {
            let system = build_participant_system_prompt(
                &self.persona,
                self.current_fatigue,
                self.current_frustration,
            );
            let mut messages = self.history.clone();
            messages.push(ChatMessage::user(agent_message));

            match provider.complete(&system, &messages).await {
                Ok(text) => return text,
                Err(e) => {
                    // A participant-side call failure never fails the run.
                    warn!(persona = %self.persona.id, error = %e, "completion failed, using template reply");
                }
            }
        }
        self.template_reply(agent_message, question)
    }

    fn template_reply(&mut self, agent_message: &str, question: Option<&GuideQuestion>) -> String {
        // Low comprehension sometimes asks for the question again instead of
        // answering it.
        if self.persona.behavior_model.comprehension == Comprehension::Low
            && self
                .rng
                .gen_bool(self.persona.behavior_model.clarification_likelihood.clamp(0.0, 1.0))
        {
            return "Sorry, I don't understand what you mean by that. Can you repeat it?"
                .to_string();
        }

        let adhoc;
        let q = match question {
            Some(q) => q,
            None => {
                adhoc = GuideQuestion::open("adhoc", agent_message);
                &adhoc
            }
        };
        let mut reply = template::templated_answer(&self.persona, q, &mut self.rng);
        if self
            .rng
            .gen_bool(self.persona.behavior_model.tangent_rate.clamp(0.0, 1.0))
        {
            reply.push_str(&template::tangent_sentence(&self.persona, &mut self.rng));
        }
        reply
    }
}
