//! Simulation Orchestrator
//!
//! Drives turn-taking between the interviewer role and a persona agent for
//! one live simulated interview, enforcing turn and time budgets, detecting
//! completion and natural closings, and assembling the final transcript.
//!
//! Failure semantics: any provider error from an interviewer turn aborts the
//! whole live run; the caller restarts the persona from scratch through the
//! deterministic fallback simulator. Participant-side provider failures are
//! absorbed inside the persona agent and never surface here.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use pilot_run_core::{
    ConversationMessage, GuideQuestion, InterviewGuide, Persona, SimulationResult, Speaker,
};
use pilot_run_llm::{ChatMessage, CompletionProvider};

use super::heuristics::{guide_coverage, is_natural_closing, match_question};
use super::state::{SimulationEvent, SimulationState};
use crate::services::demo::ProgressReporter;
use crate::services::evaluation::patterns::{
    contains_any, GENERIC_PROBE_PATTERNS, INSIGHTFUL_PROBE_PATTERNS,
};
use crate::services::evaluation::evaluate_run;
use crate::services::persona::agent::PersonaAgent;
use crate::services::persona::prompt_builder::build_interviewer_system_prompt;
use crate::utils::error::AppResult;

/// Coverage at which the interview may close naturally.
const COVERAGE_TARGET: f64 = 0.7;
/// Turn count past which every turn runs the completion check.
const DENSE_CHECK_AFTER: usize = 25;
/// Turn count past which completion is forced.
const FORCE_COMPLETION_AFTER: usize = 30;
/// Interval between completion checks in the main loop.
const CHECK_INTERVAL: usize = 5;

const NATURAL_CLOSING: &str =
    "Thank you so much for your time! This concludes our interview.";
const FORCED_CLOSING: &str =
    "We're coming up on time, so we'll stop here. Thank you so much for your time!";

/// Budgets for one simulated interview.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Hard cap on transcript turns
    #[serde(default = "default_max_turns")]
    pub max_turns: usize,
    /// Wall-clock budget for the whole run
    #[serde(default = "default_timeout_minutes")]
    pub timeout_minutes: u64,
}

fn default_max_turns() -> usize {
    40
}

fn default_timeout_minutes() -> u64 {
    5
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            max_turns: default_max_turns(),
            timeout_minutes: default_timeout_minutes(),
        }
    }
}

/// Live conversation driver for one persona run.
pub struct SimulationOrchestrator<'a> {
    guide: &'a InterviewGuide,
    brief: &'a str,
    persona: &'a Persona,
    objectives: &'a [String],
    provider: Arc<dyn CompletionProvider>,
    config: SimulationConfig,
}

impl<'a> SimulationOrchestrator<'a> {
    /// Create an orchestrator for one persona run.
    pub fn new(
        guide: &'a InterviewGuide,
        brief: &'a str,
        persona: &'a Persona,
        objectives: &'a [String],
        provider: Arc<dyn CompletionProvider>,
        config: SimulationConfig,
    ) -> Self {
        Self {
            guide,
            brief,
            persona,
            objectives,
            provider,
            config,
        }
    }

    /// Run the interview to conclusion and evaluate the transcript.
    pub async fn run(
        &self,
        rng: StdRng,
        reporter: &ProgressReporter,
    ) -> AppResult<SimulationResult> {
        let started = Instant::now();
        let budget = Duration::from_secs(self.config.timeout_minutes * 60);
        let system = build_interviewer_system_prompt(self.guide, self.brief);

        let mut agent =
            PersonaAgent::new(self.persona.clone(), Some(self.provider.clone()), rng);
        let mut transcript: Vec<ConversationMessage> = Vec::new();
        let mut tagged: HashSet<String> = HashSet::new();
        // Interviewer turns are `assistant`, participant turns `user`.
        let mut llm_history: Vec<ChatMessage> = vec![ChatMessage::user(
            "The participant has just joined the session. Greet them briefly and begin.",
        )];

        let mut state = SimulationState::Opening;
        let mut completed = false;
        let mut dropped_at: Option<String> = None;
        let mut drop_off_reason: Option<String> = None;

        while state.is_active() {
            if transcript.len() >= self.config.max_turns || started.elapsed() >= budget {
                info!(persona = %self.persona.id, turns = transcript.len(), "budget exhausted, run incomplete");
                state = state.transition(SimulationEvent::BudgetExhausted);
                break;
            }

            match state {
                SimulationState::Opening => {
                    let greeting = self.provider.complete(&system, &llm_history).await?;
                    llm_history.push(ChatMessage::assistant(&greeting));
                    self.push_agent_turn(&mut transcript, &mut tagged, greeting);
                    reporter.turn(transcript.len(), &transcript.last_content()).await;
                    state = state.transition(SimulationEvent::GreetingDelivered);
                }

                SimulationState::Interviewing => {
                    let turn_count = transcript.len();
                    if turn_count % CHECK_INTERVAL == 0 || turn_count > DENSE_CHECK_AFTER {
                        let coverage = guide_coverage(self.guide, &transcript);
                        let natural = coverage >= COVERAGE_TARGET;
                        if natural || turn_count > FORCE_COMPLETION_AFTER {
                            debug!(coverage, turn_count, natural, "completion check passed");
                            let closing = if natural {
                                ConversationMessage::agent(NATURAL_CLOSING, Utc::now())
                            } else {
                                ConversationMessage::agent(FORCED_CLOSING, Utc::now()).forced()
                            };
                            transcript.push(closing);
                            reporter.turn(transcript.len(), &transcript.last_content()).await;
                            completed = natural;
                            state = state.transition(SimulationEvent::CompletionReached);
                            continue;
                        }
                    }

                    // Participant reply to the latest interviewer turn.
                    let (last_agent_text, current_question) =
                        self.last_agent_context(&transcript);
                    let reply = agent.respond_to(&last_agent_text, current_question).await;
                    transcript.push(
                        ConversationMessage::user(&reply.response, Utc::now())
                            .with_duration(agent.response_time_seconds()),
                    );
                    reporter.turn(transcript.len(), &transcript.last_content()).await;

                    if !reply.should_continue {
                        dropped_at = current_question.map(|q| q.id.clone());
                        drop_off_reason = reply.drop_off_reason;
                        info!(persona = %self.persona.id, reason = ?drop_off_reason, "participant dropped off");
                        state = state.transition(SimulationEvent::ParticipantDropped);
                        continue;
                    }
                    llm_history.push(ChatMessage::user(&reply.response));

                    // Next interviewer turn; a provider error here aborts the run.
                    let next = self.provider.complete(&system, &llm_history).await?;
                    llm_history.push(ChatMessage::assistant(&next));
                    let closing = is_natural_closing(&next);
                    self.push_agent_turn(&mut transcript, &mut tagged, next);
                    reporter.turn(transcript.len(), &transcript.last_content()).await;

                    if closing {
                        debug!("interviewer closing detected, wrapping up");
                        state = state.transition(SimulationEvent::ClosingDetected);
                    }
                }

                SimulationState::WrappingUp => {
                    // Exactly one farewell, then stop; this handshake is what
                    // keeps goodbyes from looping.
                    let (last_agent_text, _) = self.last_agent_context(&transcript);
                    let reply = agent.respond_to(&last_agent_text, None).await;
                    transcript.push(
                        ConversationMessage::user(&reply.response, Utc::now())
                            .with_duration(agent.response_time_seconds()),
                    );
                    reporter.turn(transcript.len(), &transcript.last_content()).await;
                    // Completion still rests on the coverage check, not on the
                    // interviewer deciding to say goodbye early.
                    completed = guide_coverage(self.guide, &transcript) >= COVERAGE_TARGET;
                    state = state.transition(SimulationEvent::FarewellExchanged);
                }

                SimulationState::Concluded => unreachable!("loop exits on concluded"),
            }
        }

        let now = Utc::now();
        let duration_minutes = match (transcript.first(), transcript.last()) {
            (Some(first), Some(last)) => {
                (last.timestamp - first.timestamp).num_seconds() as f64 / 60.0
            }
            _ => 0.0,
        };
        let metrics = evaluate_run(&transcript, self.guide, self.persona, self.objectives);

        Ok(SimulationResult {
            persona_id: self.persona.id.clone(),
            completed,
            dropped_at,
            drop_off_reason,
            transcript,
            duration_minutes,
            metrics,
            completed_at: now,
        })
    }

    /// Append an interviewer turn, annotating the matched guide question or
    /// probe status.
    fn push_agent_turn(
        &self,
        transcript: &mut Vec<ConversationMessage>,
        tagged: &mut HashSet<String>,
        text: String,
    ) {
        let mut msg = ConversationMessage::agent(text, Utc::now());
        if let Some(question) = match_question(self.guide, &msg.content, tagged) {
            tagged.insert(question.id.clone());
            msg.metadata.question_id = Some(question.id.clone());
        } else if msg.content.contains('?')
            && (contains_any(&msg.content, GENERIC_PROBE_PATTERNS)
                || contains_any(&msg.content, INSIGHTFUL_PROBE_PATTERNS))
        {
            msg.metadata.is_probe = Some(true);
        }
        transcript.push(msg);
    }

    /// The latest interviewer turn text and its matched guide question.
    fn last_agent_context<'g>(
        &'g self,
        transcript: &[ConversationMessage],
    ) -> (String, Option<&'g GuideQuestion>) {
        let last = transcript
            .iter()
            .rev()
            .find(|m| m.role == Speaker::Agent);
        let text = last.map(|m| m.content.clone()).unwrap_or_default();
        let question = last
            .and_then(|m| m.metadata.question_id.as_deref())
            .and_then(|id| self.guide.questions.iter().find(|q| q.id == id));
        (text, question)
    }
}

/// Convenience for progress previews.
trait LastContent {
    fn last_content(&self) -> String;
}

impl LastContent for Vec<ConversationMessage> {
    fn last_content(&self) -> String {
        self.last()
            .map(|m| {
                let mut preview: String = m.content.chars().take(80).collect();
                if m.content.chars().count() > 80 {
                    preview.push('…');
                }
                preview
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::persona::catalog::PersonaCatalog;
    use async_trait::async_trait;
    use pilot_run_llm::{LlmError, LlmResult, ProviderConfig};
    use rand::SeedableRng;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::mpsc;

    /// Scripted provider: pops responses in order, then repeats the last.
    struct ScriptedProvider {
        script: Vec<String>,
        cursor: AtomicUsize,
        fail_at: Option<usize>,
        config: ProviderConfig,
    }

    impl ScriptedProvider {
        fn new(script: &[&str]) -> Self {
            Self {
                script: script.iter().map(|s| s.to_string()).collect(),
                cursor: AtomicUsize::new(0),
                fail_at: None,
                config: ProviderConfig::default(),
            }
        }

        fn failing_at(mut self, call: usize) -> Self {
            self.fail_at = Some(call);
            self
        }
    }

    #[async_trait]
    impl CompletionProvider for ScriptedProvider {
        fn name(&self) -> &'static str {
            "scripted"
        }

        fn model(&self) -> &str {
            "scripted-model"
        }

        async fn complete(&self, _system: &str, _messages: &[ChatMessage]) -> LlmResult<String> {
            let call = self.cursor.fetch_add(1, Ordering::SeqCst);
            if self.fail_at == Some(call) {
                return Err(LlmError::ServerError {
                    message: "scripted failure".to_string(),
                    status: Some(500),
                });
            }
            let idx = call.min(self.script.len().saturating_sub(1));
            Ok(self.script[idx].clone())
        }

        async fn health_check(&self) -> LlmResult<()> {
            Ok(())
        }

        fn config(&self) -> &ProviderConfig {
            &self.config
        }
    }

    fn guide() -> InterviewGuide {
        InterviewGuide::new(
            vec![
                GuideQuestion::open("q1", "How do you plan your weekly grocery shopping?"),
                GuideQuestion::open("q2", "What frustrates you about checkout lines today?"),
            ],
            10.0,
        )
    }

    fn reporter() -> (ProgressReporter, mpsc::Receiver<pilot_run_core::ProgressEvent>) {
        let (tx, rx) = mpsc::channel(256);
        (ProgressReporter::new(tx, 0), rx)
    }

    #[tokio::test]
    async fn test_run_completes_when_coverage_reached() {
        // The interviewer script asks both guide questions, so the turn-5
        // completion check finds full coverage and closes naturally.
        let provider = Arc::new(ScriptedProvider::new(&[
            "Welcome! To start: how do you plan your weekly grocery shopping?",
            "Great. And what frustrates you about checkout lines today?",
            "Understood. Anything else about the checkout lines that frustrates you?",
        ]));
        let objectives: Vec<String> = Vec::new();
        let guide = guide();
        let persona = PersonaCatalog::new().get("ideal").unwrap().clone();
        let orchestrator = SimulationOrchestrator::new(
            &guide,
            "Grocery habits study",
            &persona,
            &objectives,
            provider,
            SimulationConfig::default(),
        );
        let (reporter, _rx) = reporter();

        let result = orchestrator
            .run(StdRng::seed_from_u64(1), &reporter)
            .await
            .unwrap();

        assert!(result.completed);
        assert!(result.drop_off_reason.is_none());
        let last = result.transcript.last().unwrap();
        assert_eq!(last.role, Speaker::Agent);
        assert!(last.content.contains("concludes our interview"));
        assert!(last.metadata.forced_completion.is_none());

        // Timestamps never decrease.
        for pair in result.transcript.windows(2) {
            assert!(pair[0].timestamp <= pair[1].timestamp);
        }
    }

    #[tokio::test]
    async fn test_provider_failure_aborts_the_live_run() {
        let provider = Arc::new(
            ScriptedProvider::new(&[
                "Welcome! How do you plan your weekly grocery shopping?",
            ])
            // Call 0 greets; call 1 is the persona agent (absorbed); call 2
            // is the next interviewer turn, which must abort the run.
            .failing_at(2),
        );
        let objectives: Vec<String> = Vec::new();
        let guide = guide();
        let persona = PersonaCatalog::new().get("ideal").unwrap().clone();
        let orchestrator = SimulationOrchestrator::new(
            &guide,
            "",
            &persona,
            &objectives,
            provider,
            SimulationConfig::default(),
        );
        let (reporter, _rx) = reporter();

        let err = orchestrator
            .run(StdRng::seed_from_u64(1), &reporter)
            .await
            .unwrap_err();
        assert!(err.is_provider_failure());
    }

    #[tokio::test]
    async fn test_natural_closing_triggers_wrap_up_handshake() {
        // The second interviewer turn is a goodbye with no question mark, so
        // the run must wrap up with exactly one more participant farewell.
        let provider = Arc::new(ScriptedProvider::new(&[
            "Welcome! How do you plan your weekly grocery shopping?",
            "Thank you so much for your time, this has been wonderful. Goodbye!",
        ]));
        let objectives: Vec<String> = Vec::new();
        let guide = guide();
        let persona = PersonaCatalog::new().get("ideal").unwrap().clone();
        let orchestrator = SimulationOrchestrator::new(
            &guide,
            "",
            &persona,
            &objectives,
            provider,
            SimulationConfig::default(),
        );
        let (reporter, _rx) = reporter();

        let result = orchestrator
            .run(StdRng::seed_from_u64(4), &reporter)
            .await
            .unwrap();

        let last = result.transcript.last().unwrap();
        assert_eq!(last.role, Speaker::User);
        let words = last.content.split_whitespace().count();
        assert!(words <= 10, "farewell was {} words", words);
        // The interviewer bailed after one question, so the coverage-based
        // completion check never passed.
        assert!(!result.completed);
    }

    #[tokio::test]
    async fn test_turn_budget_marks_run_incomplete() {
        // A looping interviewer that never covers the guide.
        let provider = Arc::new(ScriptedProvider::new(&[
            "Welcome! Tell me anything at all.",
            "Interesting. Please continue with whatever comes to mind next, if anything?",
        ]));
        let objectives: Vec<String> = Vec::new();
        let guide = guide();
        let persona = PersonaCatalog::new().get("ideal").unwrap().clone();
        let orchestrator = SimulationOrchestrator::new(
            &guide,
            "",
            &persona,
            &objectives,
            provider,
            SimulationConfig {
                max_turns: 8,
                timeout_minutes: 5,
            },
        );
        let (reporter, _rx) = reporter();

        let result = orchestrator
            .run(StdRng::seed_from_u64(2), &reporter)
            .await
            .unwrap();
        assert!(!result.completed);
        // The budget check runs at the top of the loop, so the transcript can
        // overshoot the cap by at most one exchange.
        assert!(result.transcript.len() <= 9);
        // Metrics still populated for the incomplete run.
        assert!(result.metrics.agent.coverage_rate <= 100.0);
    }
}
