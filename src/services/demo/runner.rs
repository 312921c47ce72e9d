//! Demo Runner
//!
//! Entry point for one demo request: the rate-limit gate, the sequential
//! per-persona simulations with live-to-fallback degradation, the
//! evaluators, and the terminal aggregate event.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

use pilot_run_core::{
    DemoEvaluation, InterviewGuide, Persona, PersonaSummary, ProgressEvent, SimulationResult,
};
use pilot_run_llm::CompletionProvider;

use super::ProgressReporter;
use crate::services::clock::Clock;
use crate::services::evaluation::evaluate_demo;
use crate::services::persona::PersonaCatalog;
use crate::services::rate_limit::RateLimiter;
use crate::services::simulation::{FallbackSimulator, SimulationConfig, SimulationOrchestrator};
use crate::utils::error::{AppError, AppResult};

/// Optional budget overrides on a demo request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationOverrides {
    /// Override the per-persona turn cap
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_turns: Option<usize>,
    /// Override the per-persona wall-clock budget
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_minutes: Option<u64>,
}

/// One demo request, as received from the outer API layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoRunRequest {
    /// Project the run is billed against
    pub project_id: String,
    /// The interview guide under test
    pub guide: InterviewGuide,
    /// Study brief/context text fed to the interviewer role
    #[serde(default)]
    pub brief: String,
    /// Declared research objectives
    pub objectives: Vec<String>,
    /// Budget overrides
    #[serde(default)]
    pub overrides: SimulationOverrides,
    /// Seed for the behavior RNG; random when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

/// Everything a finished demo run produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoRunOutcome {
    pub demo_id: String,
    pub results: Vec<SimulationResult>,
    pub evaluation: DemoEvaluation,
}

/// Request-level simulation driver.
///
/// Holds no per-run state; every `run` call is independent and nothing is
/// persisted between requests.
pub struct DemoRunner {
    catalog: PersonaCatalog,
    provider: Option<Arc<dyn CompletionProvider>>,
    rate_limiter: Arc<RateLimiter>,
    clock: Arc<dyn Clock>,
}

impl DemoRunner {
    /// Create a runner.
    ///
    /// `provider` being `None` means every persona runs through the
    /// deterministic fallback simulator; that is a supported mode, not an
    /// error.
    pub fn new(
        provider: Option<Arc<dyn CompletionProvider>>,
        rate_limiter: Arc<RateLimiter>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            catalog: PersonaCatalog::new(),
            provider,
            rate_limiter,
            clock,
        }
    }

    /// Run a full demo request, pushing ordered events to `tx`.
    ///
    /// The stream always terminates with `Complete` or `Error`. The returned
    /// outcome mirrors the terminal `Complete` payload.
    pub async fn run(
        &self,
        request: DemoRunRequest,
        tx: mpsc::Sender<ProgressEvent>,
    ) -> AppResult<DemoRunOutcome> {
        if let Err(e) = validate(&request) {
            send(&tx, ProgressEvent::Error {
                message: e.to_string(),
            })
            .await;
            return Err(e);
        }

        let decision = self.rate_limiter.check(&request.project_id);
        if !decision.allowed {
            let message = decision
                .reason
                .unwrap_or_else(|| "Rate limit exceeded".to_string());
            send(&tx, ProgressEvent::Error {
                message: message.clone(),
            })
            .await;
            return Err(AppError::RateLimited {
                message,
                reset_at: decision.reset_at.unwrap_or_else(|| self.clock.now()),
            });
        }
        self.rate_limiter.increment(&request.project_id);

        let demo_id = Uuid::new_v4().to_string();
        info!(demo_id = %demo_id, project = %request.project_id, "starting demo run");

        let personas: Vec<PersonaSummary> = self
            .catalog
            .all()
            .iter()
            .map(|p| PersonaSummary {
                id: p.id.clone(),
                name: p.name.clone(),
            })
            .collect();
        send(&tx, ProgressEvent::Init { personas }).await;

        let config = SimulationConfig {
            max_turns: request
                .overrides
                .max_turns
                .unwrap_or_else(|| SimulationConfig::default().max_turns),
            timeout_minutes: request
                .overrides
                .timeout_minutes
                .unwrap_or_else(|| SimulationConfig::default().timeout_minutes),
        };
        let base_seed = request.seed.unwrap_or_else(rand::random);

        let mut results: Vec<SimulationResult> = Vec::new();
        for (index, persona) in self.catalog.all().iter().enumerate() {
            if tx.is_closed() {
                info!(demo_id = %demo_id, "progress stream closed, stopping run");
                return Err(AppError::internal("progress stream closed by consumer"));
            }

            send(&tx, ProgressEvent::PersonaStart { index }).await;
            let reporter = ProgressReporter::new(tx.clone(), index);
            let rng = StdRng::seed_from_u64(base_seed.wrapping_add(index as u64));

            match self
                .simulate_persona(&request, persona, &config, rng, &reporter)
                .await
            {
                Ok(result) => {
                    send(&tx, ProgressEvent::PersonaComplete {
                        index,
                        duration_minutes: result.duration_minutes,
                        messages_count: result.transcript.len(),
                    })
                    .await;
                    results.push(result);
                }
                Err(e) => {
                    send(&tx, ProgressEvent::PersonaError {
                        index,
                        error: e.to_string(),
                    })
                    .await;
                }
            }
        }

        send(&tx, ProgressEvent::Evaluating).await;
        let evaluation = evaluate_demo(&results, &request.guide);

        send(&tx, ProgressEvent::Complete {
            results: results.clone(),
            evaluation: evaluation.clone(),
            demo_id: demo_id.clone(),
        })
        .await;

        Ok(DemoRunOutcome {
            demo_id,
            results,
            evaluation,
        })
    }

    /// Run one persona: live when a provider is configured, degrading to the
    /// deterministic fallback on any mid-run dependency failure.
    async fn simulate_persona(
        &self,
        request: &DemoRunRequest,
        persona: &Persona,
        config: &SimulationConfig,
        rng: StdRng,
        reporter: &ProgressReporter,
    ) -> AppResult<SimulationResult> {
        if let Some(provider) = &self.provider {
            let orchestrator = SimulationOrchestrator::new(
                &request.guide,
                &request.brief,
                persona,
                &request.objectives,
                provider.clone(),
                config.clone(),
            );
            match orchestrator.run(rng, reporter).await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    // The live run is abandoned wholesale and the persona
                    // restarts offline; the caller only sees a progress note.
                    warn!(persona = %persona.id, error = %e, "live run failed, restarting via fallback");
                    reporter
                        .turn(0, "Live generation unavailable; continuing with offline simulation")
                        .await;
                }
            }
        }

        let fallback = FallbackSimulator::new(
            &request.guide,
            persona,
            &request.objectives,
            self.clock.as_ref(),
        );
        let result = fallback.run(&mut StdRng::seed_from_u64(fallback_seed(request, persona)));
        for (i, msg) in result.transcript.iter().enumerate() {
            let preview: String = msg.content.chars().take(80).collect();
            reporter.turn(i + 1, &preview).await;
        }
        Ok(result)
    }
}

/// Fallback RNG seed: derived from the request seed and persona id so a
/// restarted persona replays identically within one request.
fn fallback_seed(request: &DemoRunRequest, persona: &Persona) -> u64 {
    let base = request.seed.unwrap_or(0);
    let tag: u64 = persona.id.bytes().map(u64::from).sum();
    base.wrapping_mul(31).wrapping_add(tag)
}

fn validate(request: &DemoRunRequest) -> AppResult<()> {
    if request.guide.questions.is_empty() {
        return Err(AppError::config("Interview guide has no questions"));
    }
    if request.guide.main_question_count() == 0 {
        return Err(AppError::config(
            "Interview guide has no main (non-probe) questions",
        ));
    }
    if request.objectives.is_empty() {
        return Err(AppError::config(
            "At least one research objective is required",
        ));
    }
    Ok(())
}

async fn send(tx: &mpsc::Sender<ProgressEvent>, event: ProgressEvent) {
    if tx.send(event).await.is_err() {
        warn!("progress receiver dropped, event discarded");
    }
}
