//! Demo runner integration tests: full offline runs, the progress event
//! contract, and live-to-fallback degradation.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use pilot_run::{
    AppError, DemoRunRequest, DemoRunner, ManualClock, RateLimitConfig, RateLimiter,
    SimulationOverrides, SystemClock,
};
use pilot_run_core::{GuideQuestion, InterviewGuide, ProgressEvent};
use pilot_run_llm::{ChatMessage, CompletionProvider, LlmError, LlmResult, ProviderConfig};

/// Provider that fails every call, forcing the fallback restart path.
struct BrokenProvider {
    config: ProviderConfig,
}

impl BrokenProvider {
    fn new() -> Self {
        Self {
            config: ProviderConfig::default(),
        }
    }
}

#[async_trait]
impl CompletionProvider for BrokenProvider {
    fn name(&self) -> &'static str {
        "broken"
    }

    fn model(&self) -> &str {
        "broken-model"
    }

    async fn complete(&self, _system: &str, _messages: &[ChatMessage]) -> LlmResult<String> {
        Err(LlmError::ServerError {
            message: "upstream unavailable".to_string(),
            status: Some(503),
        })
    }

    async fn health_check(&self) -> LlmResult<()> {
        Err(LlmError::ServerError {
            message: "upstream unavailable".to_string(),
            status: Some(503),
        })
    }

    fn config(&self) -> &ProviderConfig {
        &self.config
    }
}

fn request() -> DemoRunRequest {
    DemoRunRequest {
        project_id: "project-int".to_string(),
        guide: InterviewGuide::new(
            vec![
                GuideQuestion::open("q1", "How do you plan your weekly grocery shopping?")
                    .with_objective("Understand planning habits"),
                GuideQuestion::open("q2", "What frustrates you about checkout lines today?"),
                GuideQuestion::open("q3", "How often do you order delivery instead of visiting?"),
            ],
            12.0,
        ),
        brief: "Grocery habits discovery study".to_string(),
        objectives: vec!["Understand planning habits".to_string()],
        overrides: SimulationOverrides::default(),
        seed: Some(99),
    }
}

fn offline_runner() -> DemoRunner {
    let clock = Arc::new(SystemClock);
    let limiter = Arc::new(RateLimiter::new(clock.clone(), RateLimitConfig::default()));
    DemoRunner::new(None, limiter, clock)
}

#[tokio::test]
async fn test_event_stream_follows_the_contract_order() {
    let runner = offline_runner();
    let (tx, mut rx) = mpsc::channel(4096);

    let outcome = runner.run(request(), tx).await.unwrap();

    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }

    // init first, complete last.
    assert!(matches!(events.first(), Some(ProgressEvent::Init { personas }) if personas.len() == 3));
    match events.last() {
        Some(ProgressEvent::Complete {
            results,
            evaluation: _,
            demo_id,
        }) => {
            assert_eq!(results.len(), 3);
            assert_eq!(*demo_id, outcome.demo_id);
        }
        other => panic!("expected terminal complete, got {:?}", other),
    }

    // persona_start events arrive in catalog order, each followed by its
    // persona_complete before the next start.
    let mut current: Option<usize> = None;
    let mut completed = Vec::new();
    for event in &events {
        match event {
            ProgressEvent::PersonaStart { index } => {
                assert_eq!(*index, completed.len());
                current = Some(*index);
            }
            ProgressEvent::PersonaComplete { index, .. } => {
                assert_eq!(Some(*index), current);
                completed.push(*index);
            }
            ProgressEvent::PersonaProgress { index, .. } => {
                assert_eq!(Some(*index), current);
            }
            _ => {}
        }
    }
    assert_eq!(completed, vec![0, 1, 2]);

    // evaluating comes after the last persona_complete.
    let evaluating_pos = events
        .iter()
        .position(|e| matches!(e, ProgressEvent::Evaluating))
        .unwrap();
    let last_complete_pos = events
        .iter()
        .rposition(|e| matches!(e, ProgressEvent::PersonaComplete { .. }))
        .unwrap();
    assert!(evaluating_pos > last_complete_pos);
}

#[tokio::test]
async fn test_results_are_fully_evaluated_even_on_drop_off() {
    let runner = offline_runner();
    let (tx, _rx) = mpsc::channel(4096);
    let outcome = runner.run(request(), tx).await.unwrap();

    for result in &outcome.results {
        // Metrics always populated, completed or not.
        assert!((0.0..=100.0).contains(&result.metrics.agent.coverage_rate));
        assert!((0.0..=10.0).contains(&result.metrics.brief.clarity_index));
        for pair in result.transcript.windows(2) {
            assert!(pair[0].timestamp <= pair[1].timestamp);
        }
        if !result.completed {
            assert!(result.drop_off_reason.is_some());
        }
    }

    let ids: Vec<&str> = outcome
        .results
        .iter()
        .map(|r| r.persona_id.as_str())
        .collect();
    assert_eq!(ids, vec!["ideal", "typical", "difficult"]);
}

#[tokio::test]
async fn test_broken_provider_degrades_to_fallback_without_persona_errors() {
    let clock = Arc::new(SystemClock);
    let limiter = Arc::new(RateLimiter::new(clock.clone(), RateLimitConfig::default()));
    let runner = DemoRunner::new(Some(Arc::new(BrokenProvider::new())), limiter, clock);

    let (tx, mut rx) = mpsc::channel(4096);
    let outcome = runner.run(request(), tx).await.unwrap();
    assert_eq!(outcome.results.len(), 3);

    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }

    // The dependency failure surfaces as a progress note, never as a
    // persona_error or request error.
    assert!(!events
        .iter()
        .any(|e| matches!(e, ProgressEvent::PersonaError { .. } | ProgressEvent::Error { .. })));
    assert!(events.iter().any(|e| matches!(
        e,
        ProgressEvent::PersonaProgress { message, .. } if message.contains("offline simulation")
    )));
}

#[tokio::test]
async fn test_rate_limit_gate_rejects_before_any_persona_runs() {
    let clock = Arc::new(ManualClock::new(chrono::Utc::now()));
    let limiter = Arc::new(RateLimiter::new(
        clock.clone(),
        RateLimitConfig {
            project_limit: 1,
            ..RateLimitConfig::default()
        },
    ));
    let runner = DemoRunner::new(None, limiter, clock);

    let (tx, _rx) = mpsc::channel(4096);
    runner.run(request(), tx).await.unwrap();

    let (tx, mut rx) = mpsc::channel(64);
    let err = runner.run(request(), tx).await.unwrap_err();
    let AppError::RateLimited { reset_at, .. } = err else {
        panic!("expected rate limited error");
    };
    assert!(reset_at > chrono::Utc::now() - chrono::Duration::hours(25));

    // Only the terminal error event; no persona ever started.
    assert!(matches!(rx.recv().await, Some(ProgressEvent::Error { .. })));
    assert!(rx.recv().await.is_none());
}
