//! Evaluator integration tests: the documented metric properties, checked
//! through the public evaluation entry points.

use chrono::{Duration, Utc};

use pilot_run::services::evaluation::{evaluate_demo, evaluate_run};
use pilot_run::services::simulation::heuristics::is_natural_closing;
use pilot_run::PersonaCatalog;
use pilot_run_core::{ConversationMessage, GuideQuestion, InterviewGuide, Severity};

fn guide(estimated_minutes: f64) -> InterviewGuide {
    InterviewGuide::new(
        vec![
            GuideQuestion::open("q1", "How do you plan your weekly grocery shopping?")
                .with_objective("Understand planning habits"),
            GuideQuestion::open("q2", "What frustrates you about checkout lines today?"),
        ],
        estimated_minutes,
    )
}

#[test]
fn test_conclusion_phrase_classifies_as_natural_closing() {
    assert!(is_natural_closing(
        "Thank you so much for your time! This concludes our interview."
    ));
    // The same sentiment with a trailing question must not close.
    assert!(!is_natural_closing(
        "Thank you so much for your time! Is there anything you'd like to add?"
    ));
}

#[test]
fn test_length_realism_fifteen_estimated_twenty_one_actual() {
    let catalog = PersonaCatalog::new();
    let persona = catalog.get("ideal").unwrap();
    let base = Utc::now();
    let transcript = vec![
        ConversationMessage::agent("Welcome to the session!", base).with_question_id("q1"),
        ConversationMessage::user("Glad to be here.", base + Duration::minutes(21)),
    ];

    let metrics = evaluate_run(&transcript, &guide(15.0), persona, &[]);
    let realism = &metrics.brief.length_realism;
    assert!((realism.variance_percent - 40.0).abs() < 1e-9);
    assert!(!realism.realistic);
}

#[test]
fn test_sixty_five_percent_coverage_yields_one_critical_and_blocks_launch() {
    let catalog = PersonaCatalog::new();
    let persona = catalog.get("ideal").unwrap();
    let base = Utc::now();

    // A guide of 20 questions, of which 13 get asked: 65% coverage.
    let questions: Vec<GuideQuestion> = (0..20)
        .map(|i| {
            GuideQuestion::open(
                format!("q{}", i),
                format!("Question number {} about distinctive topic area {}?", i, i),
            )
        })
        .collect();
    let wide_guide = InterviewGuide::new(questions, 15.0);

    let transcript: Vec<ConversationMessage> = (0..13)
        .map(|i| {
            ConversationMessage::agent("asked", base + Duration::seconds(i))
                .with_question_id(format!("q{}", i))
        })
        .collect();

    let metrics = evaluate_run(&transcript, &wide_guide, persona, &[]);
    assert!((metrics.agent.coverage_rate - 65.0).abs() < f64::EPSILON);

    let results: Vec<pilot_run_core::SimulationResult> = (0..3)
        .map(|_| pilot_run_core::SimulationResult {
            persona_id: persona.id.clone(),
            completed: true,
            dropped_at: None,
            drop_off_reason: None,
            transcript: transcript.clone(),
            duration_minutes: 14.0,
            metrics: metrics.clone(),
            completed_at: Utc::now(),
        })
        .collect();

    let evaluation = evaluate_demo(&results, &wide_guide);
    let critical_coverage = evaluation
        .recommendations
        .iter()
        .filter(|r| r.category == "coverage" && r.severity == Severity::Critical)
        .count();
    assert_eq!(critical_coverage, 1);
    assert!(!evaluation.overall.ready_to_launch);
}

#[test]
fn test_coverage_rate_monotone_as_distinct_questions_accumulate() {
    let catalog = PersonaCatalog::new();
    let persona = catalog.get("typical").unwrap();
    let guide = guide(15.0);
    let base = Utc::now();

    let mut transcript: Vec<ConversationMessage> = Vec::new();
    let mut last_coverage = evaluate_run(&transcript, &guide, persona, &[])
        .agent
        .coverage_rate;

    for (i, id) in ["q1", "q1", "q2"].iter().enumerate() {
        transcript.push(
            ConversationMessage::agent("asked", base + Duration::seconds(i as i64))
                .with_question_id(*id),
        );
        let coverage = evaluate_run(&transcript, &guide, persona, &[])
            .agent
            .coverage_rate;
        assert!(coverage >= last_coverage);
        last_coverage = coverage;
    }
    assert!((last_coverage - 100.0).abs() < f64::EPSILON);
}

#[test]
fn test_metrics_copy_into_result_shape_for_dropped_runs() {
    // A transcript that ends mid-interview still yields the full metric set.
    let catalog = PersonaCatalog::new();
    let persona = catalog.get("difficult").unwrap();
    let base = Utc::now();
    let transcript = vec![
        ConversationMessage::agent("How do you plan your weekly grocery shopping?", base)
            .with_question_id("q1"),
        ConversationMessage::user(
            "Honestly, this isn't working for me.",
            base + Duration::seconds(30),
        ),
    ];

    let metrics = evaluate_run(&transcript, &guide(15.0), persona, &[]);
    assert!(metrics.agent.coverage_rate > 0.0);
    assert!((0.0..=10.0).contains(&metrics.agent.adversarial_score));
    assert!((0.0..=10.0).contains(&metrics.brief.clarity_index));
}
