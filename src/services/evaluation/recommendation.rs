//! Recommendation Engine
//!
//! Aggregates metrics across all persona runs into categorized,
//! severity-ranked recommendations and the overall readiness verdict.

use std::collections::BTreeSet;

use pilot_run_core::{
    DemoEvaluation, InterviewGuide, MetricAverages, OverallScore, Recommendation, Severity,
    SimulationResult,
};

// Fixed thresholds, tuned against pilot transcripts.
const COVERAGE_CRITICAL: f64 = 80.0;
const COVERAGE_WARNING: f64 = 90.0;
const TIME_VARIANCE_WARNING: f64 = 30.0;
const CLARITY_CRITICAL: f64 = 5.0;
const CLARITY_WARNING: f64 = 7.0;
const OBJECTIVE_CRITICAL: f64 = 80.0;
const ADVERSARIAL_WARNING: f64 = 6.0;
const PROBING_SUGGESTION: f64 = 6.0;
const PACE_FAST: f64 = 2.0;
const PACE_SLOW: f64 = 0.5;
const READY_SCORE: f64 = 7.0;
const REALISM_BAND_PERCENT: f64 = 20.0;

/// Aggregate all persona results into the final evaluation.
pub fn evaluate_demo(results: &[SimulationResult], guide: &InterviewGuide) -> DemoEvaluation {
    let averages = compute_averages(results);
    let mut recommendations = Vec::new();

    // Coverage
    if averages.coverage_rate < COVERAGE_CRITICAL {
        recommendations.push(Recommendation {
            severity: Severity::Critical,
            category: "coverage".to_string(),
            title: "Question coverage is too low".to_string(),
            description: format!(
                "Across the simulated runs only {:.0}% of guide questions were asked.",
                averages.coverage_rate
            ),
            impact: "Key topics would go unexplored in real interviews.".to_string(),
            actionable: "Shorten the guide or raise the session length so every question fits."
                .to_string(),
            affected_questions: None,
        });
    } else if averages.coverage_rate < COVERAGE_WARNING {
        recommendations.push(Recommendation {
            severity: Severity::Warning,
            category: "coverage".to_string(),
            title: "Some guide questions are being skipped".to_string(),
            description: format!(
                "Average coverage was {:.0}%, below the 90% target.",
                averages.coverage_rate
            ),
            impact: "A few topics may be missed with slower participants.".to_string(),
            actionable: "Reorder the guide so the most important questions come first.".to_string(),
            affected_questions: None,
        });
    }

    // Timing
    let avg_abs_variance = mean(results.iter().map(|r| r.metrics.agent.time_variance_percent.abs()));
    if avg_abs_variance > TIME_VARIANCE_WARNING {
        recommendations.push(Recommendation {
            severity: Severity::Warning,
            category: "timing".to_string(),
            title: "Interview length diverges from the estimate".to_string(),
            description: format!(
                "Simulated durations differed from the estimate by {:.0}% on average.",
                avg_abs_variance
            ),
            impact: "Scheduling and incentives are based on the estimated length.".to_string(),
            actionable: "Re-estimate the session length or trim time-heavy questions.".to_string(),
            affected_questions: None,
        });
    }

    // Per-question clarity, worst score per question across personas.
    let mut critical_questions = BTreeSet::new();
    let mut warning_questions = BTreeSet::new();
    for result in results {
        for clarity in &result.metrics.brief.question_clarity {
            if clarity.score < CLARITY_CRITICAL {
                critical_questions.insert(clarity.question_id.clone());
            } else if clarity.score < CLARITY_WARNING {
                warning_questions.insert(clarity.question_id.clone());
            }
        }
    }
    warning_questions.retain(|id| !critical_questions.contains(id));
    if !critical_questions.is_empty() {
        recommendations.push(Recommendation {
            severity: Severity::Critical,
            category: "clarity".to_string(),
            title: "Some questions confuse participants badly".to_string(),
            description: format!(
                "{} question(s) scored below {} on clarity for at least one persona.",
                critical_questions.len(),
                CLARITY_CRITICAL
            ),
            impact: "Confusing questions produce unusable answers.".to_string(),
            actionable: "Rewrite the flagged questions in plainer language.".to_string(),
            affected_questions: Some(critical_questions.iter().cloned().collect()),
        });
    }
    if !warning_questions.is_empty() {
        recommendations.push(Recommendation {
            severity: Severity::Warning,
            category: "clarity".to_string(),
            title: "Some questions needed rephrasing".to_string(),
            description: format!(
                "{} question(s) scored below {} on clarity.",
                warning_questions.len(),
                CLARITY_WARNING
            ),
            impact: "Rephrasing costs time and breaks conversational flow.".to_string(),
            actionable: "Tighten the wording of the flagged questions.".to_string(),
            affected_questions: Some(warning_questions.iter().cloned().collect()),
        });
    }

    // Objectives
    if averages.objective_coverage < OBJECTIVE_CRITICAL {
        recommendations.push(Recommendation {
            severity: Severity::Critical,
            category: "objectives".to_string(),
            title: "Research objectives are not fully covered".to_string(),
            description: format!(
                "Only {:.0}% of declared objectives map to questions that get asked.",
                averages.objective_coverage
            ),
            impact: "The study could finish without answering its own goals.".to_string(),
            actionable: "Add or tag questions for the uncovered objectives.".to_string(),
            affected_questions: None,
        });
    }

    // Adversarial handling, judged only where tangents actually happened.
    let adversarial_tested: Vec<f64> = results
        .iter()
        .filter(|r| r.metrics.agent.tangent_count > 0)
        .map(|r| r.metrics.agent.adversarial_score)
        .collect();
    if !adversarial_tested.is_empty() {
        let avg = mean(adversarial_tested.iter().copied());
        if avg < ADVERSARIAL_WARNING {
            recommendations.push(Recommendation {
                severity: Severity::Warning,
                category: "moderation".to_string(),
                title: "Off-topic tangents are not being redirected".to_string(),
                description: format!(
                    "Adversarial handling averaged {:.1}/10 for personas that wandered.",
                    avg
                ),
                impact: "Tangents eat interview time without producing data.".to_string(),
                actionable: "Strengthen the moderator script's redirection instructions."
                    .to_string(),
                affected_questions: None,
            });
        }
    }

    // Probing
    if averages.probing_quality < PROBING_SUGGESTION {
        recommendations.push(Recommendation {
            severity: Severity::Suggestion,
            category: "probing".to_string(),
            title: "Probes rarely dig beneath the surface".to_string(),
            description: format!(
                "Probing quality averaged {:.1}/10 across runs.",
                averages.probing_quality
            ),
            impact: "Shallow probes leave the richest insights uncollected.".to_string(),
            actionable: "Seed the guide with comparison and impact follow-ups.".to_string(),
            affected_questions: None,
        });
    }

    // Pacing
    let question_total = guide.main_question_count() as f64;
    let paces: Vec<f64> = results
        .iter()
        .filter(|r| r.duration_minutes > 0.0)
        .map(|r| (r.metrics.agent.coverage_rate / 100.0 * question_total) / r.duration_minutes)
        .collect();
    if !paces.is_empty() {
        let avg_pace = mean(paces.iter().copied());
        if avg_pace > PACE_FAST {
            recommendations.push(pacing_recommendation(
                avg_pace,
                "Questions are being rushed",
                "Participants get little room to think before the next question lands.",
                "Allow more follow-up time per question or cut the question count.",
            ));
        } else if avg_pace < PACE_SLOW {
            recommendations.push(pacing_recommendation(
                avg_pace,
                "The interview drags between questions",
                "Slow pacing risks fatigue and drop-off before the guide is covered.",
                "Tighten transitions or split the session into two shorter ones.",
            ));
        }
    }

    recommendations.sort_by_key(|r| r.severity);

    let has_critical = recommendations
        .iter()
        .any(|r| r.severity == Severity::Critical);
    let agent_score = averages.coverage_rate / 10.0 * 0.5
        + averages.adversarial_score * 0.25
        + averages.probing_quality * 0.25;
    let length_score = if avg_abs_variance <= REALISM_BAND_PERCENT {
        10.0
    } else {
        5.0
    };
    let brief_score = averages.clarity_index * 0.5
        + averages.objective_coverage / 10.0 * 0.3
        + length_score * 0.2;

    let overall = OverallScore {
        agent_score,
        brief_score,
        ready_to_launch: agent_score >= READY_SCORE && brief_score >= READY_SCORE && !has_critical,
    };

    DemoEvaluation {
        averages,
        high_risk_questions: critical_questions.into_iter().collect(),
        recommendations,
        overall,
    }
}

fn compute_averages(results: &[SimulationResult]) -> MetricAverages {
    MetricAverages {
        coverage_rate: mean(results.iter().map(|r| r.metrics.agent.coverage_rate)),
        time_variance_percent: mean(results.iter().map(|r| r.metrics.agent.time_variance_percent)),
        clarity_index: mean(results.iter().map(|r| r.metrics.brief.clarity_index)),
        objective_coverage: mean(results.iter().map(|r| r.metrics.brief.objective_coverage)),
        adversarial_score: mean(results.iter().map(|r| r.metrics.agent.adversarial_score)),
        probing_quality: mean(results.iter().map(|r| r.metrics.agent.probing_quality)),
    }
}

fn pacing_recommendation(
    pace: f64,
    title: &str,
    impact: &str,
    actionable: &str,
) -> Recommendation {
    Recommendation {
        severity: Severity::Suggestion,
        category: "pacing".to_string(),
        title: title.to_string(),
        description: format!("Simulated runs averaged {:.1} questions per minute.", pace),
        impact: impact.to_string(),
        actionable: actionable.to_string(),
        affected_questions: None,
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let collected: Vec<f64> = values.collect();
    if collected.is_empty() {
        return 0.0;
    }
    collected.iter().sum::<f64>() / collected.len() as f64
}
