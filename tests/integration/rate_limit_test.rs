//! Rate limiter integration tests: fixed windows under a controlled clock.

use std::sync::Arc;

use chrono::{Duration, Utc};
use pilot_run::{ManualClock, RateLimitConfig, RateLimiter};

#[test]
fn test_eleventh_check_refused_and_sibling_unaffected() {
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let limiter = RateLimiter::new(clock, RateLimitConfig::default());

    for _ in 0..10 {
        assert!(limiter.check("alpha").allowed);
        limiter.increment("alpha");
    }

    let decision = limiter.check("alpha");
    assert!(!decision.allowed);
    assert!(decision.reset_at.is_some());

    assert!(limiter.check("beta").allowed);
}

#[test]
fn test_project_window_resets_after_a_day() {
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let limiter = RateLimiter::new(clock.clone(), RateLimitConfig::default());

    for _ in 0..10 {
        limiter.increment("alpha");
    }
    assert!(!limiter.check("alpha").allowed);

    clock.advance(Duration::hours(24));
    assert!(limiter.check("alpha").allowed);
}

#[test]
fn test_global_window_caps_all_projects_within_the_hour() {
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let limiter = RateLimiter::new(clock.clone(), RateLimitConfig::default());

    // Spread 50 runs over many projects; each stays under its own quota.
    for i in 0..50 {
        limiter.increment(&format!("project-{}", i % 9));
    }
    assert!(!limiter.check("project-0").allowed);

    clock.advance(Duration::hours(1));
    assert!(limiter.check("project-0").allowed);
}
