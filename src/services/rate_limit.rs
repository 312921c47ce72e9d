//! Rate Limiter
//!
//! Fixed-window counters guarding the whole subsystem: per-project and
//! global quotas, consulted once before any run starts. Counters are
//! process-local and in-memory; single-process deployment is assumed. Time
//! comes from the injected `Clock` so tests control window expiry.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::services::clock::Clock;

/// Quota configuration for both windows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Runs allowed per project per window
    #[serde(default = "default_project_limit")]
    pub project_limit: u32,
    /// Project window length in hours
    #[serde(default = "default_project_window_hours")]
    pub project_window_hours: i64,
    /// Runs allowed globally per window
    #[serde(default = "default_global_limit")]
    pub global_limit: u32,
    /// Global window length in hours
    #[serde(default = "default_global_window_hours")]
    pub global_window_hours: i64,
}

fn default_project_limit() -> u32 {
    10
}

fn default_project_window_hours() -> i64 {
    24
}

fn default_global_limit() -> u32 {
    50
}

fn default_global_window_hours() -> i64 {
    1
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            project_limit: default_project_limit(),
            project_window_hours: default_project_window_hours(),
            global_limit: default_global_limit(),
            global_window_hours: default_global_window_hours(),
        }
    }
}

/// Outcome of a rate-limit check.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitDecision {
    /// Whether a run may start
    pub allowed: bool,
    /// Which quota refused the request, when one did
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// When the refusing window resets
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset_at: Option<DateTime<Utc>>,
}

impl RateLimitDecision {
    fn allowed() -> Self {
        Self {
            allowed: true,
            reason: None,
            reset_at: None,
        }
    }

    fn refused(reason: impl Into<String>, reset_at: DateTime<Utc>) -> Self {
        Self {
            allowed: false,
            reason: Some(reason.into()),
            reset_at: Some(reset_at),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Window {
    count: u32,
    started_at: DateTime<Utc>,
}

const GLOBAL_SCOPE: &str = "global";

/// In-process fixed-window rate limiter.
pub struct RateLimiter {
    windows: Mutex<HashMap<String, Window>>,
    clock: Arc<dyn Clock>,
    config: RateLimitConfig,
}

impl RateLimiter {
    /// Create a limiter over the given clock and quotas.
    pub fn new(clock: Arc<dyn Clock>, config: RateLimitConfig) -> Self {
        Self {
            windows: Mutex::new(HashMap::new()),
            clock,
            config,
        }
    }

    /// Inspect both quotas without mutating any window.
    pub fn check(&self, project_id: &str) -> RateLimitDecision {
        let now = self.clock.now();
        let windows = self.windows.lock().expect("rate limiter lock poisoned");

        if let Some(window) = windows.get(GLOBAL_SCOPE) {
            let expires = window.started_at + Duration::hours(self.config.global_window_hours);
            if now < expires && window.count >= self.config.global_limit {
                warn!(project = project_id, "global rate limit reached");
                return RateLimitDecision::refused(
                    format!(
                        "Global limit of {} runs per {} hour(s) reached",
                        self.config.global_limit, self.config.global_window_hours
                    ),
                    expires,
                );
            }
        }

        let key = project_key(project_id);
        if let Some(window) = windows.get(&key) {
            let expires = window.started_at + Duration::hours(self.config.project_window_hours);
            if now < expires && window.count >= self.config.project_limit {
                warn!(project = project_id, "project rate limit reached");
                return RateLimitDecision::refused(
                    format!(
                        "Project limit of {} runs per {} hour(s) reached",
                        self.config.project_limit, self.config.project_window_hours
                    ),
                    expires,
                );
            }
        }

        RateLimitDecision::allowed()
    }

    /// Record a successful simulation kickoff against both windows.
    ///
    /// A window whose expiry has passed is reset lazily here rather than by
    /// a background task.
    pub fn increment(&self, project_id: &str) {
        let now = self.clock.now();
        let mut windows = self.windows.lock().expect("rate limiter lock poisoned");

        bump(
            &mut windows,
            GLOBAL_SCOPE.to_string(),
            now,
            Duration::hours(self.config.global_window_hours),
        );
        bump(
            &mut windows,
            project_key(project_id),
            now,
            Duration::hours(self.config.project_window_hours),
        );
    }

    /// Spawn a background task that sweeps expired windows on an interval.
    ///
    /// The task runs until the returned handle is aborted or the runtime
    /// shuts down.
    pub fn start_sweeper(
        self: &Arc<Self>,
        interval: std::time::Duration,
    ) -> tokio::task::JoinHandle<()> {
        let limiter = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                limiter.sweep();
            }
        })
    }

    /// Drop windows whose expiry has passed. Called from a periodic task.
    pub fn sweep(&self) {
        let now = self.clock.now();
        let project_window = Duration::hours(self.config.project_window_hours);
        let global_window = Duration::hours(self.config.global_window_hours);
        let mut windows = self.windows.lock().expect("rate limiter lock poisoned");

        let before = windows.len();
        windows.retain(|key, window| {
            let length = if key == GLOBAL_SCOPE {
                global_window
            } else {
                project_window
            };
            now < window.started_at + length
        });
        debug!(removed = before - windows.len(), "rate limit sweep");
    }
}

fn project_key(project_id: &str) -> String {
    format!("project:{}", project_id)
}

fn bump(
    windows: &mut HashMap<String, Window>,
    key: String,
    now: DateTime<Utc>,
    length: Duration,
) {
    let window = windows.entry(key).or_insert(Window {
        count: 0,
        started_at: now,
    });
    if now >= window.started_at + length {
        window.count = 0;
        window.started_at = now;
    }
    window.count += 1;
}
