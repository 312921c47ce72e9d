//! Error Handling
//!
//! Unified error types for the simulation engine.
//! Uses thiserror for ergonomic error definitions.

use chrono::{DateTime, Utc};
use thiserror::Error;

use pilot_run_core::CoreError;
use pilot_run_llm::LlmError;

/// Engine-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Errors bubbled up from the core domain types
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Configuration errors (missing guide, empty objectives)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Not found errors
    #[error("Not found: {0}")]
    NotFound(String),

    /// A demo request was refused by the rate limiter
    #[error("Rate limit exceeded: {message}")]
    RateLimited {
        message: String,
        reset_at: DateTime<Utc>,
    },

    /// The generative dependency failed mid-run
    #[error("Provider error: {0}")]
    Provider(String),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for engine errors
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// True when this error came from the generative dependency.
    pub fn is_provider_failure(&self) -> bool {
        matches!(self, Self::Provider(_))
    }
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        Self::Provider(err.to_string())
    }
}

/// Convert AppError to a string suitable for progress error events
impl From<AppError> for String {
    fn from(err: AppError) -> String {
        err.to_string()
    }
}
