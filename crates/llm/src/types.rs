//! LLM Types
//!
//! Core types for text-completion provider interactions.

use serde::{Deserialize, Serialize};

/// Message role in a completion request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// One role-tagged message in the completion history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message sender
    pub role: ChatRole,
    /// Message text
    pub content: String,
}

impl ChatMessage {
    /// Create a message with the given role.
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ChatRole::User, content)
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(ChatRole::Assistant, content)
    }
}

/// Configuration for a completion provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// API key; providers refuse to start a call without one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Base URL override (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Model name to use
    pub model: String,
    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Temperature (0.0 - 1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_temperature() -> f32 {
    0.8
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            model: "gpt-4o-mini".to_string(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }
}

/// Error types for completion operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LlmError {
    /// Authentication failed (invalid or missing API key)
    AuthenticationFailed { message: String },
    /// Rate limit exceeded at the provider
    RateLimited { message: String },
    /// Model not found or not available
    ModelNotFound { model: String },
    /// Invalid request (bad parameters)
    InvalidRequest { message: String },
    /// Server error from the provider
    ServerError { message: String, status: Option<u16> },
    /// Network/connection error
    NetworkError { message: String },
    /// Response parsing error
    ParseError { message: String },
    /// Provider returned a completion with no text
    EmptyCompletion,
    /// Other error
    Other { message: String },
}

impl std::fmt::Display for LlmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LlmError::AuthenticationFailed { message } => {
                write!(f, "Authentication failed: {}", message)
            }
            LlmError::RateLimited { message } => write!(f, "Rate limited: {}", message),
            LlmError::ModelNotFound { model } => write!(f, "Model not found: {}", model),
            LlmError::InvalidRequest { message } => write!(f, "Invalid request: {}", message),
            LlmError::ServerError { message, status } => {
                if let Some(s) = status {
                    write!(f, "Server error ({}): {}", s, message)
                } else {
                    write!(f, "Server error: {}", message)
                }
            }
            LlmError::NetworkError { message } => write!(f, "Network error: {}", message),
            LlmError::ParseError { message } => write!(f, "Parse error: {}", message),
            LlmError::EmptyCompletion => write!(f, "Provider returned an empty completion"),
            LlmError::Other { message } => write!(f, "LLM error: {}", message),
        }
    }
}

impl std::error::Error for LlmError {}

/// Result type alias for completion operations.
pub type LlmResult<T> = Result<T, LlmError>;
