//! Completion Provider Trait
//!
//! Defines the common interface for all text-completion providers.

use async_trait::async_trait;

use super::types::{ChatMessage, LlmError, LlmResult, ProviderConfig};

/// Trait that all completion providers must implement.
///
/// The contract is deliberately narrow: one system-instructions string, an
/// ordered role-tagged history, one text completion back. The engine treats
/// any error as grounds for its deterministic fallback, so providers should
/// classify failures rather than retry internally.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Returns the provider name for identification.
    fn name(&self) -> &'static str;

    /// Returns the current model being used.
    fn model(&self) -> &str;

    /// Request a single text completion.
    ///
    /// # Arguments
    /// * `system` - System instructions for the completion
    /// * `messages` - Ordered conversation history
    ///
    /// # Returns
    /// The completion text, trimmed.
    async fn complete(&self, system: &str, messages: &[ChatMessage]) -> LlmResult<String>;

    /// Check if the provider is configured and reachable.
    ///
    /// For API providers this validates the API key with a minimal request.
    async fn health_check(&self) -> LlmResult<()>;

    /// Get the configuration for this provider.
    fn config(&self) -> &ProviderConfig;
}

/// Helper function to create an error for a missing API key.
pub fn missing_api_key_error(provider: &str) -> LlmError {
    LlmError::AuthenticationFailed {
        message: format!("API key not configured for {}", provider),
    }
}

/// Helper function to map HTTP error status codes onto the error taxonomy.
pub fn parse_http_error(status: u16, body: &str, provider: &str) -> LlmError {
    match status {
        401 => LlmError::AuthenticationFailed {
            message: format!("{}: Invalid API key", provider),
        },
        403 => LlmError::AuthenticationFailed {
            message: format!("{}: Access denied", provider),
        },
        404 => LlmError::ModelNotFound {
            model: body.to_string(),
        },
        429 => LlmError::RateLimited {
            message: body.to_string(),
        },
        400 => LlmError::InvalidRequest {
            message: body.to_string(),
        },
        500..=599 => LlmError::ServerError {
            message: body.to_string(),
            status: Some(status),
        },
        _ => LlmError::Other {
            message: format!("HTTP {}: {}", status, body),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_api_key_error() {
        let err = missing_api_key_error("openai");
        match err {
            LlmError::AuthenticationFailed { message } => {
                assert!(message.contains("openai"));
            }
            _ => panic!("Expected AuthenticationFailed"),
        }
    }

    #[test]
    fn test_parse_http_error() {
        let err = parse_http_error(401, "unauthorized", "openai");
        assert!(matches!(err, LlmError::AuthenticationFailed { .. }));

        let err = parse_http_error(429, "rate limited", "openai");
        assert!(matches!(err, LlmError::RateLimited { .. }));

        let err = parse_http_error(500, "internal error", "openai");
        assert!(matches!(err, LlmError::ServerError { .. }));

        let err = parse_http_error(418, "teapot", "openai");
        assert!(matches!(err, LlmError::Other { .. }));
    }
}
