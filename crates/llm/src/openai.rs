//! OpenAI-Compatible Provider
//!
//! Implementation of the `CompletionProvider` trait against the OpenAI
//! chat-completions wire format, which most hosted providers also speak via
//! a `base_url` override.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::provider::{missing_api_key_error, parse_http_error, CompletionProvider};
use super::types::{ChatMessage, ChatRole, LlmError, LlmResult, ProviderConfig};

/// Default OpenAI API endpoint
const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// OpenAI-compatible completion provider.
pub struct OpenAiCompatProvider {
    config: ProviderConfig,
    client: reqwest::Client,
}

impl OpenAiCompatProvider {
    /// Create a new provider with the given configuration.
    pub fn new(config: ProviderConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// Get the API base URL.
    fn base_url(&self) -> &str {
        self.config.base_url.as_deref().unwrap_or(OPENAI_API_URL)
    }

    /// Build the request body for the API.
    fn build_request_body(&self, system: &str, messages: &[ChatMessage]) -> serde_json::Value {
        let mut wire_messages: Vec<serde_json::Value> = Vec::with_capacity(messages.len() + 1);

        if !system.is_empty() {
            wire_messages.push(serde_json::json!({
                "role": "system",
                "content": system,
            }));
        }

        for msg in messages {
            let role = match msg.role {
                ChatRole::System => "system",
                ChatRole::User => "user",
                ChatRole::Assistant => "assistant",
            };
            wire_messages.push(serde_json::json!({
                "role": role,
                "content": msg.content,
            }));
        }

        serde_json::json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
            "messages": wire_messages,
        })
    }

    async fn post_chat(&self, body: serde_json::Value) -> LlmResult<ChatCompletionResponse> {
        let api_key = self
            .config
            .api_key
            .as_ref()
            .ok_or_else(|| missing_api_key_error(self.name()))?;

        let response = self
            .client
            .post(self.base_url())
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::NetworkError {
                message: e.to_string(),
            })?;

        let status = response.status().as_u16();
        let body_text = response.text().await.map_err(|e| LlmError::NetworkError {
            message: e.to_string(),
        })?;

        if !(200..300).contains(&status) {
            return Err(parse_http_error(status, &body_text, self.name()));
        }

        serde_json::from_str(&body_text).map_err(|e| LlmError::ParseError {
            message: format!("Failed to parse completion response: {}", e),
        })
    }
}

#[async_trait]
impl CompletionProvider for OpenAiCompatProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn complete(&self, system: &str, messages: &[ChatMessage]) -> LlmResult<String> {
        let body = self.build_request_body(system, messages);
        debug!(model = %self.config.model, messages = messages.len(), "requesting completion");

        let response = self.post_chat(body).await?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or(LlmError::EmptyCompletion)?;

        Ok(content)
    }

    async fn health_check(&self) -> LlmResult<()> {
        let body = serde_json::json!({
            "model": self.config.model,
            "max_tokens": 1,
            "messages": [{"role": "user", "content": "ping"}],
        });
        self.post_chat(body).await.map(|_| ())
    }

    fn config(&self) -> &ProviderConfig {
        &self.config
    }
}

// ── Wire format ────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}
