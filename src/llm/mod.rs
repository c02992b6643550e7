//! LLM provider layer.
//!
//! The crew talks to an OpenAI-compatible chat completions endpoint via
//! `reqwest`. The provider is selected from the environment without
//! hardcoding it in the pipeline: Groq (through its OpenAI-compatible
//! endpoint) wins over OpenAI, and [`from_env`] returns `None` when no
//! credentials are set so the crew can fail per run instead of at startup.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Request timeout for completion calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Error raised by an LLM provider call.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Transport-level failure from the HTTP client.
    #[error("LLM request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Non-success status from the completions API.
    #[error("LLM API error ({status}): {body}")]
    Api { status: u16, body: String },
    /// The response body did not carry the expected completion shape.
    #[error("unexpected LLM response: {0}")]
    Response(String),
}

/// A single chat message sent to the completions endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmMessage {
    /// Role of the message sender ("system", "user", "assistant").
    pub role: String,
    /// Content of the message.
    pub content: String,
}

impl LlmMessage {
    /// Build a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// Build a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Interface the crew uses to reach a language model.
pub trait BaseLlm: Send + Sync {
    /// Model identifier sent to the provider.
    fn model(&self) -> &str;

    /// Run one chat completion and return the assistant's text.
    ///
    /// A single attempt; callers never retry.
    fn call(&self, messages: &[LlmMessage]) -> Result<String, LlmError>;
}

/// OpenAI-compatible chat completions provider.
///
/// Covers both OpenAI and Groq; Groq exposes an OpenAI-compatible endpoint
/// selected via `base_url`.
#[derive(Debug, Clone)]
pub struct OpenAiCompletion {
    /// Model name, e.g. `gpt-4o-mini` or `llama-3.3-70b-versatile`.
    pub model: String,
    api_key: String,
    base_url: String,
    client: reqwest::blocking::Client,
}

impl OpenAiCompletion {
    /// Base URL of the OpenAI API.
    pub const DEFAULT_BASE_URL: &'static str = "https://api.openai.com/v1";

    /// Create a provider. `base_url` falls back to the OpenAI API.
    pub fn new(
        model: impl Into<String>,
        api_key: impl Into<String>,
        base_url: Option<String>,
    ) -> Self {
        Self {
            model: model.into(),
            api_key: api_key.into(),
            base_url: base_url.unwrap_or_else(|| Self::DEFAULT_BASE_URL.to_string()),
            // One client per provider; calls share its connection pool.
            client: reqwest::blocking::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .expect("failed to build HTTP client"),
        }
    }

    /// Build the request body for the chat completions API.
    fn build_request_body(&self, messages: &[LlmMessage]) -> Value {
        serde_json::json!({
            "model": self.model,
            "messages": messages,
        })
    }
}

impl BaseLlm for OpenAiCompletion {
    fn model(&self) -> &str {
        &self.model
    }

    fn call(&self, messages: &[LlmMessage]) -> Result<String, LlmError> {
        log::debug!(
            "chat completion: model={}, messages={}",
            self.model,
            messages.len()
        );

        let endpoint = format!("{}/chat/completions", self.base_url);

        let response = self
            .client
            .post(&endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&self.build_request_body(messages))
            .send()?;

        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let json: Value = serde_json::from_str(&body)
            .map_err(|e| LlmError::Response(format!("invalid JSON body: {}", e)))?;

        let content = json
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(Value::as_str)
            .ok_or_else(|| LlmError::Response("no message content in choices".to_string()))?;

        if let Some(usage) = json.get("usage") {
            log::debug!(
                "token usage: prompt={}, completion={}",
                usage
                    .get("prompt_tokens")
                    .and_then(Value::as_i64)
                    .unwrap_or(0),
                usage
                    .get("completion_tokens")
                    .and_then(Value::as_i64)
                    .unwrap_or(0),
            );
        }

        Ok(content.to_string())
    }
}

/// Create an LLM from the environment without hardcoding the provider.
///
/// Groq is checked first (`GROQ_API_KEY`, optional `GROQ_MODEL` and
/// `GROQ_BASE_URL`), then OpenAI (`OPENAI_API_KEY`, optional
/// `OPENAI_MODEL`). Returns `None` if no key is set.
pub fn from_env() -> Option<Arc<dyn BaseLlm>> {
    if let Ok(key) = std::env::var("GROQ_API_KEY") {
        let model =
            std::env::var("GROQ_MODEL").unwrap_or_else(|_| "llama-3.3-70b-versatile".to_string());
        let base_url = std::env::var("GROQ_BASE_URL")
            .unwrap_or_else(|_| "https://api.groq.com/openai/v1".to_string());
        return Some(Arc::new(OpenAiCompletion::new(model, key, Some(base_url))));
    }

    if let Ok(key) = std::env::var("OPENAI_API_KEY") {
        let model = std::env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());
        return Some(Arc::new(OpenAiCompletion::new(model, key, None)));
    }

    None
}
