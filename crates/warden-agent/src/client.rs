//! Completion-service client (OpenAI-compatible chat completions).

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use warden_core::types::Turn;

#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("parse error: {0}")]
    Parse(String),
}

/// Remote completion collaborator: an ordered message sequence in, one
/// reply text out.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Client name for logging.
    fn name(&self) -> &str;

    async fn complete(&self, messages: &[Turn]) -> Result<String, CompletionError>;
}

/// Chat-completions client for OpenRouter (or any OpenAI-compatible
/// endpoint). The bearer credential comes from configuration.
pub struct OpenRouterClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: u32,
}

impl OpenRouterClient {
    pub fn new(api_key: String, base_url: Option<String>, model: String, max_tokens: u32) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: base_url.unwrap_or_else(|| "https://openrouter.ai/api".to_string()),
            model,
            max_tokens,
        }
    }
}

#[async_trait]
impl CompletionClient for OpenRouterClient {
    fn name(&self) -> &str {
        "openrouter"
    }

    async fn complete(&self, messages: &[Turn]) -> Result<String, CompletionError> {
        let body = serde_json::json!({
            "model": self.model,
            "max_tokens": self.max_tokens,
            "messages": messages,
        });
        let url = format!("{}/v1/chat/completions", self.base_url);

        debug!(model = %self.model, turns = messages.len(), "requesting chat completion");

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = resp.status().as_u16();
        if !resp.status().is_success() {
            let message = resp.text().await.unwrap_or_default();
            warn!(status, body = %message, "completion API error");
            return Err(CompletionError::Api { status, message });
        }

        let api_resp: ApiResponse = resp
            .json()
            .await
            .map_err(|e| CompletionError::Parse(e.to_string()))?;

        let content = api_resp
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Err(CompletionError::Parse(
                "response contained no completion text".to_string(),
            ));
        }

        Ok(content)
    }
}

// Completion API response types (deserialization only).

#[derive(Deserialize)]
struct ApiResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}
