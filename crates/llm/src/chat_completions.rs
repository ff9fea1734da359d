//! Chat Completions Provider
//!
//! Implementation of the ChatProvider trait for OpenAI-compatible
//! `/chat/completions` endpoints (DeepSeek by default).

use async_trait::async_trait;
use serde::Deserialize;

use super::provider::{missing_api_key_error, parse_http_error, ChatProvider};
use super::types::{LlmError, LlmResponse, LlmResult, Message, UsageStats};
use crate::http_client::build_http_client;
use contract_review_core::AnalysisConfig;

/// Provider for any endpoint speaking the OpenAI chat-completion wire format
pub struct ChatCompletionsProvider {
    config: AnalysisConfig,
    client: reqwest::Client,
}

impl ChatCompletionsProvider {
    /// Create a new provider from an analysis configuration snapshot
    pub fn new(config: AnalysisConfig) -> LlmResult<Self> {
        let client = build_http_client(config.proxy.as_ref())?;
        Ok(Self { config, client })
    }

    /// Create a provider that reuses an existing HTTP client
    pub fn with_client(config: AnalysisConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    /// Get the configuration this provider was built from
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Build the request body for the API
    fn build_request_body(&self, messages: &[Message], system: Option<&str>) -> serde_json::Value {
        let mut wire_messages: Vec<serde_json::Value> = Vec::with_capacity(messages.len() + 1);

        if let Some(sys) = system {
            wire_messages.push(serde_json::json!({
                "role": "system",
                "content": sys
            }));
        }

        for msg in messages {
            wire_messages.push(serde_json::json!({
                "role": msg.role.as_str(),
                "content": msg.content
            }));
        }

        serde_json::json!({
            "model": self.config.model,
            "messages": wire_messages,
            "temperature": self.config.temperature,
            "max_tokens": self.config.max_tokens,
        })
    }

    /// Parse a response body from the API
    fn parse_response(&self, response: ChatCompletionResponse) -> LlmResult<LlmResponse> {
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::ParseError {
                message: "Response contained no choices".to_string(),
            })?;

        let usage = response
            .usage
            .map(|u| UsageStats {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
            })
            .unwrap_or_default();

        Ok(LlmResponse {
            content: choice.message.and_then(|m| m.content),
            finish_reason: choice.finish_reason,
            usage,
            model: response.model.unwrap_or_else(|| self.config.model.clone()),
        })
    }
}

#[async_trait]
impl ChatProvider for ChatCompletionsProvider {
    fn name(&self) -> &'static str {
        "chat-completions"
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn send_message(
        &self,
        messages: Vec<Message>,
        system: Option<String>,
    ) -> LlmResult<LlmResponse> {
        if !self.config.has_api_key() {
            return Err(missing_api_key_error(self.name()));
        }

        let body = self.build_request_body(&messages, system.as_deref());
        let url = self.config.completions_url();

        tracing::debug!(
            model = %self.config.model,
            url = %url,
            system_chars = system.as_deref().map(str::len).unwrap_or(0),
            message_count = messages.len(),
            "Sending chat completion request"
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::NetworkError {
                message: e.to_string(),
            })?;

        let status = response.status();
        let body_text = response.text().await.map_err(|e| LlmError::NetworkError {
            message: e.to_string(),
        })?;

        tracing::debug!(status = status.as_u16(), body_chars = body_text.len(), "Chat completion response");

        if !status.is_success() {
            return Err(parse_http_error(status.as_u16(), &body_text, self.name()));
        }

        let parsed: ChatCompletionResponse =
            serde_json::from_str(&body_text).map_err(|e| LlmError::ParseError {
                message: format!("Failed to parse response: {}", e),
            })?;

        self.parse_response(parsed)
    }
}

/// Chat-completion response format
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<ResponseUsage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}
