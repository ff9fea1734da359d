//! Chat Provider Trait
//!
//! Defines the interface every analysis stage talks to.

use async_trait::async_trait;

use super::types::{LlmError, LlmResponse, LlmResult, Message};

/// Trait that all chat-completion providers must implement.
///
/// Provides a unified interface for:
/// - Single message completions (send_message)
/// - The one-shot system + user exchange the analysis stages use (complete)
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Returns the provider name for identification.
    fn name(&self) -> &'static str;

    /// Returns the current model being used.
    fn model(&self) -> &str;

    /// Send a conversation and get a complete response.
    ///
    /// # Arguments
    /// * `messages` - Conversation history
    /// * `system` - Optional system prompt, sent ahead of `messages`
    async fn send_message(
        &self,
        messages: Vec<Message>,
        system: Option<String>,
    ) -> LlmResult<LlmResponse>;

    /// Send one system prompt and one user prompt, returning the reply text.
    ///
    /// A response without text content is reported as a parse error.
    async fn complete(&self, system_prompt: &str, prompt: &str) -> LlmResult<String> {
        let response = self
            .send_message(
                vec![Message::user(prompt)],
                Some(system_prompt.to_string()),
            )
            .await?;

        response.content.ok_or_else(|| LlmError::ParseError {
            message: format!("{}: response contained no message content", self.name()),
        })
    }
}

/// Helper function to create an error for missing API key
pub fn missing_api_key_error(provider: &str) -> LlmError {
    LlmError::AuthenticationFailed {
        message: format!("API key not configured for {}", provider),
    }
}

/// Helper function to parse HTTP error status codes
pub fn parse_http_error(status: u16, body: &str, provider: &str) -> LlmError {
    match status {
        401 => LlmError::AuthenticationFailed {
            message: format!("{}: Invalid API key (HTTP 401): {}", provider, body),
        },
        403 => LlmError::AuthenticationFailed {
            message: format!("{}: Access denied (HTTP 403): {}", provider, body),
        },
        404 => LlmError::ModelNotFound {
            model: format!("HTTP 404: {}", body),
        },
        429 => LlmError::RateLimited {
            message: format!("HTTP 429: {}", body),
        },
        400 => LlmError::InvalidRequest {
            message: format!("HTTP 400: {}", body),
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
    use crate::types::UsageStats;
    use std::sync::Mutex;

    #[test]
    fn test_missing_api_key_error() {
        let err = missing_api_key_error("chat-completions");
        match err {
            LlmError::AuthenticationFailed { message } => {
                assert!(message.contains("chat-completions"));
            }
            _ => panic!("Expected AuthenticationFailed"),
        }
    }

    #[test]
    fn test_parse_http_error() {
        let err = parse_http_error(401, "unauthorized", "deepseek");
        assert!(matches!(err, LlmError::AuthenticationFailed { .. }));

        let err = parse_http_error(429, "rate limited", "deepseek");
        assert!(matches!(err, LlmError::RateLimited { .. }));

        let err = parse_http_error(500, "internal error", "deepseek");
        assert!(matches!(err, LlmError::ServerError { status: Some(500), .. }));

        let err = parse_http_error(418, "teapot", "deepseek");
        assert_eq!(err.to_string(), "Error: HTTP 418: teapot");
    }

    struct RecordingProvider {
        reply: Option<String>,
        seen: Mutex<Vec<(Vec<Message>, Option<String>)>>,
    }

    #[async_trait]
    impl ChatProvider for RecordingProvider {
        fn name(&self) -> &'static str {
            "recording"
        }

        fn model(&self) -> &str {
            "test-model"
        }

        async fn send_message(
            &self,
            messages: Vec<Message>,
            system: Option<String>,
        ) -> LlmResult<LlmResponse> {
            self.seen.lock().unwrap().push((messages, system));
            Ok(LlmResponse {
                content: self.reply.clone(),
                finish_reason: Some("stop".to_string()),
                usage: UsageStats::default(),
                model: "test-model".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_complete_sends_system_and_user_prompt() {
        let provider = RecordingProvider {
            reply: Some("done".to_string()),
            seen: Mutex::new(Vec::new()),
        };

        let reply = provider.complete("be strict", "review this").await.unwrap();
        assert_eq!(reply, "done");

        let seen = provider.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, vec![Message::user("review this")]);
        assert_eq!(seen[0].1.as_deref(), Some("be strict"));
    }

    #[tokio::test]
    async fn test_complete_without_content_is_parse_error() {
        let provider = RecordingProvider {
            reply: None,
            seen: Mutex::new(Vec::new()),
        };

        let err = provider.complete("sys", "user").await.unwrap_err();
        assert!(matches!(err, LlmError::ParseError { .. }));
    }
}
