//! Analysis Configuration
//!
//! The connection and sampling parameters for one pipeline run. A run takes
//! its own clone of this value, so edits made while a run is in flight only
//! affect the next run.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::proxy::ProxyConfig;

/// Default chat-completion base URL
pub const DEFAULT_BASE_URL: &str = "https://api.deepseek.com/v1";

/// Default model identifier
pub const DEFAULT_MODEL: &str = "deepseek-chat";

/// Default sampling temperature
pub const DEFAULT_TEMPERATURE: f64 = 0.2;

/// Default maximum output token count
pub const DEFAULT_MAX_TOKENS: u32 = 4000;

/// Accepted range for `max_tokens`
const MAX_TOKENS_RANGE: std::ops::RangeInclusive<u32> = 100..=10_000;

/// Connection and sampling parameters for the chat-completion API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisConfig {
    /// Base URL; requests go to `{base_url}/chat/completions`
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Bearer token sent with every request
    #[serde(default)]
    pub api_key: String,
    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,
    /// Sampling temperature (0.0 - 1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// Maximum tokens to generate per call
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Optional outbound proxy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy: Option<ProxyConfig>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_temperature() -> f64 {
    DEFAULT_TEMPERATURE
}

fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            proxy: None,
        }
    }
}

impl AnalysisConfig {
    /// Whether an API key has been configured.
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// Full URL of the chat-completion endpoint.
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    /// API key with everything but the last four characters masked.
    pub fn masked_api_key(&self) -> String {
        let chars: Vec<char> = self.api_key.chars().collect();
        if chars.len() <= 4 {
            return "*".repeat(chars.len());
        }
        let visible: String = chars[chars.len() - 4..].iter().collect();
        format!("{}{}", "*".repeat(chars.len() - 4), visible)
    }

    /// Parse and validate a settings document. Absent keys take their defaults.
    pub fn from_json(content: &str) -> CoreResult<Self> {
        let config: AnalysisConfig = serde_json::from_str(content)?;
        config.validate().map_err(CoreError::Validation)?;
        Ok(config)
    }

    /// Validate and render as a pretty-printed settings document.
    pub fn to_json_pretty(&self) -> CoreResult<String> {
        self.validate().map_err(CoreError::Validation)?;
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate the configuration values.
    ///
    /// An empty API key is allowed here; it is rejected when a run starts.
    pub fn validate(&self) -> Result<(), String> {
        let url = url::Url::parse(&self.base_url)
            .map_err(|e| format!("Invalid base URL '{}': {}", self.base_url, e))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(format!(
                "Invalid base URL scheme '{}'. Must be 'http' or 'https'",
                url.scheme()
            ));
        }

        if self.model.trim().is_empty() {
            return Err("model must not be empty".to_string());
        }

        if !(0.0..=1.0).contains(&self.temperature) {
            return Err(format!(
                "temperature must be between 0.0 and 1.0, got {}",
                self.temperature
            ));
        }

        if !MAX_TOKENS_RANGE.contains(&self.max_tokens) {
            return Err(format!(
                "max_tokens must be between {} and {}, got {}",
                MAX_TOKENS_RANGE.start(),
                MAX_TOKENS_RANGE.end(),
                self.max_tokens
            ));
        }

        Ok(())
    }
}
