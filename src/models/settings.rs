//! Settings Models
//!
//! Partial updates to the persisted analysis configuration.

use contract_review_core::{AnalysisConfig, ProxyConfig};
use serde::{Deserialize, Serialize};

/// Partial settings update; `None` fields keep their current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
    /// `Some(None)` clears the proxy
    pub proxy: Option<Option<ProxyConfig>>,
}

impl SettingsUpdate {
    /// Whether the update changes nothing
    pub fn is_empty(&self) -> bool {
        self.api_key.is_none()
            && self.base_url.is_none()
            && self.model.is_none()
            && self.temperature.is_none()
            && self.max_tokens.is_none()
            && self.proxy.is_none()
    }

    /// Apply this update to a configuration
    pub fn apply_to(self, config: &mut AnalysisConfig) {
        if let Some(api_key) = self.api_key {
            config.api_key = api_key;
        }
        if let Some(base_url) = self.base_url {
            config.base_url = base_url;
        }
        if let Some(model) = self.model {
            config.model = model;
        }
        if let Some(temperature) = self.temperature {
            config.temperature = temperature;
        }
        if let Some(max_tokens) = self.max_tokens {
            config.max_tokens = max_tokens;
        }
        if let Some(proxy) = self.proxy {
            config.proxy = proxy;
        }
    }
}
