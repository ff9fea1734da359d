//! HTTP Client Factory
//!
//! Provides a factory function for building reqwest clients with proxy support.

use contract_review_core::proxy::ProxyConfig;

use crate::types::{LlmError, LlmResult};

/// Build a `reqwest::Client` with the resolved proxy configuration.
///
/// - `Some(proxy)` -> configure proxy on the client
/// - `None` -> reqwest defaults, which honour `HTTP_PROXY`/`HTTPS_PROXY`
pub fn build_http_client(proxy: Option<&ProxyConfig>) -> LlmResult<reqwest::Client> {
    let mut builder = reqwest::Client::builder();
    if let Some(cfg) = proxy {
        let url = cfg.url();
        let mut p = reqwest::Proxy::all(&url).map_err(|e| LlmError::InvalidRequest {
            message: format!("Invalid proxy URL {}: {}", url, e),
        })?;
        if let (Some(u), Some(pw)) = (&cfg.username, &cfg.password) {
            p = p.basic_auth(u, pw);
        }
        builder = builder.proxy(p);
    }
    builder.build().map_err(|e| LlmError::Other {
        message: format!("Failed to build HTTP client: {}", e),
    })
}
