//! Contract Review LLM
//!
//! Provides the single-exchange chat interface the analysis stages are built on:
//! - `ChatProvider` trait (mockable seam for tests)
//! - `ChatCompletionsProvider` for OpenAI-compatible `/chat/completions` endpoints
//!   (DeepSeek, OpenAI, and self-hosted gateways)
//!
//! Also includes the HTTP client factory with proxy support.

pub mod chat_completions;
pub mod http_client;
pub mod provider;
pub mod types;

// Re-export main types
pub use chat_completions::ChatCompletionsProvider;
pub use http_client::build_http_client;
pub use provider::ChatProvider;
pub use types::*;
