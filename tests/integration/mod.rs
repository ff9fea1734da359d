//! Integration Tests Module
//!
//! End-to-end tests for the contract review pipeline against a stubbed
//! chat-completions endpoint, plus document loading and report export.

// Shared wiremock fixtures
mod support;

// Full pipeline runs over HTTP
mod pipeline_test;

// Review session and document loading
mod session_test;

// Combined report export
mod export_test;
