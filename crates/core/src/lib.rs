//! Contract Review Core
//!
//! Foundational types for the Contract Review workspace. This crate has zero
//! dependencies on application-level code (HTTP clients, file loaders,
//! the pipeline runner, etc.).
//!
//! ## Module Organization
//!
//! - `error` - Core error types (`CoreError`, `CoreResult`)
//! - `config` - Per-run analysis configuration (`AnalysisConfig`)
//! - `proxy` - Proxy configuration data types shared across workspace crates
//! - `stage_output` - Output of a single analysis stage (`StageOutput`)
//!
//! ## Design Principles
//!
//! 1. **Zero external dependencies beyond serde/thiserror/url** - keeps build times minimal
//! 2. **Plain data** - everything here is `Clone` and serializable so it can cross task boundaries
//! 3. **Unidirectional dependency** - this crate depends on nothing else in the workspace

pub mod config;
pub mod error;
pub mod proxy;
pub mod stage_output;

// ── Error Types ────────────────────────────────────────────────────────
pub use error::{CoreError, CoreResult};

// ── Analysis Configuration ─────────────────────────────────────────────
pub use config::{
    AnalysisConfig, DEFAULT_BASE_URL, DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_TEMPERATURE,
};

// ── Proxy Types ────────────────────────────────────────────────────────
pub use proxy::{ProxyConfig, ProxyProtocol};

// ── Stage Output ───────────────────────────────────────────────────────
pub use stage_output::{StageOutput, PARSE_ERROR_KEY};
