//! Contract Review - Library
//!
//! Runs a contract through five LLM-backed analysis stages and exports the
//! combined review report. It includes:
//! - The analysis agents and the sequential review pipeline
//! - A review session enforcing one in-flight run
//! - Document loading (txt, docx, pdf)
//! - Settings storage and report export

pub mod models;
pub mod services;
pub mod state;
pub mod storage;
pub mod utils;

pub use contract_review_core::{AnalysisConfig, StageOutput};
pub use models::settings::SettingsUpdate;
pub use services::pipeline::{
    PipelineEvent, PipelineHandle, PipelineResult, PipelineRunner, PipelineState, RunOutcome,
    Stage,
};
pub use state::ReviewSession;
pub use storage::SettingsStore;
pub use utils::error::{AppError, AppResult};
