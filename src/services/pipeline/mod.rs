//! Review Pipeline
//!
//! Five analysis stages executed in a fixed order on a background task:
//!
//! ```text
//! clause-extraction -> risk-analysis -> compliance-analysis -> report -> accuracy-check
//! ```
//!
//! Callers start a run with [`start_review`] and consume [`PipelineEvent`]s
//! from the returned [`PipelineHandle`].

pub mod events;
pub mod runner;
pub mod stage;

pub use events::{PipelineEvent, PipelineResult};
pub use runner::{PipelineHandle, PipelineRunner, RunOutcome, EVENT_CHANNEL_CAPACITY};
pub use stage::{AgentStageExecutor, PipelineState, Stage, StageExecutor, StageInputs};

use contract_review_core::AnalysisConfig;

use crate::utils::error::{AppError, AppResult};

/// Check that a run could start: non-blank text, an API key and valid settings.
///
/// Nothing is spawned and no request is made.
pub fn validate_review_inputs(config: &AnalysisConfig, contract_text: &str) -> AppResult<()> {
    if contract_text.trim().is_empty() {
        return Err(AppError::validation("合同文本为空，请先加载合同文件"));
    }
    if !config.has_api_key() {
        return Err(AppError::validation("未配置API密钥，请先在设置中填写"));
    }
    config.validate().map_err(AppError::validation)
}

/// Validate inputs and build a runner for `config`.
pub fn prepare_review(config: &AnalysisConfig, contract_text: &str) -> AppResult<PipelineRunner> {
    validate_review_inputs(config, contract_text)?;
    Ok(PipelineRunner::from_config(config)?)
}

/// Validate inputs and spawn a run. Must be called within a tokio runtime.
pub fn start_review(config: &AnalysisConfig, contract_text: String) -> AppResult<PipelineHandle> {
    let runner = prepare_review(config, &contract_text)?;
    tracing::info!(
        model = %config.model,
        chars = contract_text.chars().count(),
        "Starting contract review"
    );
    Ok(runner.spawn(contract_text))
}
