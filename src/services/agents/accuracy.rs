//! Accuracy check agent.

use std::sync::Arc;

use contract_review_core::StageOutput;
use contract_review_llm::{ChatProvider, LlmResult};

use super::prompts::{accuracy_check_user, ACCURACY_CHECK_SYSTEM};

/// Compares the drafted report against the original contract text.
pub struct AccuracyCheckAgent {
    provider: Arc<dyn ChatProvider>,
}

impl AccuracyCheckAgent {
    pub fn new(provider: Arc<dyn ChatProvider>) -> Self {
        Self { provider }
    }

    /// Critique the report. The reply is prose and is returned verbatim.
    pub async fn check(
        &self,
        original_contract: &str,
        generated_report: &StageOutput,
    ) -> LlmResult<StageOutput> {
        let prompt = accuracy_check_user(original_contract, &generated_report.display_text());
        let critique = self
            .provider
            .complete(ACCURACY_CHECK_SYSTEM, &prompt)
            .await?;
        Ok(StageOutput::Text(critique))
    }
}
