//! Risk scoring agent.

use std::sync::Arc;

use contract_review_core::StageOutput;
use contract_review_llm::{ChatProvider, LlmResult};

use super::prompts::{user_prompt, RISK_ANALYSIS_SYSTEM, RISK_ANALYSIS_USER};
use super::structured::{prompt_json, request_structured};

/// Scores each extracted clause and the contract as a whole (0-100).
pub struct RiskAnalysisAgent {
    provider: Arc<dyn ChatProvider>,
}

impl RiskAnalysisAgent {
    pub fn new(provider: Arc<dyn ChatProvider>) -> Self {
        Self { provider }
    }

    /// Score the clauses produced by the extraction stage, whatever their shape.
    pub async fn analyze(&self, clauses: &StageOutput) -> LlmResult<StageOutput> {
        let prompt = user_prompt(RISK_ANALYSIS_USER, &prompt_json(&clauses.to_value()));
        request_structured(
            self.provider.as_ref(),
            "risk_analysis",
            RISK_ANALYSIS_SYSTEM,
            &prompt,
        )
        .await
    }
}
