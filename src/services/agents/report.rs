//! Report drafting agent.

use std::sync::Arc;

use contract_review_core::StageOutput;
use contract_review_llm::{ChatProvider, LlmResult};
use serde_json::{Map, Value};

use super::prompts::{
    user_prompt, REPORT_GENERATION_SYSTEM, REPORT_GENERATION_USER, REPORT_KEY_CLAUSES,
    REPORT_KEY_COMPLIANCE, REPORT_KEY_RISK,
};
use super::structured::prompt_json;

/// Drafts the six-section review report from the three structured analyses.
pub struct ReportGenerationAgent {
    provider: Arc<dyn ChatProvider>,
}

impl ReportGenerationAgent {
    pub fn new(provider: Arc<dyn ChatProvider>) -> Self {
        Self { provider }
    }

    /// Draft the report. The reply is prose and is returned verbatim.
    pub async fn generate(
        &self,
        clauses: &StageOutput,
        risk: &StageOutput,
        compliance: &StageOutput,
    ) -> LlmResult<StageOutput> {
        let mut envelope = Map::new();
        envelope.insert(REPORT_KEY_CLAUSES.to_string(), clauses.to_value());
        envelope.insert(REPORT_KEY_RISK.to_string(), risk.to_value());
        envelope.insert(REPORT_KEY_COMPLIANCE.to_string(), compliance.to_value());

        let prompt = user_prompt(REPORT_GENERATION_USER, &prompt_json(&Value::Object(envelope)));
        let report = self
            .provider
            .complete(REPORT_GENERATION_SYSTEM, &prompt)
            .await?;
        Ok(StageOutput::Text(report))
    }
}
