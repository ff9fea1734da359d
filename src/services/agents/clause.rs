//! Clause extraction agent.

use std::sync::Arc;

use contract_review_core::StageOutput;
use contract_review_llm::{ChatProvider, LlmResult};

use super::prompts::{user_prompt, CLAUSE_EXTRACTION_SYSTEM, CLAUSE_EXTRACTION_USER};
use super::structured::request_structured;

/// Extracts the nine key clause categories from raw contract text.
pub struct ClauseExtractionAgent {
    provider: Arc<dyn ChatProvider>,
}

impl ClauseExtractionAgent {
    pub fn new(provider: Arc<dyn ChatProvider>) -> Self {
        Self { provider }
    }

    /// Extract clauses from the contract text.
    pub async fn analyze(&self, contract_text: &str) -> LlmResult<StageOutput> {
        let prompt = user_prompt(CLAUSE_EXTRACTION_USER, contract_text);
        request_structured(
            self.provider.as_ref(),
            "clause_extraction",
            CLAUSE_EXTRACTION_SYSTEM,
            &prompt,
        )
        .await
    }
}
