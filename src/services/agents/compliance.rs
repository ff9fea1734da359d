//! Compliance check agent.

use std::sync::Arc;

use contract_review_core::StageOutput;
use contract_review_llm::{ChatProvider, LlmResult};

use super::prompts::{
    compliance_system, user_prompt, COMPLIANCE_ANALYSIS_USER, DEFAULT_COMPLIANCE_RULES,
};
use super::structured::{prompt_json, request_structured};

/// Checks extracted clauses against a set of normative rules.
pub struct ComplianceAnalysisAgent {
    provider: Arc<dyn ChatProvider>,
    rules: String,
}

impl ComplianceAnalysisAgent {
    /// Agent using the nine default rules
    pub fn new(provider: Arc<dyn ChatProvider>) -> Self {
        Self::with_rules(provider, DEFAULT_COMPLIANCE_RULES)
    }

    /// Agent using a caller-supplied rule set; blank rules fall back to the defaults
    pub fn with_rules(provider: Arc<dyn ChatProvider>, rules: impl Into<String>) -> Self {
        let rules = rules.into();
        let rules = if rules.trim().is_empty() {
            DEFAULT_COMPLIANCE_RULES.to_string()
        } else {
            rules
        };
        Self { provider, rules }
    }

    /// The rule text embedded in the system prompt
    pub fn rules(&self) -> &str {
        &self.rules
    }

    /// Check the clauses produced by the extraction stage, whatever their shape.
    pub async fn analyze(&self, clauses: &StageOutput) -> LlmResult<StageOutput> {
        let system = compliance_system(&self.rules);
        let prompt = user_prompt(COMPLIANCE_ANALYSIS_USER, &prompt_json(&clauses.to_value()));
        request_structured(
            self.provider.as_ref(),
            "compliance_analysis",
            &system,
            &prompt,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::agents::test_support::ScriptedProvider;
    use serde_json::json;

    #[tokio::test]
    async fn test_default_rules_in_system_prompt() {
        let provider = Arc::new(ScriptedProvider::replying(&[
            r#"{"总体合规性评级": "基本合规", "合规性得分": 78}"#,
        ]));
        let agent = ComplianceAnalysisAgent::new(provider.clone());

        let output = agent
            .analyze(&StageOutput::Structured(json!({"合同标的": "设备"})))
            .await
            .unwrap();
        assert_eq!(output.to_value()["合规性得分"], 78);

        let system = &provider.calls()[0].system;
        assert!(system.contains("9. 终止条款必须明确终止条件和程序。"));
    }

    #[tokio::test]
    async fn test_custom_rules_replace_defaults() {
        let provider = Arc::new(ScriptedProvider::replying(&["{}"]));
        let agent = ComplianceAnalysisAgent::with_rules(provider.clone(), "1. 必须约定管辖法院。");

        agent
            .analyze(&StageOutput::Structured(json!({})))
            .await
            .unwrap();

        let system = &provider.calls()[0].system;
        assert!(system.contains("必须约定管辖法院"));
        assert!(!system.contains("保密期限"));
    }

    #[test]
    fn test_blank_rules_fall_back_to_defaults() {
        let provider = Arc::new(ScriptedProvider::default());
        let agent = ComplianceAnalysisAgent::with_rules(provider, "   ");
        assert_eq!(agent.rules(), DEFAULT_COMPLIANCE_RULES);
    }
}
