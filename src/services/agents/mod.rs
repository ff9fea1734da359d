//! Analysis Agents
//!
//! One agent per pipeline stage, each built on a [`ChatProvider`] with a fixed
//! instruction template:
//! - `ClauseExtractionAgent` - contract text -> clause mapping (JSON)
//! - `RiskAnalysisAgent` - clauses -> risk scoring (JSON)
//! - `ComplianceAnalysisAgent` - clauses + rules -> compliance verdicts (JSON)
//! - `ReportGenerationAgent` - clauses + risk + compliance -> report (prose)
//! - `AccuracyCheckAgent` - contract text + report -> critique (prose)
//!
//! Every agent makes exactly one call per invocation and never retries.

pub mod accuracy;
pub mod clause;
pub mod compliance;
pub mod prompts;
pub mod report;
pub mod risk;
pub mod structured;

pub use accuracy::AccuracyCheckAgent;
pub use clause::ClauseExtractionAgent;
pub use compliance::ComplianceAnalysisAgent;
pub use report::ReportGenerationAgent;
pub use risk::RiskAnalysisAgent;
pub use structured::{parse_structured_reply, strip_code_fences};

#[cfg(test)]
pub(crate) mod test_support {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use contract_review_llm::{
        ChatProvider, LlmError, LlmResponse, LlmResult, Message, UsageStats,
    };

    /// A call seen by [`ScriptedProvider`]
    #[derive(Debug, Clone)]
    pub struct RecordedCall {
        pub system: String,
        pub prompt: String,
    }

    /// Provider returning queued replies in order and recording every call.
    #[derive(Default)]
    pub struct ScriptedProvider {
        replies: Mutex<VecDeque<LlmResult<String>>>,
        calls: Mutex<Vec<RecordedCall>>,
    }

    impl ScriptedProvider {
        pub fn new(replies: Vec<LlmResult<String>>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn replying(replies: &[&str]) -> Self {
            Self::new(replies.iter().map(|r| Ok(r.to_string())).collect())
        }

        pub fn calls(&self) -> Vec<RecordedCall> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ChatProvider for ScriptedProvider {
        fn name(&self) -> &'static str {
            "scripted"
        }

        fn model(&self) -> &str {
            "scripted-model"
        }

        async fn send_message(
            &self,
            messages: Vec<Message>,
            system: Option<String>,
        ) -> LlmResult<LlmResponse> {
            self.calls.lock().unwrap().push(RecordedCall {
                system: system.unwrap_or_default(),
                prompt: messages
                    .into_iter()
                    .map(|m| m.content)
                    .collect::<Vec<_>>()
                    .join("\n"),
            });

            let reply = self
                .replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| {
                    Err(LlmError::Other {
                        message: "no scripted reply left".to_string(),
                    })
                })?;

            Ok(LlmResponse {
                content: Some(reply),
                finish_reason: Some("stop".to_string()),
                usage: UsageStats::default(),
                model: "scripted-model".to_string(),
            })
        }
    }
}
