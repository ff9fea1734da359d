//! Structured Reply Handling
//!
//! Shared plumbing for agents whose reply is expected to be JSON: fence
//! stripping, tolerant parsing, and serialising inputs into prompts.

use contract_review_core::StageOutput;
use contract_review_llm::{ChatProvider, LlmResult};
use serde_json::Value;

/// Remove Markdown code-fence markers (```` ```json ```` and ```` ``` ````) and surrounding whitespace.
pub fn strip_code_fences(reply: &str) -> String {
    reply
        .trim()
        .replace("```json", "")
        .replace("```", "")
        .trim()
        .to_string()
}

/// Parse a reply as JSON after fence stripping.
///
/// Never fails: an unparseable reply becomes [`StageOutput::ParseFailed`]
/// carrying the stripped text.
pub fn parse_structured_reply(reply: &str) -> StageOutput {
    let cleaned = strip_code_fences(reply);
    match serde_json::from_str::<Value>(&cleaned) {
        Ok(value) => StageOutput::Structured(value),
        Err(e) => StageOutput::ParseFailed {
            reason: e.to_string(),
            raw: cleaned,
        },
    }
}

/// Pretty-printed JSON for embedding in a user prompt. Non-ASCII text stays literal.
pub fn prompt_json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Issue one call and parse the reply as JSON.
pub(crate) async fn request_structured(
    provider: &dyn ChatProvider,
    agent: &str,
    system_prompt: &str,
    prompt: &str,
) -> LlmResult<StageOutput> {
    let reply = provider.complete(system_prompt, prompt).await?;
    let output = parse_structured_reply(&reply);

    if let StageOutput::ParseFailed { reason, .. } = &output {
        tracing::warn!(
            agent,
            reason = %reason,
            reply_chars = reply.len(),
            "Reply was not valid JSON; passing parse-failure record downstream"
        );
    }

    Ok(output)
}
