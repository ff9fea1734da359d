//! Stub chat-completions endpoint shared by the integration tests.

use contract_review::AnalysisConfig;
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Distinctive phrases of each stage's system prompt, in stage order.
pub const CLAUSE_MARKER: &str = "合同条款分析专家";
pub const RISK_MARKER: &str = "合同风险评估专家";
pub const COMPLIANCE_MARKER: &str = "合同合规性审查专家";
pub const REPORT_MARKER: &str = "合同审查报告撰写专家";
pub const ACCURACY_MARKER: &str = "合同审查质量保证专家";

pub const CONTRACT: &str = "\
采购合同
甲方：华东机械有限公司
乙方：星海贸易有限公司
第一条 乙方向甲方供应数控机床两台，总价人民币四十万元。
第二条 甲方应于验收合格后三十日内付清全款。
第三条 因本合同引起的争议，提交上海仲裁委员会仲裁。";

pub const CLAUSES_REPLY: &str = "```json
{
  \"合同双方信息\": {\"甲方\": \"华东机械有限公司\", \"乙方\": \"星海贸易有限公司\"},
  \"合同标的\": \"数控机床两台\",
  \"争议解决方式\": \"上海仲裁委员会仲裁\"
}
```";
pub const RISK_REPLY: &str = r#"{"总体风险得分": 42, "风险等级": "中等风险"}"#;
pub const COMPLIANCE_REPLY: &str = r#"{"总体合规性评级": "基本合规", "合规性得分": 76}"#;
pub const REPORT_REPLY: &str = "## 报告概述\n本合同为设备采购合同。";
pub const ACCURACY_REPLY: &str = "报告与原合同内容一致。";

pub fn config_for(server: &MockServer) -> AnalysisConfig {
    AnalysisConfig {
        base_url: server.uri(),
        api_key: "sk-integration".to_string(),
        ..AnalysisConfig::default()
    }
}

pub fn completion(content: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "model": "deepseek-chat",
        "choices": [{
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }],
        "usage": { "prompt_tokens": 100, "completion_tokens": 20 }
    }))
}

/// Answer requests whose body contains `marker` with `response`, expecting `calls` hits.
pub async fn mount_stage(server: &MockServer, marker: &str, response: ResponseTemplate, calls: u64) {
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains(marker))
        .respond_with(response)
        .expect(calls)
        .mount(server)
        .await;
}

/// Mount all five stages answering with the canned replies.
pub async fn mount_happy_path(server: &MockServer) {
    mount_stage(server, CLAUSE_MARKER, completion(CLAUSES_REPLY), 1).await;
    mount_stage(server, RISK_MARKER, completion(RISK_REPLY), 1).await;
    mount_stage(server, COMPLIANCE_MARKER, completion(COMPLIANCE_REPLY), 1).await;
    mount_stage(server, REPORT_MARKER, completion(REPORT_REPLY), 1).await;
    mount_stage(server, ACCURACY_MARKER, completion(ACCURACY_REPLY), 1).await;
}
