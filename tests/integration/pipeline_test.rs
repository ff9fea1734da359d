//! Pipeline Integration Tests
//!
//! Runs the five stages over HTTP against a wiremock chat endpoint.

use contract_review::services::pipeline::{start_review, PipelineRunner};
use contract_review::{AppError, PipelineEvent, PipelineState, RunOutcome, Stage, StageOutput};
use serde_json::json;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use wiremock::{MockServer, ResponseTemplate};

use crate::support::*;

async fn drain(mut handle: contract_review::PipelineHandle) -> (Vec<PipelineEvent>, RunOutcome) {
    let mut events = Vec::new();
    while let Some(event) = handle.next_event().await {
        events.push(event);
    }
    (events, handle.wait().await.unwrap())
}

fn percents(events: &[PipelineEvent]) -> Vec<u8> {
    events
        .iter()
        .filter_map(|e| match e {
            PipelineEvent::Progress { percent, .. } => Some(*percent),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn test_full_review_over_http() {
    let server = MockServer::start().await;
    mount_happy_path(&server).await;

    let handle = start_review(&config_for(&server), CONTRACT.to_string()).unwrap();
    let (events, outcome) = drain(handle).await;

    let progress = percents(&events);
    assert_eq!(progress, vec![10, 20, 35, 40, 55, 60, 75, 80, 90, 91, 100]);
    assert!(progress.windows(2).all(|w| w[0] <= w[1]));

    let result = match outcome {
        RunOutcome::Completed(result) => result,
        other => panic!("expected completion, got {:?}", other),
    };
    assert_eq!(
        result.clause_extraction.to_value()["合同标的"],
        json!("数控机床两台")
    );
    assert_eq!(result.risk_analysis.to_value()["总体风险得分"], json!(42));
    assert_eq!(result.compliance_analysis.to_value()["合规性得分"], json!(76));
    assert_eq!(result.report, StageOutput::Text(REPORT_REPLY.to_string()));
    assert_eq!(result.accuracy_check, StageOutput::Text(ACCURACY_REPLY.to_string()));

    assert_eq!(
        events.last(),
        Some(&PipelineEvent::Completed { result })
    );
}

#[tokio::test]
async fn test_clause_order_preserved_in_result() {
    let server = MockServer::start().await;
    mount_happy_path(&server).await;

    let handle = start_review(&config_for(&server), CONTRACT.to_string()).unwrap();
    let (_, outcome) = drain(handle).await;
    let result = outcome.into_result().unwrap();

    let clauses = result.clause_extraction.to_value();
    let keys: Vec<&String> = clauses.as_object().unwrap().keys().collect();
    assert_eq!(keys, vec!["合同双方信息", "合同标的", "争议解决方式"]);
}

#[tokio::test]
async fn test_risk_stage_transport_failure_is_fatal() {
    let server = MockServer::start().await;
    mount_stage(&server, CLAUSE_MARKER, completion(CLAUSES_REPLY), 1).await;
    mount_stage(
        &server,
        RISK_MARKER,
        ResponseTemplate::new(502).set_body_string("bad gateway"),
        1,
    )
    .await;
    mount_stage(&server, COMPLIANCE_MARKER, completion(COMPLIANCE_REPLY), 0).await;
    mount_stage(&server, REPORT_MARKER, completion(REPORT_REPLY), 0).await;
    mount_stage(&server, ACCURACY_MARKER, completion(ACCURACY_REPLY), 0).await;

    let handle = start_review(&config_for(&server), CONTRACT.to_string()).unwrap();
    let (events, outcome) = drain(handle).await;

    assert_eq!(outcome.state(), PipelineState::Failed);
    let failures: Vec<_> = events
        .iter()
        .filter(|e| matches!(e, PipelineEvent::Failed { .. }))
        .collect();
    assert_eq!(failures.len(), 1);
    match failures[0] {
        PipelineEvent::Failed { stage, message } => {
            assert_eq!(*stage, Some(Stage::RiskAnalysis));
            assert!(message.contains("502"));
            assert!(message.contains("bad gateway"));
        }
        _ => unreachable!(),
    }
    assert!(!events
        .iter()
        .any(|e| matches!(e, PipelineEvent::Completed { .. })));
}

#[tokio::test]
async fn test_unparseable_clause_reply_degrades_gracefully() {
    let server = MockServer::start().await;
    mount_stage(&server, CLAUSE_MARKER, completion("抱歉，无法解析该合同"), 1).await;
    mount_stage(&server, RISK_MARKER, completion(RISK_REPLY), 1).await;
    mount_stage(&server, COMPLIANCE_MARKER, completion(COMPLIANCE_REPLY), 1).await;
    mount_stage(&server, REPORT_MARKER, completion(REPORT_REPLY), 1).await;
    mount_stage(&server, ACCURACY_MARKER, completion(ACCURACY_REPLY), 1).await;

    let handle = start_review(&config_for(&server), CONTRACT.to_string()).unwrap();
    let (_, outcome) = drain(handle).await;
    let result = outcome.into_result().unwrap();

    assert_eq!(result.parse_failures(), vec![Stage::ClauseExtraction]);
    let record = result.clause_extraction.to_value();
    assert!(record["解析错误"]
        .as_str()
        .unwrap()
        .contains("抱歉，无法解析该合同"));
}

#[tokio::test]
async fn test_empty_contract_rejected_before_any_request() {
    let server = MockServer::start().await;
    mount_stage(&server, CLAUSE_MARKER, completion(CLAUSES_REPLY), 0).await;

    let err = start_review(&config_for(&server), "   \n".to_string()).unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn test_cancelled_run_stops_before_next_request() {
    let server = MockServer::start().await;
    mount_stage(&server, CLAUSE_MARKER, completion(CLAUSES_REPLY), 0).await;

    let runner = PipelineRunner::from_config(&config_for(&server)).unwrap();
    let (tx, mut rx) = mpsc::channel(16);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let outcome = runner.run(CONTRACT, &tx, &cancel).await;
    drop(tx);

    assert_eq!(outcome, RunOutcome::Cancelled);
    let mut last = None;
    while let Some(event) = rx.recv().await {
        last = Some(event);
    }
    assert_eq!(last, Some(PipelineEvent::Cancelled));
}
