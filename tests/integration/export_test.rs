//! Report Export Integration Tests
//!
//! Runs a review and saves the combined report in each format.

use std::fs;

use chrono::NaiveDate;
use contract_review::services::export::{save_report, ExportFormat};
use contract_review::services::pipeline::start_review;
use contract_review::PipelineResult;
use tempfile::TempDir;
use wiremock::MockServer;

use crate::support::*;

const SECTIONS: [&str; 5] = [
    "一、关键条款提取结果",
    "二、风险量化分析结果",
    "三、合规性分析结果",
    "四、详细审查报告",
    "五、准确性检查结果",
];

async fn reviewed_result() -> PipelineResult {
    let server = MockServer::start().await;
    mount_happy_path(&server).await;
    let handle = start_review(&config_for(&server), CONTRACT.to_string()).unwrap();
    handle.wait().await.unwrap().into_result().unwrap()
}

fn reviewed_at() -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 10, 16)
        .unwrap()
        .and_hms_opt(14, 30, 0)
        .unwrap()
}

fn assert_sections_in_order(content: &str) {
    let positions: Vec<usize> = SECTIONS
        .iter()
        .map(|s| content.find(s).unwrap_or_else(|| panic!("missing section {}", s)))
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
}

#[tokio::test]
async fn test_markdown_export_contains_every_stage() {
    let result = reviewed_result().await;
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("report.md");

    let format = save_report(&result, &path, reviewed_at()).unwrap();
    assert_eq!(format, ExportFormat::Markdown);

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.starts_with("# 合同审查综合报告"));
    assert!(content.contains("**审查日期:** 2026年10月16日 14:30:00"));
    assert_sections_in_order(&content);
    assert!(content.contains("### 合同标的\n数控机床两台"));
    assert!(content.contains("### 合同双方信息\n```json\n"));
    assert!(content.contains("### 总体风险得分\n42"));
    assert!(content.contains(REPORT_REPLY));
    assert!(content.trim_end().ends_with(ACCURACY_REPLY));
}

#[tokio::test]
async fn test_html_export() {
    let result = reviewed_result().await;
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("report.html");

    assert_eq!(
        save_report(&result, &path, reviewed_at()).unwrap(),
        ExportFormat::Html
    );

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("<h1>合同审查综合报告</h1>"));
    assert!(content.contains("<strong>审查日期:</strong>"));
    assert_sections_in_order(&content);
}

#[tokio::test]
async fn test_text_export_is_markdown_source() {
    let result = reviewed_result().await;
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("report.txt");

    assert_eq!(
        save_report(&result, &path, reviewed_at()).unwrap(),
        ExportFormat::Text
    );
    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("## 四、详细审查报告"));
}
