//! Report Export
//!
//! Serialises a [`PipelineResult`] into the combined review report, as
//! Markdown or as HTML converted from it.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use chrono::NaiveDateTime;
use contract_review_core::StageOutput;
use pulldown_cmark::{html, Options, Parser};
use serde_json::Value;

use crate::services::pipeline::{PipelineResult, Stage};
use crate::utils::error::AppResult;

/// Title line of the combined report
pub const REPORT_TITLE: &str = "# 合同审查综合报告";

/// Output format, chosen from the destination file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Text,
    Markdown,
    Html,
}

impl ExportFormat {
    /// `.html`/`.htm` -> Html, `.md`/`.markdown` -> Markdown, anything else -> Text
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("html") | Some("htm") => ExportFormat::Html,
            Some("md") | Some("markdown") => ExportFormat::Markdown,
            _ => ExportFormat::Text,
        }
    }
}

fn section_heading(stage: Stage) -> &'static str {
    match stage {
        Stage::ClauseExtraction => "## 一、关键条款提取结果",
        Stage::RiskAnalysis => "## 二、风险量化分析结果",
        Stage::ComplianceAnalysis => "## 三、合规性分析结果",
        Stage::Report => "## 四、详细审查报告",
        Stage::AccuracyCheck => "## 五、准确性检查结果",
    }
}

/// Render the combined Markdown report.
pub fn combined_markdown(result: &PipelineResult, reviewed_at: NaiveDateTime) -> String {
    let mut out = String::new();
    out.push_str(REPORT_TITLE);
    out.push_str("\n\n");
    let _ = write!(
        out,
        "**审查日期:** {}\n\n",
        reviewed_at.format("%Y年%m月%d日 %H:%M:%S")
    );

    for stage in [
        Stage::ClauseExtraction,
        Stage::RiskAnalysis,
        Stage::ComplianceAnalysis,
    ] {
        out.push_str(section_heading(stage));
        out.push_str("\n\n");
        push_structured(&mut out, result.get(stage));
    }

    out.push_str(section_heading(Stage::Report));
    out.push_str("\n\n");
    out.push_str(&result.report.display_text());

    out.push_str("\n\n");
    out.push_str(section_heading(Stage::AccuracyCheck));
    out.push_str("\n\n");
    out.push_str(&result.accuracy_check.display_text());

    out
}

fn push_structured(out: &mut String, output: &StageOutput) {
    match output.to_value() {
        Value::Object(map) => {
            for (key, value) in map {
                let _ = writeln!(out, "### {}", key);
                match value {
                    Value::Object(_) | Value::Array(_) => {
                        let pretty = serde_json::to_string_pretty(&value)
                            .unwrap_or_else(|_| value.to_string());
                        let _ = write!(out, "```json\n{}\n```\n\n", pretty);
                    }
                    scalar => {
                        let _ = write!(out, "{}\n\n", plain_text(&scalar));
                    }
                }
            }
        }
        other => {
            let _ = write!(out, "{}\n\n", plain_text(&other));
        }
    }
}

fn plain_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Convert Markdown to an HTML fragment.
pub fn render_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(markdown, options);
    let mut html_out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut html_out, parser);
    html_out
}

/// Write the combined report to `path` in the format its extension selects.
pub fn save_report(
    result: &PipelineResult,
    path: &Path,
    reviewed_at: NaiveDateTime,
) -> AppResult<ExportFormat> {
    let format = ExportFormat::from_path(path);
    let markdown = combined_markdown(result, reviewed_at);
    let content = match format {
        ExportFormat::Html => render_html(&markdown),
        ExportFormat::Text | ExportFormat::Markdown => markdown,
    };

    fs::write(path, content)?;
    tracing::info!(path = %path.display(), ?format, "Report saved");
    Ok(format)
}

/// Default file name, e.g. `合同审查报告_20260301_090507.txt`.
pub fn default_report_file_name(now: NaiveDateTime) -> String {
    format!("合同审查报告_{}.txt", now.format("%Y%m%d_%H%M%S"))
}
