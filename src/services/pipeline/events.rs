//! Pipeline Events
//!
//! Everything a caller learns about a run arrives as a [`PipelineEvent`].

use std::collections::BTreeMap;

use contract_review_core::StageOutput;
use serde::Serialize;

use super::stage::{PipelineState, Stage};

/// Message of the first progress event of every run
pub const INIT_MESSAGE: &str = "初始化智能体...";
/// Percent of the first progress event of every run
pub const INIT_PERCENT: u8 = 10;

/// Notification emitted by a running pipeline.
///
/// A run emits progress events followed by exactly one of `Completed`,
/// `Failed` or `Cancelled`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PipelineEvent {
    Progress {
        percent: u8,
        message: String,
        state: PipelineState,
    },
    Completed {
        result: PipelineResult,
    },
    Failed {
        #[serde(skip_serializing_if = "Option::is_none")]
        stage: Option<Stage>,
        message: String,
    },
    Cancelled,
}

impl PipelineEvent {
    pub(crate) fn progress(percent: u8, message: &str, state: PipelineState) -> Self {
        PipelineEvent::Progress {
            percent,
            message: message.to_string(),
            state,
        }
    }

    /// Whether this is the last event of a run
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PipelineEvent::Progress { .. })
    }
}

/// Aggregated output of a completed run, keyed by stage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineResult {
    #[serde(rename = "clause-extraction")]
    pub clause_extraction: StageOutput,
    #[serde(rename = "risk-analysis")]
    pub risk_analysis: StageOutput,
    #[serde(rename = "compliance-analysis")]
    pub compliance_analysis: StageOutput,
    pub report: StageOutput,
    #[serde(rename = "accuracy-check")]
    pub accuracy_check: StageOutput,
}

impl PipelineResult {
    /// Assemble a result, or `None` if any stage output is missing.
    pub fn from_outputs(mut outputs: BTreeMap<Stage, StageOutput>) -> Option<Self> {
        Some(Self {
            clause_extraction: outputs.remove(&Stage::ClauseExtraction)?,
            risk_analysis: outputs.remove(&Stage::RiskAnalysis)?,
            compliance_analysis: outputs.remove(&Stage::ComplianceAnalysis)?,
            report: outputs.remove(&Stage::Report)?,
            accuracy_check: outputs.remove(&Stage::AccuracyCheck)?,
        })
    }

    pub fn get(&self, stage: Stage) -> &StageOutput {
        match stage {
            Stage::ClauseExtraction => &self.clause_extraction,
            Stage::RiskAnalysis => &self.risk_analysis,
            Stage::ComplianceAnalysis => &self.compliance_analysis,
            Stage::Report => &self.report,
            Stage::AccuracyCheck => &self.accuracy_check,
        }
    }

    /// Outputs in stage order
    pub fn iter(&self) -> impl Iterator<Item = (Stage, &StageOutput)> {
        Stage::ALL.into_iter().map(move |stage| (stage, self.get(stage)))
    }

    /// Stages whose structured reply could not be parsed
    pub fn parse_failures(&self) -> Vec<Stage> {
        self.iter()
            .filter(|(_, output)| output.is_parse_failure())
            .map(|(stage, _)| stage)
            .collect()
    }
}
