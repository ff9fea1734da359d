//! Stage Definitions
//!
//! The fixed, ordered list of analysis stages, the data each one consumes,
//! and the executor seam the runner drives.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use contract_review_core::StageOutput;
use contract_review_llm::{ChatProvider, LlmError, LlmResult};
use serde::{Deserialize, Serialize};

use crate::services::agents::{
    AccuracyCheckAgent, ClauseExtractionAgent, ComplianceAnalysisAgent, ReportGenerationAgent,
    RiskAnalysisAgent,
};

// ============================================================================
// Stage
// ============================================================================

/// One analysis step. Declaration order is execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    ClauseExtraction,
    RiskAnalysis,
    ComplianceAnalysis,
    Report,
    AccuracyCheck,
}

impl Stage {
    /// All stages in execution order
    pub const ALL: [Stage; 5] = [
        Stage::ClauseExtraction,
        Stage::RiskAnalysis,
        Stage::ComplianceAnalysis,
        Stage::Report,
        Stage::AccuracyCheck,
    ];

    /// Key of this stage in the aggregated result
    pub fn key(&self) -> &'static str {
        match self {
            Stage::ClauseExtraction => "clause-extraction",
            Stage::RiskAnalysis => "risk-analysis",
            Stage::ComplianceAnalysis => "compliance-analysis",
            Stage::Report => "report",
            Stage::AccuracyCheck => "accuracy-check",
        }
    }

    /// Zero-based position in [`Stage::ALL`]
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Earlier stages whose outputs this stage consumes.
    pub fn dependencies(&self) -> &'static [Stage] {
        match self {
            Stage::ClauseExtraction => &[],
            Stage::RiskAnalysis | Stage::ComplianceAnalysis => &[Stage::ClauseExtraction],
            Stage::Report => &[
                Stage::ClauseExtraction,
                Stage::RiskAnalysis,
                Stage::ComplianceAnalysis,
            ],
            Stage::AccuracyCheck => &[Stage::Report],
        }
    }

    /// Whether the raw contract text is an input of this stage
    pub fn uses_contract_text(&self) -> bool {
        matches!(self, Stage::ClauseExtraction | Stage::AccuracyCheck)
    }

    /// Progress percentages reported when the stage starts and finishes
    pub fn progress(&self) -> (u8, u8) {
        match self {
            Stage::ClauseExtraction => (20, 35),
            Stage::RiskAnalysis => (40, 55),
            Stage::ComplianceAnalysis => (60, 75),
            Stage::Report => (80, 90),
            Stage::AccuracyCheck => (91, 100),
        }
    }

    /// Pipeline state while this stage runs
    pub fn state(&self) -> PipelineState {
        match self {
            Stage::ClauseExtraction => PipelineState::ExtractingClauses,
            Stage::RiskAnalysis => PipelineState::AnalyzingRisk,
            Stage::ComplianceAnalysis => PipelineState::CheckingCompliance,
            Stage::Report => PipelineState::GeneratingReport,
            Stage::AccuracyCheck => PipelineState::CheckingAccuracy,
        }
    }

    pub fn started_message(&self) -> &'static str {
        match self {
            Stage::ClauseExtraction => "正在提取合同关键条款...",
            Stage::RiskAnalysis => "正在进行风险量化分析...",
            Stage::ComplianceAnalysis => "正在进行合规性分析...",
            Stage::Report => "正在生成审查报告...",
            Stage::AccuracyCheck => "正在检查报告准确性...",
        }
    }

    pub fn finished_message(&self) -> &'static str {
        match self {
            Stage::ClauseExtraction => "合同关键条款提取完成",
            Stage::RiskAnalysis => "风险量化分析完成",
            Stage::ComplianceAnalysis => "合规性分析完成",
            Stage::Report => "审查报告生成完成",
            Stage::AccuracyCheck => "报告准确性检查完成",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

// ============================================================================
// Pipeline State
// ============================================================================

/// Lifecycle of one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    Idle,
    ExtractingClauses,
    AnalyzingRisk,
    CheckingCompliance,
    GeneratingReport,
    CheckingAccuracy,
    Complete,
    Failed,
    Cancelled,
}

impl PipelineState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PipelineState::Complete | PipelineState::Failed | PipelineState::Cancelled
        )
    }
}

// ============================================================================
// Stage Inputs
// ============================================================================

/// Inputs handed to one stage: the outputs of its declared dependencies and,
/// when the stage reads it, the contract text. Nothing else is visible.
#[derive(Debug)]
pub struct StageInputs<'a> {
    stage: Stage,
    contract_text: Option<&'a str>,
    outputs: BTreeMap<Stage, &'a StageOutput>,
}

impl<'a> StageInputs<'a> {
    /// Select the inputs of `stage` from the outputs accumulated so far.
    pub fn collect(
        stage: Stage,
        contract_text: &'a str,
        accumulated: &'a BTreeMap<Stage, StageOutput>,
    ) -> Self {
        let outputs = stage
            .dependencies()
            .iter()
            .filter_map(|dep| accumulated.get(dep).map(|output| (*dep, output)))
            .collect();

        Self {
            stage,
            contract_text: stage.uses_contract_text().then_some(contract_text),
            outputs,
        }
    }

    pub fn contract_text(&self) -> Option<&'a str> {
        self.contract_text
    }

    /// Output of a dependency, if it was provided
    pub fn output(&self, stage: Stage) -> Option<&'a StageOutput> {
        self.outputs.get(&stage).copied()
    }

    /// Stages whose outputs are present
    pub fn provided(&self) -> Vec<Stage> {
        self.outputs.keys().copied().collect()
    }

    fn require(&self, dep: Stage) -> LlmResult<&'a StageOutput> {
        self.output(dep).ok_or_else(|| LlmError::InvalidRequest {
            message: format!("{} stage is missing input from {}", self.stage, dep),
        })
    }

    fn require_text(&self) -> LlmResult<&'a str> {
        self.contract_text.ok_or_else(|| LlmError::InvalidRequest {
            message: format!("{} stage is missing the contract text", self.stage),
        })
    }
}

// ============================================================================
// Executor
// ============================================================================

/// Runs a single stage. The runner owns ordering; executors own the calls.
#[async_trait]
pub trait StageExecutor: Send + Sync {
    async fn execute(&self, stage: Stage, inputs: StageInputs<'_>) -> LlmResult<StageOutput>;
}

/// Executor backed by the five analysis agents sharing one provider.
pub struct AgentStageExecutor {
    provider: Arc<dyn ChatProvider>,
    clause: ClauseExtractionAgent,
    risk: RiskAnalysisAgent,
    compliance: ComplianceAnalysisAgent,
    report: ReportGenerationAgent,
    accuracy: AccuracyCheckAgent,
}

impl AgentStageExecutor {
    pub fn new(provider: Arc<dyn ChatProvider>) -> Self {
        Self {
            clause: ClauseExtractionAgent::new(provider.clone()),
            risk: RiskAnalysisAgent::new(provider.clone()),
            compliance: ComplianceAnalysisAgent::new(provider.clone()),
            report: ReportGenerationAgent::new(provider.clone()),
            accuracy: AccuracyCheckAgent::new(provider.clone()),
            provider,
        }
    }

    /// Replace the default compliance rules
    pub fn with_compliance_rules(mut self, rules: impl Into<String>) -> Self {
        self.compliance = ComplianceAnalysisAgent::with_rules(self.provider.clone(), rules);
        self
    }
}

#[async_trait]
impl StageExecutor for AgentStageExecutor {
    async fn execute(&self, stage: Stage, inputs: StageInputs<'_>) -> LlmResult<StageOutput> {
        match stage {
            Stage::ClauseExtraction => self.clause.analyze(inputs.require_text()?).await,
            Stage::RiskAnalysis => {
                let clauses = inputs.require(Stage::ClauseExtraction)?;
                self.risk.analyze(clauses).await
            }
            Stage::ComplianceAnalysis => {
                let clauses = inputs.require(Stage::ClauseExtraction)?;
                self.compliance.analyze(clauses).await
            }
            Stage::Report => {
                let clauses = inputs.require(Stage::ClauseExtraction)?;
                let risk = inputs.require(Stage::RiskAnalysis)?;
                let compliance = inputs.require(Stage::ComplianceAnalysis)?;
                self.report.generate(clauses, risk, compliance).await
            }
            Stage::AccuracyCheck => {
                let report = inputs.require(Stage::Report)?;
                self.accuracy.check(inputs.require_text()?, report).await
            }
        }
    }
}
