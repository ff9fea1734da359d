//! Services
//!
//! Business logic for contract review: loading documents, running the
//! analysis pipeline and exporting its result.

pub mod agents;
pub mod documents;
pub mod export;
pub mod pipeline;

pub use documents::load_contract;
pub use export::{combined_markdown, default_report_file_name, save_report, ExportFormat};
pub use pipeline::{start_review, PipelineEvent, PipelineHandle, PipelineResult, RunOutcome, Stage};
