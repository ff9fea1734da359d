//! Review Session
//!
//! Caller-side state: the settings snapshot, the loaded contract and the
//! last completed result. At most one pipeline run is in flight per session.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use contract_review_core::AnalysisConfig;

use crate::services::documents;
use crate::services::pipeline::{
    prepare_review, validate_review_inputs, PipelineHandle, PipelineResult, PipelineRunner,
};
use crate::storage::SettingsStore;
use crate::utils::error::{AppError, AppResult};

/// A contract loaded into the session
#[derive(Debug, Clone)]
pub struct LoadedContract {
    pub path: Option<PathBuf>,
    pub text: String,
}

/// Marks its run finished when dropped. Held by the pipeline task.
struct RunSlot(Arc<AtomicBool>);

impl Drop for RunSlot {
    fn drop(&mut self) {
        self.0.store(true, Ordering::Release);
    }
}

/// The most recent run started by a session
struct ActiveRun {
    id: u64,
    finished: Arc<AtomicBool>,
}

impl ActiveRun {
    fn in_flight(&self) -> bool {
        !self.finished.load(Ordering::Acquire)
    }
}

/// State of one review session
pub struct ReviewSession {
    config: Arc<RwLock<AnalysisConfig>>,
    contract: Arc<RwLock<Option<LoadedContract>>>,
    last_result: Arc<RwLock<Option<PipelineResult>>>,
    active_run: Arc<Mutex<Option<ActiveRun>>>,
}

impl ReviewSession {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
            contract: Arc::new(RwLock::new(None)),
            last_result: Arc::new(RwLock::new(None)),
            active_run: Arc::new(Mutex::new(None)),
        }
    }

    /// Session using the settings currently held by `store`
    pub fn from_store(store: &SettingsStore) -> Self {
        Self::new(store.get_config_clone())
    }

    /// Get the current configuration
    pub async fn config(&self) -> AnalysisConfig {
        self.config.read().await.clone()
    }

    /// Replace the configuration. Runs already started keep their snapshot.
    pub async fn set_config(&self, config: AnalysisConfig) -> AppResult<()> {
        config.validate().map_err(AppError::validation)?;
        *self.config.write().await = config;
        Ok(())
    }

    /// Load a contract file, replacing any previously loaded text.
    ///
    /// Returns the number of characters loaded.
    pub async fn load_contract(&self, path: &Path) -> AppResult<usize> {
        let text = documents::load_contract(path)?;
        let chars = text.chars().count();
        *self.contract.write().await = Some(LoadedContract {
            path: Some(path.to_path_buf()),
            text,
        });
        Ok(chars)
    }

    /// Use already-extracted text as the contract
    pub async fn set_contract_text(&self, text: impl Into<String>) {
        *self.contract.write().await = Some(LoadedContract {
            path: None,
            text: text.into(),
        });
    }

    pub async fn contract(&self) -> Option<LoadedContract> {
        self.contract.read().await.clone()
    }

    /// Whether a run started by this session is still in flight
    pub async fn is_running(&self) -> bool {
        self.active_run
            .lock()
            .await
            .as_ref()
            .is_some_and(ActiveRun::in_flight)
    }

    /// Start a run over the loaded contract against the configured endpoint.
    pub async fn start_review(&self) -> AppResult<PipelineHandle> {
        let config = self.config().await;
        let text = self.contract_text().await;
        let runner = prepare_review(&config, &text)?;
        self.start_review_with(runner).await
    }

    /// Start a run over the loaded contract using `runner`.
    ///
    /// The same preconditions as [`ReviewSession::start_review`] apply.
    pub async fn start_review_with(&self, runner: PipelineRunner) -> AppResult<PipelineHandle> {
        let mut active = self.active_run.lock().await;
        if active.as_ref().is_some_and(ActiveRun::in_flight) {
            return Err(AppError::validation("已有审查任务正在进行，请等待完成"));
        }

        let text = self.contract_text().await;
        validate_review_inputs(&*self.config.read().await, &text)?;

        let finished = Arc::new(AtomicBool::new(false));
        let handle = runner.spawn_holding(text, RunSlot(finished.clone()));
        *active = Some(ActiveRun {
            id: handle.id(),
            finished,
        });
        Ok(handle)
    }

    /// Store the result of run `run_id` and release its slot.
    ///
    /// A newer run in flight keeps its slot.
    pub async fn finish_review(&self, run_id: u64, result: PipelineResult) {
        *self.last_result.write().await = Some(result);
        self.release_run(run_id).await;
    }

    /// Release the slot of run `run_id` after it failed or was cancelled.
    pub async fn abandon_review(&self, run_id: u64) {
        self.release_run(run_id).await;
    }

    /// Result of the most recent completed run
    pub async fn last_result(&self) -> Option<PipelineResult> {
        self.last_result.read().await.clone()
    }

    async fn contract_text(&self) -> String {
        self.contract
            .read()
            .await
            .as_ref()
            .map(|c| c.text.clone())
            .unwrap_or_default()
    }

    async fn release_run(&self, run_id: u64) {
        let mut active = self.active_run.lock().await;
        if active.as_ref().is_some_and(|run| run.id == run_id) {
            if let Some(run) = active.take() {
                run.finished.store(true, Ordering::Release);
            }
        }
    }
}

impl std::fmt::Debug for ReviewSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReviewSession").finish_non_exhaustive()
    }
}
