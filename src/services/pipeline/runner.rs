//! Pipeline Runner
//!
//! Drives the five stages in order on a background task, folding each
//! stage's output forward and reporting progress over an mpsc channel.
//!
//! Failure policy:
//! - A transport or HTTP error from any stage ends the run with a single
//!   `Failed` event. Later stages are never invoked and no partial result
//!   is delivered.
//! - A reply that fails to parse is not an error; the parse-failure record
//!   flows to the dependent stages.
//! - Cancellation is honoured between stages, never during a call.

use std::any::Any;
use std::collections::BTreeMap;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use contract_review_core::{AnalysisConfig, StageOutput};
use contract_review_llm::{ChatCompletionsProvider, ChatProvider, LlmResult};
use futures_util::FutureExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::events::{PipelineEvent, PipelineResult, INIT_MESSAGE, INIT_PERCENT};
use super::stage::{AgentStageExecutor, PipelineState, Stage, StageExecutor, StageInputs};
use crate::utils::error::{AppError, AppResult};

/// Capacity of the event channel. A run emits at most twelve events.
pub const EVENT_CHANNEL_CAPACITY: usize = 32;

/// Prefix of every failure message
const FAILURE_PREFIX: &str = "处理过程中发生错误";

static NEXT_RUN_ID: AtomicU64 = AtomicU64::new(1);

/// How a run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    Completed(PipelineResult),
    Failed {
        stage: Option<Stage>,
        message: String,
    },
    Cancelled,
}

impl RunOutcome {
    pub fn state(&self) -> PipelineState {
        match self {
            RunOutcome::Completed(_) => PipelineState::Complete,
            RunOutcome::Failed { .. } => PipelineState::Failed,
            RunOutcome::Cancelled => PipelineState::Cancelled,
        }
    }

    /// The result of a completed run
    pub fn into_result(self) -> Option<PipelineResult> {
        match self {
            RunOutcome::Completed(result) => Some(result),
            _ => None,
        }
    }
}

/// Sequential executor of the analysis stages.
#[derive(Clone)]
pub struct PipelineRunner {
    executor: Arc<dyn StageExecutor>,
}

impl PipelineRunner {
    pub fn new(executor: Arc<dyn StageExecutor>) -> Self {
        Self { executor }
    }

    /// Runner whose stages all talk to `provider`
    pub fn for_provider(provider: Arc<dyn ChatProvider>) -> Self {
        Self::new(Arc::new(AgentStageExecutor::new(provider)))
    }

    /// Runner talking to the chat-completions endpoint described by `config`
    pub fn from_config(config: &AnalysisConfig) -> LlmResult<Self> {
        let provider = ChatCompletionsProvider::new(config.clone())?;
        Ok(Self::for_provider(Arc::new(provider)))
    }

    /// Run every stage against `contract_text`, emitting events as it goes.
    ///
    /// The terminal event (`Completed`, `Failed` or `Cancelled`) is always
    /// the last one sent and matches the returned outcome.
    pub async fn run(
        &self,
        contract_text: &str,
        events: &mpsc::Sender<PipelineEvent>,
        cancel: &CancellationToken,
    ) -> RunOutcome {
        emit(
            events,
            PipelineEvent::progress(INIT_PERCENT, INIT_MESSAGE, PipelineState::Idle),
        )
        .await;

        let mut outputs: BTreeMap<Stage, StageOutput> = BTreeMap::new();

        for stage in Stage::ALL {
            if cancel.is_cancelled() {
                tracing::info!(stage = %stage, "Pipeline cancelled before stage");
                emit(events, PipelineEvent::Cancelled).await;
                return RunOutcome::Cancelled;
            }

            let (start_percent, done_percent) = stage.progress();
            tracing::info!(stage = %stage, "Stage started");
            emit(
                events,
                PipelineEvent::progress(start_percent, stage.started_message(), stage.state()),
            )
            .await;

            let inputs = StageInputs::collect(stage, contract_text, &outputs);
            let output = match self.executor.execute(stage, inputs).await {
                Ok(output) => output,
                Err(e) => {
                    tracing::error!(stage = %stage, error = %e, "Stage failed; aborting pipeline");
                    let message = format!("{}: {}", FAILURE_PREFIX, e);
                    emit(
                        events,
                        PipelineEvent::Failed {
                            stage: Some(stage),
                            message: message.clone(),
                        },
                    )
                    .await;
                    return RunOutcome::Failed {
                        stage: Some(stage),
                        message,
                    };
                }
            };

            tracing::info!(
                stage = %stage,
                parse_failed = output.is_parse_failure(),
                "Stage finished"
            );
            outputs.insert(stage, output);
            emit(
                events,
                PipelineEvent::progress(done_percent, stage.finished_message(), stage.state()),
            )
            .await;
        }

        match PipelineResult::from_outputs(outputs) {
            Some(result) => {
                emit(
                    events,
                    PipelineEvent::Completed {
                        result: result.clone(),
                    },
                )
                .await;
                RunOutcome::Completed(result)
            }
            None => {
                let message = format!("{}: incomplete stage outputs", FAILURE_PREFIX);
                emit(
                    events,
                    PipelineEvent::Failed {
                        stage: None,
                        message: message.clone(),
                    },
                )
                .await;
                RunOutcome::Failed {
                    stage: None,
                    message,
                }
            }
        }
    }

    /// Run on a spawned task. Must be called within a tokio runtime.
    pub fn spawn(self, contract_text: String) -> PipelineHandle {
        self.spawn_holding(contract_text, ())
    }

    /// Like [`PipelineRunner::spawn`], keeping `held` alive until the task ends.
    pub fn spawn_holding<T: Send + 'static>(self, contract_text: String, held: T) -> PipelineHandle {
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        let task = tokio::spawn(async move {
            let _held = held;
            let outcome = AssertUnwindSafe(self.run(&contract_text, &tx, &token))
                .catch_unwind()
                .await;

            match outcome {
                Ok(outcome) => outcome,
                Err(payload) => {
                    let message = format!("{}: {}", FAILURE_PREFIX, panic_message(payload.as_ref()));
                    tracing::error!(%message, "Pipeline task panicked");
                    emit(
                        &tx,
                        PipelineEvent::Failed {
                            stage: None,
                            message: message.clone(),
                        },
                    )
                    .await;
                    RunOutcome::Failed {
                        stage: None,
                        message,
                    }
                }
            }
        });

        PipelineHandle {
            id: NEXT_RUN_ID.fetch_add(1, Ordering::Relaxed),
            events: rx,
            cancel,
            task,
        }
    }
}

/// Caller side of a spawned run.
#[derive(Debug)]
pub struct PipelineHandle {
    id: u64,
    events: mpsc::Receiver<PipelineEvent>,
    cancel: CancellationToken,
    task: JoinHandle<RunOutcome>,
}

impl PipelineHandle {
    /// Process-unique id of this run
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Next event, or `None` once the run has ended and every event was read
    pub async fn next_event(&mut self) -> Option<PipelineEvent> {
        self.events.recv().await
    }

    /// Ask the run to stop before its next stage
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Wait for the run to end, discarding unread events.
    pub async fn wait(self) -> AppResult<RunOutcome> {
        drop(self.events);
        self.task
            .await
            .map_err(|e| AppError::internal(format!("Pipeline task failed: {}", e)))
    }
}

async fn emit(events: &mpsc::Sender<PipelineEvent>, event: PipelineEvent) {
    if events.send(event).await.is_err() {
        tracing::debug!("Event receiver dropped; continuing without notifications");
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "stage task panicked".to_string()
    }
}
