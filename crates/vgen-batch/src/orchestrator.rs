//! Queue orchestrator.
//!
//! Drives the ordered work list through submit → poll, one item in flight
//! at a time, writing outcomes into the shared entry table. The table is
//! the only shared mutable state: the run loop is its single writer, and
//! readers (presentation layer, aggregator) take snapshots that must
//! tolerate the table changing between reads.

use std::sync::{PoisonError, RwLock};

use tracing::{info, warn};
use uuid::Uuid;

use vgen_client::{CreateTaskRequest, JobApiClient};
use vgen_models::{BatchEntry, BatchStatus, ExportEntry, GenerationOptions, WorkItem};

use crate::config::BatchConfig;
use crate::error::SubmitError;
use crate::export::export_succeeded;
use crate::poll::{poll_task, TaskOutcome, STOPPED_BY_USER};
use crate::stop::{stop_channel, StopHandle, StopToken};
use crate::submit::submit_task;

/// State of the currently executing run.
#[derive(Debug)]
struct RunState {
    run_id: Uuid,
    entries: Vec<BatchEntry>,
    /// Index of the entry currently in flight, -1 when idle.
    cursor: i64,
}

impl RunState {
    fn idle() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            entries: Vec::new(),
            cursor: -1,
        }
    }
}

/// Observable result of a single (non-batch) run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingleOutcome {
    pub job_id: Option<String>,
    pub status: BatchStatus,
    pub result_ref: Option<String>,
    pub error: Option<String>,
}

/// Sequential batch runner.
///
/// Exactly one run is active at a time; starting a new batch replaces the
/// previous run's table and resets the stop flag. Entries reach terminal
/// states strictly in submission order.
pub struct BatchRunner {
    client: JobApiClient,
    config: BatchConfig,
    state: RwLock<RunState>,
    stop: StopHandle,
}

impl BatchRunner {
    /// Create a runner over a job API client.
    pub fn new(client: JobApiClient, config: BatchConfig) -> Self {
        let (stop, _) = stop_channel();
        Self {
            client,
            config,
            state: RwLock::new(RunState::idle()),
            stop,
        }
    }

    /// Request cancellation of the active run. The flag is checked at
    /// every suspension point; an in-flight remote call is never aborted
    /// mid-request, only the next wait or iteration is skipped.
    pub fn stop(&self) {
        self.stop.stop();
    }

    /// Whether cancellation has been requested for the active run.
    pub fn is_stopped(&self) -> bool {
        self.stop.token().is_stopped()
    }

    /// Snapshot of the entry table.
    pub fn entries(&self) -> Vec<BatchEntry> {
        self.read_state().entries.clone()
    }

    /// Index of the entry currently in flight, -1 when idle.
    pub fn cursor(&self) -> i64 {
        self.read_state().cursor
    }

    /// Identifier of the current run.
    pub fn run_id(&self) -> Uuid {
        self.read_state().run_id
    }

    /// Success-only export view of the current table.
    pub fn export(&self) -> Vec<ExportEntry> {
        export_succeeded(&self.read_state().entries)
    }

    /// Consume a whole batch sequentially.
    ///
    /// Returns only after every entry reaches a terminal status or the
    /// run is stopped. Failures are scoped to single entries; the run
    /// itself never errors.
    pub async fn start(&self, items: Vec<WorkItem>, options: GenerationOptions) {
        let total = items.len();
        let run_id = Uuid::new_v4();
        {
            let mut state = self.write_state();
            *state = RunState {
                run_id,
                entries: items.iter().map(BatchEntry::from_item).collect(),
                cursor: -1,
            };
        }
        self.stop.reset();
        let stop = self.stop.token();

        info!(run_id = %run_id, total, "starting batch run");

        for index in 0..total {
            if stop.is_stopped() {
                self.fail_from(index);
                break;
            }

            let request = {
                let mut state = self.write_state();
                state.cursor = index as i64;
                let entry = &mut state.entries[index];
                entry.begin_processing();
                build_request(entry, options)
            };

            match submit_task(&self.client, &self.config, &request, &stop).await {
                Err(SubmitError::Stopped) => {
                    self.fail_from(index);
                    break;
                }
                Err(e) => {
                    warn!(run_id = %run_id, index, error = %e, "entry submission failed");
                    self.with_entry(index, |entry| entry.fail(e.to_string()));
                }
                Ok(job_id) => {
                    self.with_entry(index, |entry| entry.record_job_id(&job_id));
                    match poll_task(&self.client, &self.config, &job_id, &stop).await {
                        TaskOutcome::Stopped => {
                            self.fail_from(index);
                            break;
                        }
                        TaskOutcome::Succeeded { result_ref } => {
                            info!(run_id = %run_id, index, job_id = %job_id, "entry succeeded");
                            self.with_entry(index, |entry| entry.succeed(result_ref));
                        }
                        TaskOutcome::Failed { reason } => {
                            warn!(run_id = %run_id, index, job_id = %job_id, reason = %reason, "entry failed");
                            self.with_entry(index, |entry| entry.fail(reason));
                        }
                    }
                }
            }

            // Fixed pacing delay, regardless of outcome, to bound the
            // request rate against the remote API
            if !stop.is_stopped() {
                tokio::time::sleep(self.config.pacing_delay).await;
            }
        }

        self.write_state().cursor = -1;
        info!(run_id = %run_id, "batch run finished");
    }

    /// Run one item without the queue wrapper or pacing delay.
    pub async fn run_single(&self, item: &WorkItem, options: GenerationOptions) -> SingleOutcome {
        self.stop.reset();
        let stop = self.stop.token();

        let request = CreateTaskRequest {
            prompt: item.prompt.clone(),
            image_url: non_empty(&item.source_ref),
            aspect_ratio: options.aspect_ratio,
            size: options.size,
        };

        let job_id = match submit_task(&self.client, &self.config, &request, &stop).await {
            Ok(job_id) => job_id,
            Err(e) => {
                let reason = match e {
                    SubmitError::Stopped => STOPPED_BY_USER.to_string(),
                    other => other.to_string(),
                };
                return SingleOutcome {
                    job_id: None,
                    status: BatchStatus::Failed,
                    result_ref: None,
                    error: Some(reason),
                };
            }
        };

        match poll_task(&self.client, &self.config, &job_id, &stop).await {
            TaskOutcome::Succeeded { result_ref } => SingleOutcome {
                job_id: Some(job_id),
                status: BatchStatus::Succeeded,
                result_ref,
                error: None,
            },
            TaskOutcome::Failed { reason } => SingleOutcome {
                job_id: Some(job_id),
                status: BatchStatus::Failed,
                result_ref: None,
                error: Some(reason),
            },
            TaskOutcome::Stopped => SingleOutcome {
                job_id: Some(job_id),
                status: BatchStatus::Failed,
                result_ref: None,
                error: Some(STOPPED_BY_USER.to_string()),
            },
        }
    }

    /// Mark the in-flight and all not-yet-started entries as stopped.
    /// Entries that already reached a terminal state keep it.
    fn fail_from(&self, index: usize) {
        let mut state = self.write_state();
        for entry in state.entries.iter_mut().skip(index) {
            entry.fail(STOPPED_BY_USER);
        }
    }

    fn with_entry(&self, index: usize, f: impl FnOnce(&mut BatchEntry)) {
        let mut state = self.write_state();
        if let Some(entry) = state.entries.get_mut(index) {
            f(entry);
        }
    }

    fn read_state(&self) -> std::sync::RwLockReadGuard<'_, RunState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> std::sync::RwLockWriteGuard<'_, RunState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn build_request(entry: &BatchEntry, options: GenerationOptions) -> CreateTaskRequest {
    CreateTaskRequest {
        prompt: entry.prompt.clone(),
        image_url: non_empty(&entry.source_ref),
        aspect_ratio: options.aspect_ratio,
        size: options.size,
    }
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}
