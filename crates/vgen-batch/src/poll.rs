//! Status poller.
//!
//! Queries a submitted task every tick until the remote reports a
//! terminal state. Transient query errors are swallowed and retried,
//! never escalated; there is no maximum wait — the remote job is expected
//! to reach a terminal state or never return. Only cancellation ends the
//! loop early.

use tracing::debug;
use vgen_client::JobApiClient;

use crate::config::BatchConfig;
use crate::stop::StopToken;

/// Fixed reason recorded on entries ended by cancellation.
pub const STOPPED_BY_USER: &str = "stopped by user";

/// Reason used when the remote reports failure without one.
pub const DEFAULT_FAILURE_REASON: &str = "generation failed";

/// Terminal outcome of polling one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    /// Remote reported success. The result locator can still be absent;
    /// the aggregator excludes such entries from the export.
    Succeeded { result_ref: Option<String> },
    /// Remote reported failure with a reason.
    Failed { reason: String },
    /// Cancellation was requested; no further queries were issued.
    Stopped,
}

/// Poll one task to a terminal outcome.
///
/// The stop token is checked at each tick before issuing the next query.
pub async fn poll_task(
    client: &JobApiClient,
    config: &BatchConfig,
    job_id: &str,
    stop: &StopToken,
) -> TaskOutcome {
    loop {
        if stop.is_stopped() {
            return TaskOutcome::Stopped;
        }
        tokio::time::sleep(config.poll_interval).await;
        if stop.is_stopped() {
            return TaskOutcome::Stopped;
        }

        match client.task_status(job_id).await {
            Ok(state) if state.is_success() => {
                return TaskOutcome::Succeeded {
                    result_ref: state.video_url,
                };
            }
            Ok(state) if state.is_failed() => {
                let reason = state
                    .error
                    .filter(|e| !e.is_empty())
                    .unwrap_or_else(|| DEFAULT_FAILURE_REASON.to_string());
                return TaskOutcome::Failed { reason };
            }
            Ok(state) => {
                debug!(job_id, status = %state.status, "task not terminal yet");
            }
            Err(e) => {
                // Transient query errors never end the wait
                debug!(job_id, error = %e, "status query failed, retrying");
            }
        }
    }
}
