//! Per-item batch execution records.
//!
//! A [`BatchEntry`] is the mutable counterpart of a
//! [`WorkItem`](crate::WorkItem): one record per item, same ordering,
//! mutated only by the orchestrator as submission and polling outcomes
//! arrive.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::item::WorkItem;

/// Execution status of one batch entry.
///
/// Transitions are monotonic: Pending → Processing → (Succeeded | Failed).
/// An entry never regresses out of a terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    /// Entry is waiting for its turn in the queue
    #[default]
    Pending,
    /// Entry is currently being submitted or polled
    Processing,
    /// Remote generation finished successfully
    Succeeded,
    /// Submission exhausted its retries, the remote job failed, or the
    /// run was stopped before the entry finished
    Failed,
}

impl BatchStatus {
    /// Get string representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            BatchStatus::Pending => "pending",
            BatchStatus::Processing => "processing",
            BatchStatus::Succeeded => "succeeded",
            BatchStatus::Failed => "failed",
        }
    }

    /// Check if this is a terminal state (no more transitions occur).
    pub fn is_terminal(&self) -> bool {
        matches!(self, BatchStatus::Succeeded | BatchStatus::Failed)
    }
}

impl std::fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Mutable per-item execution record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchEntry {
    /// Source reference copied from the work item
    pub source_ref: String,
    /// Effective prompt for this entry
    pub prompt: String,
    /// Optional parallel audio reference
    pub audio_ref: Option<String>,
    /// Remote task id, set once submission succeeds
    pub job_id: Option<String>,
    /// Result locator, set on success
    pub result_ref: Option<String>,
    /// Current execution status
    pub status: BatchStatus,
    /// Failure reason, set when the entry fails
    pub error_message: Option<String>,
    /// When the entry was created
    pub created_at: DateTime<Utc>,
    /// When the entry was last updated
    pub updated_at: DateTime<Utc>,
}

impl BatchEntry {
    /// Create a fresh Pending entry from a work item.
    pub fn from_item(item: &WorkItem) -> Self {
        let now = Utc::now();
        Self {
            source_ref: item.source_ref.clone(),
            prompt: item.prompt.clone(),
            audio_ref: item.audio_ref.clone(),
            job_id: None,
            result_ref: None,
            status: BatchStatus::Pending,
            error_message: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if the entry is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Mark the entry as in flight. No-op unless the entry is Pending.
    pub fn begin_processing(&mut self) {
        if self.status == BatchStatus::Pending {
            self.status = BatchStatus::Processing;
            self.updated_at = Utc::now();
        }
    }

    /// Record the remote task id after a successful submission.
    pub fn record_job_id(&mut self, job_id: impl Into<String>) {
        self.job_id = Some(job_id.into());
        self.updated_at = Utc::now();
    }

    /// Mark the entry as succeeded with an optional result locator.
    ///
    /// No-op if the entry already reached a terminal state.
    pub fn succeed(&mut self, result_ref: Option<String>) {
        if self.is_terminal() {
            return;
        }
        self.status = BatchStatus::Succeeded;
        self.result_ref = result_ref;
        self.updated_at = Utc::now();
    }

    /// Mark the entry as failed with a reason.
    ///
    /// No-op if the entry already reached a terminal state.
    pub fn fail(&mut self, reason: impl Into<String>) {
        if self.is_terminal() {
            return;
        }
        self.status = BatchStatus::Failed;
        self.error_message = Some(reason.into());
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> BatchEntry {
        BatchEntry::from_item(&WorkItem::new("http://img/1.png", "a cat"))
    }

    #[test]
    fn test_entry_creation() {
        let e = entry();
        assert_eq!(e.status, BatchStatus::Pending);
        assert!(e.job_id.is_none());
        assert!(!e.is_terminal());
    }

    #[test]
    fn test_entry_transitions() {
        let mut e = entry();

        e.begin_processing();
        assert_eq!(e.status, BatchStatus::Processing);

        e.record_job_id("task-1");
        assert_eq!(e.job_id.as_deref(), Some("task-1"));

        e.succeed(Some("http://out/1.mp4".into()));
        assert_eq!(e.status, BatchStatus::Succeeded);
        assert_eq!(e.result_ref.as_deref(), Some("http://out/1.mp4"));
        assert!(e.is_terminal());
    }

    #[test]
    fn test_terminal_state_is_sticky() {
        let mut e = entry();
        e.begin_processing();
        e.succeed(Some("http://out/1.mp4".into()));

        // A late failure must not regress a terminal entry
        e.fail("stopped by user");
        assert_eq!(e.status, BatchStatus::Succeeded);
        assert!(e.error_message.is_none());

        let mut f = entry();
        f.begin_processing();
        f.fail("boom");
        f.succeed(Some("http://out/2.mp4".into()));
        assert_eq!(f.status, BatchStatus::Failed);
        assert!(f.result_ref.is_none());
    }

    #[test]
    fn test_begin_processing_only_from_pending() {
        let mut e = entry();
        e.begin_processing();
        e.fail("boom");
        e.begin_processing();
        assert_eq!(e.status, BatchStatus::Failed);
    }

    #[test]
    fn test_status_serde_snake_case() {
        let json = serde_json::to_string(&BatchStatus::Succeeded).unwrap();
        assert_eq!(json, "\"succeeded\"");
        let back: BatchStatus = serde_json::from_str("\"processing\"").unwrap();
        assert_eq!(back, BatchStatus::Processing);
    }
}
