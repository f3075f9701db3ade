//! Job API request/response types.

use serde::{Deserialize, Serialize};
use vgen_models::{AspectRatio, VideoSize};

/// Request to create a generation task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTaskRequest {
    /// Generation prompt
    pub prompt: String,
    /// Optional source image locator
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Target aspect ratio
    pub aspect_ratio: AspectRatio,
    /// Output resolution
    pub size: VideoSize,
}

/// Response body of the create-task operation.
///
/// Only `{status: "success", data: {id}}` counts as a usable payload;
/// everything else is treated as a submission failure.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTaskResponse {
    #[serde(default)]
    pub status: String,
    pub data: Option<TaskHandle>,
}

/// Handle to a created task.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskHandle {
    #[serde(default)]
    pub id: String,
}

/// Response body of the task-status operation.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskStatusResponse {
    pub data: Option<TaskState>,
}

/// Remote state of a submitted task.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TaskState {
    /// Remote status string ("pending", "processing", "success",
    /// "completed", "failed", or anything else the service invents)
    #[serde(default)]
    pub status: String,
    /// Result locator, present once generation succeeded
    pub video_url: Option<String>,
    /// Failure reason, present when the task failed
    pub error: Option<String>,
}

impl TaskState {
    /// Check whether the remote status counts as success.
    pub fn is_success(&self) -> bool {
        matches!(self.status.as_str(), "success" | "completed")
    }

    /// Check whether the remote status is a failure.
    pub fn is_failed(&self) -> bool {
        self.status == "failed"
    }
}
