//! Client for the remote video generation job API.
//!
//! The job API exposes two operations: creating a generation task and
//! querying a task's status. This crate performs exactly one request per
//! call; all retry and polling policy lives with the caller.

pub mod client;
pub mod error;
pub mod types;

pub use client::{JobApiClient, JobApiConfig};
pub use error::{ApiError, ApiResult};
pub use types::{CreateTaskRequest, TaskState};
