//! Job API HTTP client.

use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use crate::error::{ApiError, ApiResult};
use crate::types::{CreateTaskRequest, CreateTaskResponse, TaskState, TaskStatusResponse};

/// Configuration for the job API client.
#[derive(Debug, Clone)]
pub struct JobApiConfig {
    /// Base URL of the job API
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for JobApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl JobApiConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("VGEN_API_URL")
                .unwrap_or_else(|_| "http://localhost:8000".to_string()),
            timeout: Duration::from_secs(
                std::env::var("VGEN_API_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
        }
    }
}

/// Client for the remote video generation job API.
pub struct JobApiClient {
    http: Client,
    config: JobApiConfig,
}

impl JobApiClient {
    /// Create a new client.
    pub fn new(config: JobApiConfig) -> ApiResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(ApiError::Network)?;

        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> ApiResult<Self> {
        Self::new(JobApiConfig::from_env())
    }

    /// Submit one generation task, returning the remote task id.
    ///
    /// A response without `status == "success"` and a non-empty
    /// `data.id` is an error — an empty success is not success.
    pub async fn create_task(&self, request: &CreateTaskRequest) -> ApiResult<String> {
        let url = format!("{}/api/video/generate", self.config.base_url);

        debug!("Sending create-task request to {}", url);

        let response = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(ApiError::Network)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::RequestFailed(format!(
                "job API returned {}: {}",
                status, body
            )));
        }

        let body: CreateTaskResponse = response.json().await?;

        if body.status != "success" {
            return Err(ApiError::InvalidResponse(format!(
                "create-task status was {:?}",
                body.status
            )));
        }

        match body.data {
            Some(handle) if !handle.id.is_empty() => Ok(handle.id),
            _ => Err(ApiError::EmptyResponse(
                "create-task returned no task id".to_string(),
            )),
        }
    }

    /// Query the current state of a submitted task.
    pub async fn task_status(&self, task_id: &str) -> ApiResult<TaskState> {
        let url = format!(
            "{}/api/video/status/{}",
            self.config.base_url,
            urlencoding::encode(task_id)
        );

        let response = self.http.get(&url).send().await.map_err(ApiError::Network)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::RequestFailed(format!(
                "job API returned {}: {}",
                status, body
            )));
        }

        let body: TaskStatusResponse = response.json().await?;

        body.data.ok_or_else(|| {
            ApiError::EmptyResponse("status response carried no data".to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use vgen_models::{AspectRatio, VideoSize};

    fn request(prompt: &str) -> CreateTaskRequest {
        CreateTaskRequest {
            prompt: prompt.to_string(),
            image_url: Some("http://img/1.png".to_string()),
            aspect_ratio: AspectRatio::Landscape,
            size: VideoSize::P720,
        }
    }

    async fn client(server: &MockServer) -> JobApiClient {
        JobApiClient::new(JobApiConfig {
            base_url: server.uri(),
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    #[test]
    fn test_config_defaults() {
        let config = JobApiConfig::default();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[tokio::test]
    async fn test_create_task_returns_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/video/generate"))
            .and(body_partial_json(json!({
                "prompt": "a cat",
                "aspect_ratio": "16:9",
                "size": "720P"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "data": { "id": "task-42" }
            })))
            .mount(&server)
            .await;

        let id = client(&server).await.create_task(&request("a cat")).await.unwrap();
        assert_eq!(id, "task-42");
    }

    #[tokio::test]
    async fn test_create_task_empty_payload_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/video/generate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "data": null
            })))
            .mount(&server)
            .await;

        let err = client(&server).await.create_task(&request("a cat")).await.unwrap_err();
        assert!(matches!(err, ApiError::EmptyResponse(_)));
    }

    #[tokio::test]
    async fn test_create_task_non_success_status_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/video/generate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "error",
                "data": { "id": "task-42" }
            })))
            .mount(&server)
            .await;

        let err = client(&server).await.create_task(&request("a cat")).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_create_task_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/video/generate"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let err = client(&server).await.create_task(&request("a cat")).await.unwrap_err();
        assert!(matches!(err, ApiError::RequestFailed(_)));
    }

    #[tokio::test]
    async fn test_task_status_round_trip() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/video/status/task-42"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {
                    "status": "success",
                    "video_url": "http://out/42.mp4"
                }
            })))
            .mount(&server)
            .await;

        let state = client(&server).await.task_status("task-42").await.unwrap();
        assert!(state.is_success());
        assert_eq!(state.video_url.as_deref(), Some("http://out/42.mp4"));
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn test_task_status_missing_data_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/video/status/task-42"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": null })))
            .mount(&server)
            .await;

        let err = client(&server).await.task_status("task-42").await.unwrap_err();
        assert!(matches!(err, ApiError::EmptyResponse(_)));
    }
}
