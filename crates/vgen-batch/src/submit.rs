//! Task submitter.
//!
//! Submits one work item to the remote job API with bounded retries. The
//! backoff schedule is linear — `backoff_step × attempt_number` — kept
//! literally from what the remote service is known to tolerate.

use tracing::warn;
use vgen_client::{ApiError, CreateTaskRequest, JobApiClient};

use crate::config::BatchConfig;
use crate::error::SubmitError;
use crate::stop::StopToken;

/// Submit one generation task, retrying until it yields a task id or the
/// attempt budget is spent.
///
/// The stop token is checked immediately before each attempt and each
/// backoff wait; cancellation aborts with [`SubmitError::Stopped`],
/// distinct from exhaustion. On exhaustion the last underlying error is
/// surfaced.
pub async fn submit_task(
    client: &JobApiClient,
    config: &BatchConfig,
    request: &CreateTaskRequest,
    stop: &StopToken,
) -> Result<String, SubmitError> {
    let mut last_error = None;

    for attempt in 1..=config.submit_max_attempts {
        if stop.is_stopped() {
            return Err(SubmitError::Stopped);
        }

        match client.create_task(request).await {
            Ok(task_id) => return Ok(task_id),
            Err(e) => {
                warn!(attempt, error = %e, "create-task attempt failed");
                last_error = Some(e);
            }
        }

        if attempt < config.submit_max_attempts {
            if stop.is_stopped() {
                return Err(SubmitError::Stopped);
            }
            tokio::time::sleep(config.submit_backoff_step * attempt).await;
        }
    }

    Err(SubmitError::Exhausted {
        attempts: config.submit_max_attempts,
        source: last_error
            .unwrap_or_else(|| ApiError::RequestFailed("no attempts were made".to_string())),
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::stop::stop_channel;
    use vgen_client::JobApiConfig;
    use vgen_models::{AspectRatio, VideoSize};

    fn fast_config() -> BatchConfig {
        BatchConfig {
            submit_backoff_step: Duration::from_millis(1),
            ..BatchConfig::default()
        }
    }

    fn request() -> CreateTaskRequest {
        CreateTaskRequest {
            prompt: "a cat".to_string(),
            image_url: None,
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

    #[tokio::test]
    async fn test_success_on_last_attempt() {
        let server = MockServer::start().await;
        // Nine transient failures, then a usable payload on attempt 10
        Mock::given(method("POST"))
            .and(path("/api/video/generate"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(9)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/video/generate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "data": { "id": "task-10" }
            })))
            .mount(&server)
            .await;

        let (_handle, stop) = stop_channel();
        let id = submit_task(&client(&server).await, &fast_config(), &request(), &stop)
            .await
            .unwrap();
        assert_eq!(id, "task-10");
    }

    #[tokio::test]
    async fn test_exhaustion_carries_last_cause() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/video/generate"))
            .respond_with(ResponseTemplate::new(500).set_body_string("kaboom"))
            .expect(10)
            .mount(&server)
            .await;

        let (_handle, stop) = stop_channel();
        let err = submit_task(&client(&server).await, &fast_config(), &request(), &stop)
            .await
            .unwrap_err();
        match err {
            SubmitError::Exhausted { attempts, source } => {
                assert_eq!(attempts, 10);
                assert!(source.to_string().contains("kaboom"));
            }
            other => panic!("expected exhaustion, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_success_payload_is_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/video/generate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "data": null
            })))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/video/generate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "data": { "id": "task-2" }
            })))
            .mount(&server)
            .await;

        let (_handle, stop) = stop_channel();
        let id = submit_task(&client(&server).await, &fast_config(), &request(), &stop)
            .await
            .unwrap();
        assert_eq!(id, "task-2");
    }

    #[tokio::test]
    async fn test_stop_before_first_attempt_makes_no_calls() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/video/generate"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let (handle, stop) = stop_channel();
        handle.stop();

        let err = submit_task(&client(&server).await, &fast_config(), &request(), &stop)
            .await
            .unwrap_err();
        assert!(matches!(err, SubmitError::Stopped));
    }

    #[tokio::test]
    async fn test_stop_between_attempts() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/video/generate"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let (handle, stop) = stop_channel();
        let slow = BatchConfig {
            submit_backoff_step: Duration::from_millis(50),
            ..BatchConfig::default()
        };
        let client = client(&server).await;
        let task = tokio::spawn({
            let stop = stop.clone();
            async move { submit_task(&client, &slow, &request(), &stop).await }
        });
        // Let attempt 1 fail, then request cancellation during the wait
        tokio::time::sleep(Duration::from_millis(20)).await;
        handle.stop();

        let err = task.await.unwrap().unwrap_err();
        assert!(matches!(err, SubmitError::Stopped));
    }
}
