//! Execution backend repository
//!
//! Adapts the control plane client to the single operation the dispatcher
//! needs: start one named unit of work in one cluster.

use anyhow::Result;
use async_trait::async_trait;
use hourglass_client::ControlPlaneClient;
use hourglass_core::domain::dispatch::DispatchRequest;
use hourglass_core::dto::task::{RunTaskRequest, RunTaskResponse};

/// Repository trait for the execution backend
#[async_trait]
pub trait ExecutionBackend: Send + Sync {
    /// Requests execution of a unit of work
    ///
    /// Called at most once per activation. Implementations must not retry.
    async fn run_task(&self, request: &DispatchRequest) -> Result<RunTaskResponse>;
}

/// HTTP implementation of ExecutionBackend
pub struct HttpExecutionBackend {
    client: ControlPlaneClient,
    started_by: Option<String>,
}

impl HttpExecutionBackend {
    /// Creates a new HTTP execution backend
    ///
    /// # Arguments
    /// * `client` - Control plane client
    /// * `started_by` - Tag recorded on started tasks (e.g., the activation id)
    pub fn new(client: ControlPlaneClient, started_by: Option<String>) -> Self {
        Self { client, started_by }
    }
}

#[async_trait]
impl ExecutionBackend for HttpExecutionBackend {
    async fn run_task(&self, request: &DispatchRequest) -> Result<RunTaskResponse> {
        let body = RunTaskRequest::from_dispatch(request, self.started_by.clone());

        let response = self.client.run_task(&body).await.map_err(|e| {
            let hint = if e.is_auth_error() {
                " (check CONTROL_PLANE_TOKEN)"
            } else {
                ""
            };
            anyhow::Error::new(e).context(format!(
                "Run-task request for {} in {} failed{}",
                request.unit_name, request.cluster, hint
            ))
        })?;

        ensure_started(request, response)
    }
}

/// Treats a response that started nothing and lists failures as an error
fn ensure_started(request: &DispatchRequest, response: RunTaskResponse) -> Result<RunTaskResponse> {
    if response.is_rejected() {
        let reasons: Vec<String> = response.failures.iter().map(ToString::to_string).collect();
        anyhow::bail!(
            "No task started for {} in {}: {}",
            request.unit_name,
            request.cluster,
            reasons.join("; ")
        );
    }

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hourglass_client::ClientError;
    use hourglass_core::dto::task::{StartedTask, TaskFailure};

    fn request() -> DispatchRequest {
        DispatchRequest::for_task(
            "documenters_aggregator",
            "chi_animal",
            "documenters-aggregator-production",
        )
    }

    #[test]
    fn test_started_response_passes() {
        let response = RunTaskResponse {
            tasks: vec![StartedTask {
                task_arn: "arn:task/1".to_string(),
                task_definition_arn: "arn:task-definition/documenters_aggregator-chi_animal:1"
                    .to_string(),
                last_status: Some("PROVISIONING".to_string()),
            }],
            failures: vec![],
        };
        assert_eq!(ensure_started(&request(), response.clone()).unwrap(), response);
    }

    #[test]
    fn test_rejected_response_fails() {
        let response = RunTaskResponse {
            tasks: vec![],
            failures: vec![TaskFailure {
                arn: None,
                reason: "RESOURCE:CPU".to_string(),
            }],
        };
        let err = ensure_started(&request(), response).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("documenters_aggregator-chi_animal"));
        assert!(message.contains("RESOURCE:CPU"));
    }

    #[tokio::test]
    async fn test_unreachable_control_plane_is_an_error() {
        // Port 9 (discard) on loopback refuses connections on CI hosts.
        let backend = HttpExecutionBackend::new(ControlPlaneClient::new("http://127.0.0.1:9"), None);
        let err = backend.run_task(&request()).await.unwrap_err();
        assert!(err.downcast_ref::<ClientError>().is_some());
    }
}
