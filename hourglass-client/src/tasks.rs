//! Task-related API endpoints

use crate::ControlPlaneClient;
use crate::error::Result;
use hourglass_core::dto::task::{RunTaskRequest, RunTaskResponse};
use tracing::debug;

impl ControlPlaneClient {
    /// Ask the control plane to start a unit of work
    ///
    /// # Arguments
    /// * `req` - Unit name, cluster and instance count
    ///
    /// # Returns
    /// The started tasks and any placement failures
    ///
    /// # Example
    /// ```no_run
    /// # use hourglass_client::{ControlPlaneClient, RunTaskRequest};
    /// # async fn example() -> anyhow::Result<()> {
    /// let client = ControlPlaneClient::new("http://localhost:8080");
    /// let response = client.run_task(&RunTaskRequest {
    ///     task_definition: "documenters_aggregator-il_lottery".to_string(),
    ///     cluster: "documenters-aggregator-production".to_string(),
    ///     count: 1,
    ///     started_by: Some("hourglass/manual".to_string()),
    /// }).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn run_task(&self, req: &RunTaskRequest) -> Result<RunTaskResponse> {
        let url = format!("{}/api/tasks/run", self.base_url);
        debug!(
            "POST {} (taskDefinition={}, cluster={}, count={})",
            url, req.task_definition, req.cluster, req.count
        );

        let response = self
            .authorize(self.client.post(&url))
            .json(req)
            .send()
            .await?;

        self.handle_response(response).await
    }
}
