//! Run-task DTOs for control plane communication

use serde::{Deserialize, Serialize};

use crate::domain::dispatch::DispatchRequest;

/// Request body for starting a unit of work
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunTaskRequest {
    pub task_definition: String,
    pub cluster: String,
    pub count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_by: Option<String>,
}

impl RunTaskRequest {
    pub fn from_dispatch(request: &DispatchRequest, started_by: Option<String>) -> Self {
        Self {
            task_definition: request.unit_name.clone(),
            cluster: request.cluster.clone(),
            count: request.count,
            started_by,
        }
    }
}

/// Response body of a run-task call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunTaskResponse {
    #[serde(default)]
    pub tasks: Vec<StartedTask>,
    #[serde(default)]
    pub failures: Vec<TaskFailure>,
}

impl RunTaskResponse {
    /// True when nothing started and the control plane gave reasons why
    pub fn is_rejected(&self) -> bool {
        self.tasks.is_empty() && !self.failures.is_empty()
    }

    /// True when the control plane accepted the call but started nothing
    pub fn started_nothing(&self) -> bool {
        self.tasks.is_empty()
    }
}

/// A task the control plane started
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartedTask {
    pub task_arn: String,
    pub task_definition_arn: String,
    #[serde(default)]
    pub last_status: Option<String>,
}

/// A placement failure reported by the control plane
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskFailure {
    #[serde(default)]
    pub arn: Option<String>,
    pub reason: String,
}

impl std::fmt::Display for TaskFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.arn {
            Some(arn) => write!(f, "{} ({})", self.reason, arn),
            None => write!(f, "{}", self.reason),
        }
    }
}
