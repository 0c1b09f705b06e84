//! Dispatch domain types
//!
//! A dispatch request names the unit of work to start, the cluster to start
//! it in and how many instances to run. The unit name is derived from a
//! roster entry by prefixing it with a deployment-wide namespace.

use serde::{Deserialize, Serialize};

use crate::domain::slot::Slot;
use crate::dto::task::RunTaskResponse;

/// Default namespace for unit-of-work names
pub const DEFAULT_UNIT_PREFIX: &str = "documenters_aggregator";

/// Default target cluster
pub const DEFAULT_CLUSTER: &str = "documenters-aggregator-production";

/// Instances requested per dispatch
pub const INSTANCE_COUNT: u32 = 1;

/// Builds the unit-of-work name for a task
pub fn unit_name(prefix: &str, task: &str) -> String {
    format!("{}-{}", prefix, task)
}

/// Recovers the task from a unit-of-work name
pub fn task_from_unit_name<'a>(prefix: &str, unit: &'a str) -> Option<&'a str> {
    unit.strip_prefix(prefix)?
        .strip_prefix('-')
        .filter(|task| !task.is_empty())
}

/// Recovers the task from a task-definition ARN
///
/// Accepts `arn:...:task-definition/<prefix>-<task>:<revision>`; the revision
/// suffix is optional.
pub fn task_from_task_definition_arn<'a>(prefix: &str, arn: &'a str) -> Option<&'a str> {
    let (_, family) = arn.rsplit_once('/')?;
    let family = family.split(':').next()?;
    task_from_unit_name(prefix, family)
}

/// Request to start one unit of work
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchRequest {
    pub unit_name: String,
    pub cluster: String,
    pub count: u32,
}

impl DispatchRequest {
    /// Builds the request for `task`
    pub fn for_task(prefix: &str, task: &str, cluster: &str) -> Self {
        Self {
            unit_name: unit_name(prefix, task),
            cluster: cluster.to_string(),
            count: INSTANCE_COUNT,
        }
    }
}

/// Terminal state of a successful activation
///
/// A failed dispatch is reported as an error rather than an outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DispatchOutcome {
    /// No task is assigned to the slot
    Idle { slot: Slot },

    /// The backend accepted the request
    Dispatched {
        slot: Slot,
        task: String,
        request: DispatchRequest,
        response: RunTaskResponse,
    },
}

impl DispatchOutcome {
    pub fn slot(&self) -> Slot {
        match self {
            DispatchOutcome::Idle { slot } | DispatchOutcome::Dispatched { slot, .. } => *slot,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, DispatchOutcome::Idle { .. })
    }
}

impl std::fmt::Display for DispatchOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DispatchOutcome::Idle { slot } => write!(f, "idle at {}", slot),
            DispatchOutcome::Dispatched { slot, request, .. } => write!(
                f,
                "dispatched {} to {} at {}",
                request.unit_name, request.cluster, slot
            ),
        }
    }
}
