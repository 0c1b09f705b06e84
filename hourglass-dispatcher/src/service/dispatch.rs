//! Dispatch service
//!
//! Maps a slot to its roster entry and starts at most one unit of work:
//! - No entry for the slot: log the no-op and succeed
//! - Entry found: send exactly one run-task request and report its result
//!
//! Failures are logged with their full cause chain and returned to the
//! caller. Nothing here retries.

use anyhow::Result;
use async_trait::async_trait;
use hourglass_core::domain::dispatch::{
    DispatchOutcome, DispatchRequest, task_from_task_definition_arn,
};
use hourglass_core::domain::roster::Roster;
use hourglass_core::domain::slot::Slot;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::repository::ExecutionBackend;

/// Service trait for slot dispatch
#[async_trait]
pub trait DispatchService: Send + Sync {
    /// Dispatches the task assigned to `slot`, if any
    ///
    /// # Returns
    /// `Idle` when the slot is empty, `Dispatched` when the backend accepted
    /// the request, or the backend error.
    async fn dispatch(&self, roster: &Roster, slot: Slot) -> Result<DispatchOutcome>;
}

/// Standard implementation of DispatchService
pub struct StandardDispatchService {
    backend: Arc<dyn ExecutionBackend>,
    unit_prefix: String,
    cluster: String,
}

impl StandardDispatchService {
    /// Creates a new dispatch service
    ///
    /// # Arguments
    /// * `backend` - Where run-task requests go
    /// * `unit_prefix` - Namespace for unit-of-work names
    /// * `cluster` - Target cluster
    pub fn new(
        backend: Arc<dyn ExecutionBackend>,
        unit_prefix: impl Into<String>,
        cluster: impl Into<String>,
    ) -> Self {
        Self {
            backend,
            unit_prefix: unit_prefix.into(),
            cluster: cluster.into(),
        }
    }

    /// Logs what the control plane started, flagging anything unexpected
    fn report_started(&self, task: &str, outcome: &DispatchOutcome) {
        let DispatchOutcome::Dispatched { response, .. } = outcome else {
            return;
        };

        if response.started_nothing() {
            warn!(
                "Control plane accepted the request for {} but reported no started task",
                task
            );
        }

        for started in &response.tasks {
            match task_from_task_definition_arn(&self.unit_prefix, &started.task_definition_arn) {
                Some(name) if name == task => info!(
                    "Started {} as {} ({})",
                    name,
                    started.task_arn,
                    started.last_status.as_deref().unwrap_or("status unknown")
                ),
                other => warn!(
                    "Control plane started {} from {} (scraper {:?}), expected {}",
                    started.task_arn, started.task_definition_arn, other, task
                ),
            }
        }

        for failure in &response.failures {
            warn!("Control plane reported a partial failure: {}", failure);
        }
    }
}

#[async_trait]
impl DispatchService for StandardDispatchService {
    async fn dispatch(&self, roster: &Roster, slot: Slot) -> Result<DispatchOutcome> {
        let Some(task) = roster.task_for(slot) else {
            info!(
                "No task assigned to slot {} ({}), roster has {} entries; nothing to do",
                slot.index(),
                slot,
                roster.len()
            );
            return Ok(DispatchOutcome::Idle { slot });
        };

        let request = DispatchRequest::for_task(&self.unit_prefix, task, &self.cluster);
        info!(
            "Slot {} selects {}; requesting {} x{} in {}",
            slot.index(),
            task,
            request.unit_name,
            request.count,
            request.cluster
        );

        let result = self.backend.run_task(&request).await;
        match result {
            Ok(response) => {
                let outcome = DispatchOutcome::Dispatched {
                    slot,
                    task: task.to_string(),
                    request,
                    response,
                };
                self.report_started(task, &outcome);
                info!("Dispatch succeeded: {}", outcome);
                Ok(outcome)
            }
            Err(e) => {
                error!("Dispatch of {} failed: {:#}", request.unit_name, e);
                Err(e.context(format!(
                    "Failed to dispatch {} for slot {}",
                    task,
                    slot.index()
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hourglass_core::dto::task::{RunTaskResponse, StartedTask};
    use std::sync::Mutex;

    /// Backend that records every request and answers from a fixed script
    struct RecordingBackend {
        requests: Mutex<Vec<DispatchRequest>>,
        fail: bool,
        empty: bool,
    }

    impl RecordingBackend {
        fn ok() -> Arc<Self> {
            Arc::new(Self {
                requests: Mutex::new(Vec::new()),
                fail: false,
                empty: false,
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                requests: Mutex::new(Vec::new()),
                fail: true,
                empty: false,
            })
        }

        fn empty() -> Arc<Self> {
            Arc::new(Self {
                requests: Mutex::new(Vec::new()),
                fail: false,
                empty: true,
            })
        }

        fn requests(&self) -> Vec<DispatchRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ExecutionBackend for RecordingBackend {
        async fn run_task(&self, request: &DispatchRequest) -> Result<RunTaskResponse> {
            self.requests.lock().unwrap().push(request.clone());
            if self.fail {
                anyhow::bail!("AccessDeniedException: not authorized to perform ecs:RunTask");
            }
            if self.empty {
                return Ok(RunTaskResponse::default());
            }
            Ok(RunTaskResponse {
                tasks: vec![StartedTask {
                    task_arn: "arn:aws:ecs:us-east-1:1:task/abc".to_string(),
                    task_definition_arn: format!(
                        "arn:aws:ecs:us-east-1:1:task-definition/{}:1",
                        request.unit_name
                    ),
                    last_status: Some("PROVISIONING".to_string()),
                }],
                failures: vec![],
            })
        }
    }

    fn roster(entries: &[&str]) -> Roster {
        Roster::new(entries.iter().map(|s| s.to_string()).collect(), 48).unwrap()
    }

    fn service(backend: Arc<RecordingBackend>) -> StandardDispatchService {
        StandardDispatchService::new(
            backend,
            "documenters_aggregator",
            "documenters-aggregator-production",
        )
    }

    #[tokio::test]
    async fn test_hour_zero_dispatches_first_entry() {
        let backend = RecordingBackend::ok();
        let service = service(backend.clone());

        let outcome = service
            .dispatch(&roster(&["chi_animal", "chi_buildings"]), Slot::new(0).unwrap())
            .await
            .unwrap();

        assert_eq!(
            backend.requests(),
            vec![DispatchRequest {
                unit_name: "documenters_aggregator-chi_animal".to_string(),
                cluster: "documenters-aggregator-production".to_string(),
                count: 1,
            }]
        );
        match outcome {
            DispatchOutcome::Dispatched { task, response, .. } => {
                assert_eq!(task, "chi_animal");
                assert_eq!(response.tasks.len(), 1);
            }
            other => panic!("expected a dispatch, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_slot_past_roster_end_is_idle() {
        let backend = RecordingBackend::ok();
        let service = service(backend.clone());
        let slot = Slot::new(2).unwrap();

        let outcome = service
            .dispatch(&roster(&["chi_animal", "chi_buildings"]), slot)
            .await
            .unwrap();

        assert_eq!(outcome, DispatchOutcome::Idle { slot });
        assert!(backend.requests().is_empty());
    }

    #[tokio::test]
    async fn test_every_hour_selects_its_entry_exactly_once() {
        let names: Vec<String> = (0..24).map(|i| format!("scraper_{:02}", i)).collect();
        let full = Roster::new(names.clone(), 48).unwrap();

        for slot in Slot::all() {
            let backend = RecordingBackend::ok();
            service(backend.clone()).dispatch(&full, slot).await.unwrap();

            let requests = backend.requests();
            assert_eq!(requests.len(), 1);
            assert_eq!(
                requests[0].unit_name,
                format!("documenters_aggregator-{}", names[slot.index()])
            );
        }
    }

    #[tokio::test]
    async fn test_short_roster_idles_for_the_rest_of_the_day() {
        let short = roster(&["a", "b", "c"]);

        for slot in Slot::all() {
            let backend = RecordingBackend::ok();
            let outcome = service(backend.clone()).dispatch(&short, slot).await.unwrap();

            let expected_calls = usize::from(slot.index() < 3);
            assert_eq!(backend.requests().len(), expected_calls);
            assert_eq!(outcome.is_idle(), expected_calls == 0);
        }
    }

    #[tokio::test]
    async fn test_backend_error_is_propagated_without_retry() {
        let backend = RecordingBackend::failing();
        let service = service(backend.clone());

        let err = service
            .dispatch(&roster(&["chi_animal"]), Slot::new(0).unwrap())
            .await
            .unwrap_err();

        assert_eq!(backend.requests().len(), 1);
        let chain = format!("{:#}", err);
        assert!(chain.contains("Failed to dispatch chi_animal for slot 0"));
        assert!(chain.contains("AccessDeniedException"));
    }

    #[tokio::test]
    async fn test_duplicate_entries_each_get_a_slot() {
        let backend = RecordingBackend::ok();
        let service = service(backend.clone());
        let doubled = Roster::from_lines("chi_animal\nchi_animal\n", 48).unwrap();

        service.dispatch(&doubled, Slot::new(0).unwrap()).await.unwrap();
        service.dispatch(&doubled, Slot::new(1).unwrap()).await.unwrap();

        let units: Vec<String> = backend.requests().into_iter().map(|r| r.unit_name).collect();
        assert_eq!(
            units,
            vec![
                "documenters_aggregator-chi_animal",
                "documenters_aggregator-chi_animal"
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_response_is_dispatched_but_started_nothing() {
        let backend = RecordingBackend::empty();
        let service = service(backend.clone());

        let outcome = service
            .dispatch(&roster(&["chi_animal"]), Slot::new(0).unwrap())
            .await
            .unwrap();

        assert_eq!(backend.requests().len(), 1);
        match outcome {
            DispatchOutcome::Dispatched { response, .. } => assert!(response.started_nothing()),
            other => panic!("expected a dispatch, got {:?}", other),
        }
    }
}
