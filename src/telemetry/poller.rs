//! Poll cycles against the reporting API and their reconciliation.
//!
//! A cycle fetches three resources concurrently. Each result is emitted as
//! soon as it arrives, followed by one [`TelemetryUpdate::CycleFinished`]
//! carrying the cycle verdict:
//!
//! ```text
//!   poll_cycle ──┬── GET /api/status    ──▶ Fetched ─┐
//!                ├── GET /api/heartbeat ──▶ Fetched ─┼─▶ CycleFinished
//!                └── GET /api/logs      ──▶ Fetched ─┘
//! ```
//!
//! The network side never touches the view. [`TelemetryPoller::apply`] folds
//! the emitted updates into its [`ViewModel`] on the owning thread.

use tracing::{debug, info, warn};

use super::view::{Slice, ViewModel};
use crate::client::{ClientError, ReportingClient};

/// One of the three resources read every cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Status,
    Heartbeat,
    Logs,
}

impl Resource {
    pub const ALL: [Resource; 3] = [Resource::Status, Resource::Heartbeat, Resource::Logs];

    /// Returns the API path of this resource.
    pub fn path(&self) -> &'static str {
        match self {
            Resource::Status => "/api/status",
            Resource::Heartbeat => "/api/heartbeat",
            Resource::Logs => "/api/logs",
        }
    }
}

/// How a single sub-request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// A usable slice came back.
    Applied,
    /// The server answered, but with an error status or a bad body.
    Rejected,
    /// No response at all.
    Unreachable,
}

impl FetchOutcome {
    pub fn of(result: &Result<Slice, ClientError>) -> Self {
        match result {
            Ok(_) => FetchOutcome::Applied,
            Err(err) if err.is_transport() => FetchOutcome::Unreachable,
            Err(_) => FetchOutcome::Rejected,
        }
    }
}

/// Verdict for a whole poll cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// At least one slice was applied.
    Succeeded,
    /// Every sub-request failed at the transport level.
    Failed,
    /// Nothing was applied, but the server did answer something.
    Inconclusive,
}

impl CycleOutcome {
    pub fn classify(outcomes: [FetchOutcome; 3]) -> Self {
        if outcomes.contains(&FetchOutcome::Applied) {
            CycleOutcome::Succeeded
        } else if outcomes.iter().all(|o| *o == FetchOutcome::Unreachable) {
            CycleOutcome::Failed
        } else {
            CycleOutcome::Inconclusive
        }
    }
}

/// Message emitted by [`poll_cycle`].
#[derive(Debug)]
pub enum TelemetryUpdate {
    Fetched {
        cycle: u64,
        resource: Resource,
        result: Result<Slice, ClientError>,
    },
    CycleFinished {
        cycle: u64,
        outcome: CycleOutcome,
    },
}

async fn fetch(client: &ReportingClient, resource: Resource) -> Result<Slice, ClientError> {
    match resource {
        Resource::Status => client.status().await.map(Slice::Status),
        Resource::Heartbeat => client.heartbeat().await.map(Slice::Heartbeat),
        Resource::Logs => client.logs().await.map(Slice::Logs),
    }
}

/// Run one poll cycle, emitting each result as it arrives.
pub async fn poll_cycle<F>(client: &ReportingClient, cycle: u64, emit: F) -> CycleOutcome
where
    F: Fn(TelemetryUpdate),
{
    let emit = &emit;
    let fetch_one = move |resource: Resource| async move {
        let result = fetch(client, resource).await;
        let outcome = FetchOutcome::of(&result);
        emit(TelemetryUpdate::Fetched {
            cycle,
            resource,
            result,
        });
        outcome
    };

    let (status, heartbeat, logs) = tokio::join!(
        fetch_one(Resource::Status),
        fetch_one(Resource::Heartbeat),
        fetch_one(Resource::Logs),
    );

    let outcome = CycleOutcome::classify([status, heartbeat, logs]);
    emit(TelemetryUpdate::CycleFinished { cycle, outcome });
    outcome
}

/// Owns the [`ViewModel`] and applies poll results to it.
#[derive(Debug, Default)]
pub struct TelemetryPoller {
    view: ViewModel,
    last_error: Option<String>,
}

impl TelemetryPoller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> &ViewModel {
        &self.view
    }

    /// Most recent sub-request error, cleared by the next applied slice.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn is_degraded(&self) -> bool {
        self.view.connection().is_degraded()
    }

    /// Apply one update. Returns true if the view changed.
    pub fn apply(&mut self, update: TelemetryUpdate) -> bool {
        match update {
            TelemetryUpdate::Fetched {
                cycle,
                resource,
                result: Ok(slice),
            } => {
                debug!(cycle, resource = resource.path(), "Applied slice");
                self.view.apply_slice(slice);
                self.last_error = None;
                true
            }
            TelemetryUpdate::Fetched {
                cycle,
                resource,
                result: Err(err),
            } => {
                debug!(cycle, resource = resource.path(), error = %err, "Fetch failed");
                self.last_error = Some(format!("{}: {}", resource.path(), err));
                false
            }
            TelemetryUpdate::CycleFinished { cycle, outcome } => {
                match outcome {
                    CycleOutcome::Failed => {
                        let was_degraded = self.is_degraded();
                        self.view.apply_cycle_failure();
                        let failures = self.view.connection().consecutive_failures();
                        if self.is_degraded() && !was_degraded {
                            warn!(cycle, failures, "Reporting API unreachable, going offline");
                        } else {
                            debug!(cycle, failures, "Poll cycle failed");
                        }
                        true
                    }
                    CycleOutcome::Inconclusive => {
                        debug!(cycle, "Poll cycle produced no usable data");
                        false
                    }
                    CycleOutcome::Succeeded => false,
                }
            }
        }
    }

    /// Reset the failure counter ahead of an out-of-band poll.
    pub fn manual_retry(&mut self) {
        info!(
            failures = self.view.connection().consecutive_failures(),
            "Manual reconnect requested"
        );
        self.view.apply_manual_retry();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::model::{ServiceStatus, StatusSnapshot};

    fn unreachable() -> Result<Slice, ClientError> {
        Err(ClientError::Transport("connection refused".into()))
    }

    fn fetched(cycle: u64, resource: Resource, result: Result<Slice, ClientError>) -> TelemetryUpdate {
        TelemetryUpdate::Fetched {
            cycle,
            resource,
            result,
        }
    }

    fn fail_cycle(poller: &mut TelemetryPoller, cycle: u64) {
        for resource in Resource::ALL {
            poller.apply(fetched(cycle, resource, unreachable()));
        }
        poller.apply(TelemetryUpdate::CycleFinished {
            cycle,
            outcome: CycleOutcome::Failed,
        });
    }

    #[test]
    fn test_classify_cycle() {
        use FetchOutcome::*;

        assert_eq!(
            CycleOutcome::classify([Unreachable, Applied, Unreachable]),
            CycleOutcome::Succeeded
        );
        assert_eq!(
            CycleOutcome::classify([Unreachable, Unreachable, Unreachable]),
            CycleOutcome::Failed
        );
        assert_eq!(
            CycleOutcome::classify([Rejected, Rejected, Rejected]),
            CycleOutcome::Inconclusive
        );
        assert_eq!(
            CycleOutcome::classify([Rejected, Unreachable, Unreachable]),
            CycleOutcome::Inconclusive
        );
    }

    #[test]
    fn test_fetch_outcome_of() {
        assert_eq!(FetchOutcome::of(&unreachable()), FetchOutcome::Unreachable);
        assert_eq!(
            FetchOutcome::of(&Err(ClientError::Status(500))),
            FetchOutcome::Rejected
        );
        assert_eq!(
            FetchOutcome::of(&Err(ClientError::Decode("eof".into()))),
            FetchOutcome::Rejected
        );
        assert_eq!(
            FetchOutcome::of(&Ok(Slice::Logs(Vec::new()))),
            FetchOutcome::Applied
        );
    }

    #[test]
    fn test_partial_success_connects() {
        let mut poller = TelemetryPoller::new();
        fail_cycle(&mut poller, 1);

        poller.apply(fetched(2, Resource::Status, unreachable()));
        let changed = poller.apply(fetched(2, Resource::Logs, Ok(Slice::Logs(Vec::new()))));
        assert!(changed);
        assert!(poller.view().connection().is_connected());
        assert_eq!(poller.view().connection().consecutive_failures(), 0);
        assert!(poller.last_error().is_none());
    }

    #[test]
    fn test_degraded_at_fourth_attempt() {
        let mut poller = TelemetryPoller::new();
        let status = StatusSnapshot {
            status: ServiceStatus::Critical,
            total_crashes: 3,
            ..Default::default()
        };
        poller.apply(fetched(1, Resource::Status, Ok(Slice::Status(status))));
        poller.apply(TelemetryUpdate::CycleFinished {
            cycle: 1,
            outcome: CycleOutcome::Succeeded,
        });

        fail_cycle(&mut poller, 2);
        fail_cycle(&mut poller, 3);
        assert!(!poller.is_degraded());
        fail_cycle(&mut poller, 4);
        assert!(poller.is_degraded());

        let status = poller.view().status().unwrap();
        assert_eq!(status.status, ServiceStatus::Critical);
        assert_eq!(status.total_crashes, 3);
    }

    #[test]
    fn test_inconclusive_cycle_keeps_state() {
        let mut poller = TelemetryPoller::new();
        fail_cycle(&mut poller, 1);

        for resource in Resource::ALL {
            poller.apply(fetched(2, resource, Err(ClientError::Status(500))));
        }
        let changed = poller.apply(TelemetryUpdate::CycleFinished {
            cycle: 2,
            outcome: CycleOutcome::Inconclusive,
        });

        assert!(!changed);
        assert_eq!(poller.view().connection().consecutive_failures(), 1);
        assert_eq!(poller.last_error(), Some("/api/logs: HTTP 500"));
    }

    #[test]
    fn test_manual_retry() {
        let mut poller = TelemetryPoller::new();
        for cycle in 1..=3 {
            fail_cycle(&mut poller, cycle);
        }
        assert!(poller.is_degraded());

        poller.manual_retry();
        assert!(!poller.is_degraded());
        assert_eq!(poller.view().connection().consecutive_failures(), 0);
    }
}
