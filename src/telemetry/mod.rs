//! Telemetry aggregation: wire types, the connection state machine, the
//! view model and the poll-cycle reconciliation that feeds it.

mod connection;
mod model;
mod poller;
mod view;

pub use connection::{ConnectionState, Phase, Signal, DEGRADED_AFTER};
pub use model::{
    HeartbeatPoint, HeartbeatStatus, LogEntry, LogKind, ServiceStatus, StatusSnapshot, Timestamp,
};
pub use poller::{
    poll_cycle, CycleOutcome, FetchOutcome, Resource, TelemetryPoller, TelemetryUpdate,
};
pub use view::{Slice, ViewModel};
