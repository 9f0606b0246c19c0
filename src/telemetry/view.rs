//! The reconciled view of the reporting API.

use std::time::Instant;

use super::connection::{ConnectionState, Signal};
use super::model::{HeartbeatPoint, LogEntry, StatusSnapshot};

/// One independently fetched part of the view.
#[derive(Debug, Clone, PartialEq)]
pub enum Slice {
    Status(StatusSnapshot),
    Heartbeat(Vec<HeartbeatPoint>),
    Logs(Vec<LogEntry>),
}

/// Everything the dashboard renders, as of the latest poll results.
///
/// Each slice is replaced wholesale when a fresh copy arrives and keeps its
/// last-known value otherwise.
#[derive(Debug, Clone, Default)]
pub struct ViewModel {
    status: Option<StatusSnapshot>,
    heartbeat: Vec<HeartbeatPoint>,
    logs: Vec<LogEntry>,
    connection: ConnectionState,
    last_update: Option<Instant>,
}

impl ViewModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest status snapshot, or `None` before the first one arrives.
    pub fn status(&self) -> Option<&StatusSnapshot> {
        self.status.as_ref()
    }

    /// Heartbeat series in the order the API sent it.
    pub fn heartbeat(&self) -> &[HeartbeatPoint] {
        &self.heartbeat
    }

    /// Log stream, oldest first.
    pub fn logs(&self) -> &[LogEntry] {
        &self.logs
    }

    pub fn connection(&self) -> ConnectionState {
        self.connection
    }

    /// When a slice was last replaced.
    pub fn last_update(&self) -> Option<Instant> {
        self.last_update
    }

    /// Replace one slice with a fresh copy. This also counts as a
    /// successful sub-request for the connection state.
    pub fn apply_slice(&mut self, slice: Slice) {
        match slice {
            Slice::Status(status) => self.status = Some(status),
            Slice::Heartbeat(points) => self.heartbeat = points,
            Slice::Logs(entries) => self.logs = entries,
        }
        self.last_update = Some(Instant::now());
        self.connection = self.connection.transition(Signal::SliceSucceeded);
    }

    /// Record a poll cycle in which nothing answered. Slices are untouched.
    pub fn apply_cycle_failure(&mut self) {
        self.connection = self.connection.transition(Signal::CycleFailed);
    }

    /// Record an operator-requested reconnect.
    pub fn apply_manual_retry(&mut self) {
        self.connection = self.connection.transition(Signal::ManualRetry);
    }
}
