//! Periodic background work and the channel it reports through.
//!
//! The [`Scheduler`] owns two cancellable tasks:
//!
//! ```text
//!   poll loop  (every `cadence.poll`,  or on PollTrigger::fire) ──┐
//!                                                                 ├─▶ Update ─▶ UI loop
//!   probe loop (every `cadence.probe`)                          ──┘
//! ```
//!
//! A tick that comes due while a poll cycle is outstanding is skipped
//! rather than stacked. A manual trigger is the exception: it starts a
//! cycle at once even if an earlier one is still waiting on the API, so a
//! hung request cannot block reconnecting. Dropping the scheduler aborts
//! both loops and every outstanding cycle.

use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

use crate::client::{ReportingClient, TargetClient};
use crate::dispatch::DispatchReport;
use crate::probe::{probe_once, Liveness};
use crate::telemetry::{poll_cycle, TelemetryUpdate};

/// Everything background work reports to the UI loop.
#[derive(Debug)]
pub enum Update {
    Telemetry(TelemetryUpdate),
    Liveness(Liveness),
    Dispatch(DispatchReport),
}

pub type UpdateSender = mpsc::UnboundedSender<Update>;
pub type UpdateReceiver = mpsc::UnboundedReceiver<Update>;

/// Create the channel background work reports through.
pub fn channel() -> (UpdateSender, UpdateReceiver) {
    mpsc::unbounded_channel()
}

/// How often each loop runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cadence {
    pub poll: Duration,
    pub probe: Duration,
}

impl Default for Cadence {
    fn default() -> Self {
        Self {
            poll: Duration::from_secs(1),
            probe: Duration::from_secs(2),
        }
    }
}

/// Requests an immediate, out-of-band poll cycle.
#[derive(Debug, Clone)]
pub struct PollTrigger(mpsc::UnboundedSender<()>);

impl PollTrigger {
    /// Ask the poll loop for a cycle now. Returns false if the loop is gone.
    pub fn fire(&self) -> bool {
        self.0.send(()).is_ok()
    }

    /// A trigger wired to a receiver the caller inspects directly.
    #[cfg(test)]
    pub(crate) fn for_test() -> (Self, mpsc::UnboundedReceiver<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self(tx), rx)
    }
}

/// Owns the periodic poll and probe tasks.
#[derive(Debug)]
pub struct Scheduler {
    tasks: Vec<JoinHandle<()>>,
    trigger: PollTrigger,
}

impl Scheduler {
    /// Spawn the poll and probe loops on `runtime`.
    pub fn start(
        runtime: &Handle,
        reporting: ReportingClient,
        target: TargetClient,
        cadence: Cadence,
        updates: UpdateSender,
    ) -> Self {
        let (trigger_tx, trigger_rx) = mpsc::unbounded_channel();

        info!(
            api = reporting.base_url(),
            target_url = target.base_url(),
            poll_ms = cadence.poll.as_millis() as u64,
            probe_ms = cadence.probe.as_millis() as u64,
            "Starting scheduler"
        );

        let poll = runtime.spawn(poll_loop(
            reporting,
            cadence.poll,
            trigger_rx,
            updates.clone(),
        ));
        let probe = runtime.spawn(probe_loop(target, cadence.probe, updates));

        Self {
            tasks: vec![poll, probe],
            trigger: PollTrigger(trigger_tx),
        }
    }

    /// A handle for requesting out-of-band poll cycles.
    pub fn trigger(&self) -> PollTrigger {
        self.trigger.clone()
    }

    /// Returns true while any loop is still running.
    pub fn is_running(&self) -> bool {
        self.tasks.iter().any(|t| !t.is_finished())
    }

    /// Abort all loops. In-flight requests are dropped with them.
    pub fn shutdown(&mut self) {
        if self.tasks.is_empty() {
            return;
        }
        for task in self.tasks.drain(..) {
            task.abort();
        }
        info!("Scheduler stopped");
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}

async fn poll_loop(
    client: ReportingClient,
    period: Duration,
    mut triggers: mpsc::UnboundedReceiver<()>,
    updates: UpdateSender,
) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // Dropped with the loop, which aborts any cycle still outstanding.
    let mut cycles = JoinSet::new();
    let mut cycle: u64 = 0;

    loop {
        tokio::select! {
            biased;

            Some(_) = cycles.join_next() => continue,
            Some(()) = triggers.recv() => {
                // Collapse retries that piled up since the last one.
                while triggers.try_recv().is_ok() {}
                ticker.reset();
                debug!(outstanding = cycles.len(), "Out-of-band poll requested");
            }
            _ = ticker.tick() => {
                if !cycles.is_empty() {
                    debug!("Poll cycle outstanding, skipping tick");
                    continue;
                }
            }
        }

        if updates.is_closed() {
            break;
        }

        cycle += 1;
        let client = client.clone();
        let updates = updates.clone();
        cycles.spawn(async move {
            let outcome = poll_cycle(&client, cycle, |update| {
                let _ = updates.send(Update::Telemetry(update));
            })
            .await;
            debug!(cycle, ?outcome, "Poll cycle finished");
        });
    }
}

async fn probe_loop(target: TargetClient, period: Duration, updates: UpdateSender) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;
        let liveness = probe_once(&target).await;
        if updates.send(Update::Liveness(liveness)).is_err() {
            break;
        }
    }
}
