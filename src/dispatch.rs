//! Operator-triggered fault injection.
//!
//! Firing an action does two unrelated things:
//!
//! 1. `POST /api/event` on the reporting API, so the dashboard can mark the
//!    spike. The result is discarded.
//! 2. `GET /<action>` on the target. The result is classified into a
//!    [`DispatchOutcome`] and sent back to the UI loop.
//!
//! Only one action may be in flight at a time. Healing outcomes are never
//! tracked here; they show up in the telemetry.

use serde_json::Value;
use thiserror::Error;
use tokio::runtime::Handle;
use tracing::{debug, info};

use crate::client::{ClientError, EventNotice, ReportingClient, TargetClient};
use crate::scheduler::{Update, UpdateSender};

/// Where an action sits in the control panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// Always visible.
    Primary,
    /// Shown once the operator expands the panel.
    Secondary,
}

/// A fault the target knows how to inflict on itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaultAction {
    /// Endpoint name on the target, also the event type.
    pub name: &'static str,
    pub label: &'static str,
    /// Short description of the mechanism.
    pub detail: &'static str,
    pub tier: Tier,
    /// Rendered with the critical style.
    pub violent: bool,
}

impl FaultAction {
    const fn new(
        name: &'static str,
        label: &'static str,
        detail: &'static str,
        tier: Tier,
        violent: bool,
    ) -> Self {
        Self {
            name,
            label,
            detail,
            tier,
            violent,
        }
    }

    /// Path on the target that triggers this action.
    pub fn path(&self) -> String {
        format!("/{}", self.name)
    }

    /// Look up an action by endpoint name.
    pub fn find(name: &str) -> Option<&'static FaultAction> {
        ACTIONS.iter().find(|a| a.name == name)
    }
}

/// Every action the control panel offers, in display order.
pub static ACTIONS: [FaultAction; 11] = [
    FaultAction::new("crash", "Crash", "sys.exit(1)", Tier::Primary, false),
    FaultAction::new("hard-crash", "Hard Crash", "Segfault", Tier::Primary, true),
    FaultAction::new("nuclear", "Nuclear", "SIGKILL", Tier::Primary, true),
    FaultAction::new("chaos", "Random Chaos", "???", Tier::Primary, false),
    FaultAction::new("leak", "Memory Leak", "+10MB", Tier::Secondary, false),
    FaultAction::new("leak-massive", "Massive Leak", "+100MB", Tier::Secondary, true),
    FaultAction::new("cpu-burn", "CPU Burn", "100% CPU", Tier::Secondary, false),
    FaultAction::new("cpu-stop", "Stop CPU Burn", "Release", Tier::Secondary, false),
    FaultAction::new("error", "HTTP 500", "Error", Tier::Secondary, false),
    FaultAction::new("timeout", "Timeout", "30s hang", Tier::Secondary, false),
    FaultAction::new("slow", "Slow Mode", "Toggle", Tier::Secondary, false),
];

/// Words that mark a dropped connection as the expected result of the action.
const DESTRUCTIVE: [&str; 4] = ["crash", "kill", "nuclear", "chaos"];

/// Longest payload excerpt shown for a delivered action.
const PREVIEW_CHARS: usize = 40;

/// How a dispatched action ended, from the console's point of view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The target answered.
    Delivered { preview: String },
    /// The target went away mid-request, as a destructive action should.
    Destroyed,
    /// Anything else.
    Failed { message: String },
}

impl DispatchOutcome {
    /// Classify the target's answer to `action`.
    pub fn classify(action: &FaultAction, result: &Result<Value, ClientError>) -> Self {
        match result {
            Ok(payload) => DispatchOutcome::Delivered {
                preview: preview(payload),
            },
            Err(err) if err.is_transport() && is_destructive(action, err) => {
                DispatchOutcome::Destroyed
            }
            Err(err) => DispatchOutcome::Failed {
                message: err.to_string(),
            },
        }
    }

    /// One-line summary for the control panel footer.
    pub fn summary(&self) -> String {
        match self {
            DispatchOutcome::Delivered { preview } => format!("OK {}", preview),
            DispatchOutcome::Destroyed => "Server destroyed! Watch the dashboard...".to_string(),
            DispatchOutcome::Failed { message } => format!("Failed: {}", message),
        }
    }
}

fn is_destructive(action: &FaultAction, err: &ClientError) -> bool {
    let context = format!("{} {}", action.name, err).to_ascii_lowercase();
    DESTRUCTIVE.iter().any(|word| context.contains(word))
}

fn preview(payload: &Value) -> String {
    let text = payload.to_string();
    let head: String = text.chars().take(PREVIEW_CHARS).collect();
    format!("{}...", head)
}

/// A finished dispatch, sent back to the UI loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchReport {
    pub action: &'static FaultAction,
    pub outcome: DispatchOutcome,
}

/// Errors returned when an action cannot be fired.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("{0} is still in flight")]
    Busy(&'static str),
}

/// Fires fault actions and guards against overlapping dispatches.
///
/// Lives on the UI thread; the network work runs on `runtime` and reports
/// back through `updates`.
pub struct Dispatcher {
    reporting: ReportingClient,
    target: TargetClient,
    runtime: Handle,
    updates: UpdateSender,
    in_flight: Option<&'static FaultAction>,
    last: Option<DispatchReport>,
}

impl Dispatcher {
    pub fn new(
        reporting: ReportingClient,
        target: TargetClient,
        runtime: Handle,
        updates: UpdateSender,
    ) -> Self {
        Self {
            reporting,
            target,
            runtime,
            updates,
            in_flight: None,
            last: None,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// The action currently awaiting the target's answer.
    pub fn in_flight(&self) -> Option<&'static FaultAction> {
        self.in_flight
    }

    /// The most recently completed dispatch.
    pub fn last(&self) -> Option<&DispatchReport> {
        self.last.as_ref()
    }

    /// Fire `action`. Nothing is sent if another action is still in flight.
    pub fn dispatch(&mut self, action: &'static FaultAction) -> Result<(), DispatchError> {
        if let Some(current) = self.in_flight {
            debug!(action = action.name, current = current.name, "Dispatch rejected");
            return Err(DispatchError::Busy(current.name));
        }

        info!(action = action.name, "Injecting fault");
        self.in_flight = Some(action);

        let reporting = self.reporting.clone();
        self.runtime.spawn(async move {
            let notice = EventNotice {
                kind: action.name,
                label: action.label,
            };
            let _ = reporting.notify_event(&notice).await;
        });

        let target = self.target.clone();
        let updates = self.updates.clone();
        self.runtime.spawn(async move {
            let result = target.invoke(&action.path()).await;
            let outcome = DispatchOutcome::classify(action, &result);
            let _ = updates.send(Update::Dispatch(DispatchReport { action, outcome }));
        });

        Ok(())
    }

    /// Record a finished dispatch and release the guard.
    pub fn complete(&mut self, report: DispatchReport) {
        if self.in_flight.is_some_and(|a| a.name == report.action.name) {
            self.in_flight = None;
        }
        info!(
            action = report.action.name,
            outcome = %report.outcome.summary(),
            "Fault dispatch finished"
        );
        self.last = Some(report);
    }
}
