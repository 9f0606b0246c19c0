//! # healwatch
//!
//! A terminal telemetry console for a self-healing service demonstration.
//!
//! The console watches two external processes over HTTP: a reporting API
//! that publishes the service status, a heartbeat series and a log stream,
//! and the observed target itself, which can be told to crash, leak or hang.
//! It reconciles what it reads into a view model, detects when the reporting
//! API has gone away, and lets the operator inject faults.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  tokio runtime                       UI thread               │
//! │  ┌───────────┐                       ┌─────────┐   ┌──────┐ │
//! │  │ scheduler │──┐                 ┌─▶│   app   │──▶│  ui  │ │
//! │  │ poll/probe│  │   Update (mpsc) │  │ (state) │   └──────┘ │
//! │  └───────────┘  ├─────────────────┘  └────┬────┘            │
//! │  ┌───────────┐  │                         │ dispatch        │
//! │  │ dispatch  │──┘◀────────────────────────┘                 │
//! │  └───────────┘                                              │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`client`]**: HTTP clients for the reporting API and the target
//! - **[`telemetry`]**: Wire types, the connection state machine, the view
//!   model and poll-cycle reconciliation
//! - **[`scheduler`]**: Cancellable poll and probe loops and the update channel
//! - **[`probe`]**: Target liveness
//! - **[`dispatch`]**: Fault-injection actions
//! - **[`app`]**: Application state, mutated only on the UI thread
//! - **[`ui`]**: Terminal rendering using ratatui
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! healwatch --api-url http://localhost:5001 --target-url http://localhost:5000
//! ```
//!
//! ### Driving the scheduler directly
//!
//! ```no_run
//! use healwatch::{channel, Cadence, ReportingClient, Scheduler, TargetClient, Update};
//!
//! # fn main() -> anyhow::Result<()> {
//! let runtime = tokio::runtime::Runtime::new()?;
//! let reporting = ReportingClient::new("http://localhost:5001", None)?;
//! let target = TargetClient::new("http://localhost:5000", None)?;
//!
//! let (tx, mut rx) = channel();
//! let _scheduler = Scheduler::start(runtime.handle(), reporting, target, Cadence::default(), tx);
//!
//! while let Some(update) = rx.blocking_recv() {
//!     if let Update::Liveness(liveness) = update {
//!         println!("target: {}", liveness.label());
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod client;
pub mod config;
pub mod dispatch;
pub mod events;
pub mod probe;
pub mod scheduler;
pub mod telemetry;
pub mod ui;

// Re-export main types for convenience
pub use app::App;
pub use client::{ClientError, EventNotice, ReportingClient, TargetClient};
pub use config::Settings;
pub use dispatch::{
    DispatchError, DispatchOutcome, DispatchReport, Dispatcher, FaultAction, Tier, ACTIONS,
};
pub use probe::{probe_once, Liveness};
pub use scheduler::{channel, Cadence, PollTrigger, Scheduler, Update, UpdateReceiver, UpdateSender};
pub use telemetry::{
    poll_cycle, ConnectionState, CycleOutcome, LogEntry, LogKind, ServiceStatus, StatusSnapshot,
    TelemetryPoller, TelemetryUpdate, ViewModel,
};
