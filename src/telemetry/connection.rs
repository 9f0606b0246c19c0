//! Connection state machine for the reporting API.
//!
//! The poller feeds [`Signal`]s into [`ConnectionState::transition`], a pure
//! function, and the UI reads the resulting [`Phase`]:
//!
//! ```text
//!             slice ok                 cycle failed (x3)
//!  Connecting ────────▶ Connected ──────────────────────▶ Degraded
//!       │                  ▲  │ cycle failed                 │
//!       │                  │  ▼                              │ manual retry
//!       └─ cycle failed ─▶ Disconnected ◀────────────────────┘
//!                          │  ▲
//!                          └──┘ slice ok → Connected
//! ```

/// Degraded mode engages once the failure counter goes past this value.
pub const DEGRADED_AFTER: u32 = 2;

/// Input to the connection state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// One sub-request of a cycle produced a usable response.
    SliceSucceeded,
    /// All sub-requests of a cycle failed without producing a response.
    CycleFailed,
    /// The operator asked to reconnect.
    ManualRetry,
}

/// Display phase derived from [`ConnectionState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No cycle has resolved yet.
    Connecting,
    Connected,
    /// Lost, but still below the degraded threshold.
    Disconnected,
    /// Lost for more than [`DEGRADED_AFTER`] consecutive cycles.
    Degraded,
}

impl Phase {
    /// Returns the display label for this phase.
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Connecting => "Connecting",
            Phase::Connected => "Connected",
            Phase::Disconnected => "Disconnected",
            Phase::Degraded => "Offline",
        }
    }
}

/// Reachability of the reporting API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConnectionState {
    connected: bool,
    consecutive_failures: u32,
    /// Set once any cycle has resolved, to tell "connecting" from "lost".
    settled: bool,
}

impl ConnectionState {
    /// Apply a signal and return the next state.
    pub fn transition(self, signal: Signal) -> Self {
        match signal {
            Signal::SliceSucceeded => Self {
                connected: true,
                consecutive_failures: 0,
                settled: true,
            },
            Signal::CycleFailed => Self {
                connected: false,
                consecutive_failures: self.consecutive_failures.saturating_add(1),
                settled: true,
            },
            Signal::ManualRetry => Self {
                consecutive_failures: 0,
                ..self
            },
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    /// Returns true when the dashboard should give way to the offline panel.
    pub fn is_degraded(&self) -> bool {
        !self.connected && self.consecutive_failures > DEGRADED_AFTER
    }

    pub fn phase(&self) -> Phase {
        if self.connected {
            Phase::Connected
        } else if self.is_degraded() {
            Phase::Degraded
        } else if self.settled {
            Phase::Disconnected
        } else {
            Phase::Connecting
        }
    }
}
