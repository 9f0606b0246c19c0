//! Liveness probe for the observed target.
//!
//! The probe result only gates the fault-injection controls; it has no
//! bearing on the reporting connection.

use tracing::debug;

use crate::client::TargetClient;

/// Tri-state liveness of the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Liveness {
    /// No probe has resolved yet.
    #[default]
    Unknown,
    Alive,
    Dead,
}

impl Liveness {
    /// Returns the display label.
    pub fn label(&self) -> &'static str {
        match self {
            Liveness::Unknown => "...",
            Liveness::Alive => "Target Online",
            Liveness::Dead => "Target Down",
        }
    }

    /// Fault injection is only offered against a live target.
    pub fn allows_dispatch(&self) -> bool {
        *self == Liveness::Alive
    }
}

/// Probe the target once. Any 2xx is alive, anything else is dead.
///
/// ```no_run
/// use healwatch::{probe::probe_once, TargetClient};
///
/// # tokio_test::block_on(async {
/// let target = TargetClient::new("http://localhost:5000", None).unwrap();
/// println!("{}", probe_once(&target).await.label());
/// # });
/// ```
pub async fn probe_once(target: &TargetClient) -> Liveness {
    match target.health().await {
        Ok(()) => Liveness::Alive,
        Err(err) => {
            debug!(url = target.base_url(), error = %err, "Health probe failed");
            Liveness::Dead
        }
    }
}
