//! Application state and input-driven actions.

use std::time::{Duration, Instant};

use tokio::sync::mpsc::error::TryRecvError;
use tracing::info;

use crate::dispatch::{Dispatcher, FaultAction, Tier, ACTIONS};
use crate::probe::Liveness;
use crate::scheduler::{PollTrigger, Update, UpdateReceiver};
use crate::telemetry::TelemetryPoller;
use crate::ui::logs::LogScroll;
use crate::ui::Theme;

/// Footer text of the control panel while nothing has been fired yet.
pub const READY_MESSAGE: &str = "Ready to inject chaos";

/// Main application state.
///
/// Owned by the UI loop. Background tasks only reach it through the
/// update channel drained by [`App::drain_updates`].
pub struct App {
    pub running: bool,
    pub show_help: bool,
    /// Whether secondary fault actions are listed.
    pub show_all_actions: bool,
    /// Index into [`App::visible_actions`].
    pub selected_action: usize,

    pub poller: TelemetryPoller,
    pub liveness: Liveness,
    pub log_scroll: LogScroll,

    pub api_url: String,
    pub target_url: String,

    // UI
    pub theme: Theme,

    // Status message (temporary feedback)
    pub status_message: Option<(String, Instant)>,

    dispatcher: Dispatcher,
    trigger: PollTrigger,
    updates: UpdateReceiver,
}

impl App {
    pub fn new(
        dispatcher: Dispatcher,
        trigger: PollTrigger,
        updates: UpdateReceiver,
        api_url: &str,
        target_url: &str,
        theme: Theme,
    ) -> Self {
        Self {
            running: true,
            show_help: false,
            show_all_actions: false,
            selected_action: 0,
            poller: TelemetryPoller::new(),
            liveness: Liveness::default(),
            log_scroll: LogScroll::default(),
            api_url: api_url.to_string(),
            target_url: target_url.to_string(),
            theme,
            status_message: None,
            dispatcher,
            trigger,
            updates,
        }
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: impl Into<String>) {
        self.status_message = Some((message.into(), Instant::now()));
    }

    /// Get the current status message if it hasn't expired (3 seconds).
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < Duration::from_secs(3) {
                return Some(msg);
            }
        }
        None
    }

    /// Apply every pending background update, in arrival order.
    ///
    /// Returns true if anything changed.
    pub fn drain_updates(&mut self) -> bool {
        let mut changed = false;
        loop {
            match self.updates.try_recv() {
                Ok(update) => changed |= self.apply(update),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        if changed {
            self.log_scroll.observe(self.poller.view().logs());
        }
        changed
    }

    fn apply(&mut self, update: Update) -> bool {
        match update {
            Update::Telemetry(update) => self.poller.apply(update),
            Update::Liveness(liveness) => {
                if liveness != self.liveness {
                    info!(liveness = liveness.label(), "Target liveness changed");
                }
                self.liveness = liveness;
                true
            }
            Update::Dispatch(report) => {
                self.dispatcher.complete(report);
                true
            }
        }
    }

    /// Leave degraded mode and poll again right away.
    pub fn retry_connection(&mut self) {
        self.poller.manual_retry();
        self.trigger.fire();
        self.set_status_message("Reconnecting...");
    }

    /// Request a poll cycle without waiting for the next tick.
    pub fn refresh_now(&mut self) {
        self.trigger.fire();
        self.set_status_message("Refreshing...");
    }

    /// `r`: reconnect when offline, refresh otherwise.
    pub fn retry_or_refresh(&mut self) {
        if self.poller.is_degraded() {
            self.retry_connection();
        } else {
            self.refresh_now();
        }
    }

    /// Fault actions currently listed in the control panel.
    pub fn visible_actions(&self) -> Vec<&'static FaultAction> {
        ACTIONS
            .iter()
            .filter(|a| self.show_all_actions || a.tier == Tier::Primary)
            .collect()
    }

    /// Show or hide the secondary actions.
    pub fn toggle_more_actions(&mut self) {
        self.show_all_actions = !self.show_all_actions;
        let count = self.visible_actions().len();
        self.selected_action = self.selected_action.min(count.saturating_sub(1));
    }

    /// Move the action selection down by one, wrapping around.
    pub fn select_next_action(&mut self) {
        let count = self.visible_actions().len();
        if count > 0 {
            self.selected_action = (self.selected_action + 1) % count;
        }
    }

    /// Move the action selection up by one, wrapping around.
    pub fn select_prev_action(&mut self) {
        let count = self.visible_actions().len();
        if count > 0 {
            self.selected_action = (self.selected_action + count - 1) % count;
        }
    }

    /// Returns true if fault actions may be fired right now.
    ///
    /// Only the target's liveness gates the controls. The reporting API
    /// being offline does not.
    pub fn controls_enabled(&self) -> bool {
        self.liveness.allows_dispatch() && !self.dispatcher.is_busy()
    }

    /// The action awaiting the target's answer, if any.
    pub fn action_in_flight(&self) -> Option<&'static FaultAction> {
        self.dispatcher.in_flight()
    }

    /// Footer line of the control panel.
    pub fn control_status(&self) -> String {
        if let Some(action) = self.dispatcher.in_flight() {
            format!("Triggering: {}...", action.label)
        } else if let Some(report) = self.dispatcher.last() {
            report.outcome.summary()
        } else {
            READY_MESSAGE.to_string()
        }
    }

    /// Fire the selected action.
    pub fn trigger_selected(&mut self) {
        self.trigger_index(self.selected_action);
    }

    /// Fire the action at `index` in the visible list.
    pub fn trigger_index(&mut self, index: usize) {
        let Some(action) = self.visible_actions().get(index).copied() else {
            return;
        };
        self.selected_action = index;

        if !self.liveness.allows_dispatch() {
            self.set_status_message(format!("{}: controls disabled", self.liveness.label()));
            return;
        }
        if let Err(e) = self.dispatcher.dispatch(action) {
            self.set_status_message(e.to_string());
        }
    }

    /// Scroll the log panel towards older entries.
    pub fn scroll_logs_up(&mut self, n: usize) {
        self.log_scroll.scroll_up(n);
    }

    /// Scroll the log panel towards newer entries.
    pub fn scroll_logs_down(&mut self, n: usize) {
        self.log_scroll.scroll_down(n);
    }

    /// Quit the application.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{ReportingClient, TargetClient};
    use crate::dispatch::{DispatchOutcome, DispatchReport};
    use crate::scheduler;
    use crate::telemetry::{CycleOutcome, LogEntry, LogKind, Resource, Slice, TelemetryUpdate, Timestamp};
    use tokio::sync::mpsc;

    struct Harness {
        app: App,
        updates: scheduler::UpdateSender,
        triggers: mpsc::UnboundedReceiver<()>,
        _runtime: tokio::runtime::Runtime,
    }

    // Nothing listens on port 9; requests fail fast.
    fn harness() -> Harness {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let (tx, rx) = scheduler::channel();
        let (trigger, triggers) = PollTrigger::for_test();
        let dispatcher = Dispatcher::new(
            ReportingClient::new("http://127.0.0.1:9", None).unwrap(),
            TargetClient::new("http://127.0.0.1:9", None).unwrap(),
            runtime.handle().clone(),
            tx.clone(),
        );
        let app = App::new(
            dispatcher,
            trigger,
            rx,
            "http://127.0.0.1:9",
            "http://127.0.0.1:9",
            Theme::dark(),
        );
        Harness {
            app,
            updates: tx,
            triggers,
            _runtime: runtime,
        }
    }

    fn fail_cycle(h: &Harness, cycle: u64) {
        h.updates
            .send(Update::Telemetry(TelemetryUpdate::CycleFinished {
                cycle,
                outcome: CycleOutcome::Failed,
            }))
            .unwrap();
    }

    fn log(message: &str) -> LogEntry {
        LogEntry {
            timestamp: Timestamp::new("2024-05-01T12:00:00"),
            kind: LogKind::Info,
            message: message.to_string(),
        }
    }

    #[test]
    fn test_initial_state() {
        let h = harness();
        assert!(h.app.running);
        assert_eq!(h.app.liveness, Liveness::Unknown);
        assert!(!h.app.controls_enabled());
        assert_eq!(h.app.control_status(), READY_MESSAGE);
        assert_eq!(h.app.visible_actions().len(), 4);
    }

    #[test]
    fn test_drain_applies_in_order() {
        let mut h = harness();
        h.updates.send(Update::Liveness(Liveness::Dead)).unwrap();
        h.updates.send(Update::Liveness(Liveness::Alive)).unwrap();

        assert!(h.app.drain_updates());
        assert_eq!(h.app.liveness, Liveness::Alive);
        assert!(!h.app.drain_updates());
    }

    #[test]
    fn test_retry_in_degraded_mode() {
        let mut h = harness();
        for cycle in 1..=3 {
            fail_cycle(&h, cycle);
        }
        h.app.drain_updates();
        assert!(h.app.poller.is_degraded());

        h.app.retry_or_refresh();
        assert!(!h.app.poller.is_degraded());
        assert_eq!(h.app.poller.view().connection().consecutive_failures(), 0);
        assert!(h.triggers.try_recv().is_ok());
    }

    #[test]
    fn test_refresh_keeps_failure_count() {
        let mut h = harness();
        fail_cycle(&h, 1);
        h.app.drain_updates();

        h.app.retry_or_refresh();
        assert_eq!(h.app.poller.view().connection().consecutive_failures(), 1);
        assert!(h.triggers.try_recv().is_ok());
    }

    #[test]
    fn test_more_actions_and_selection() {
        let mut h = harness();
        h.app.select_prev_action();
        assert_eq!(h.app.selected_action, 3);

        h.app.toggle_more_actions();
        assert_eq!(h.app.visible_actions().len(), 11);
        h.app.selected_action = 10;
        h.app.toggle_more_actions();
        assert_eq!(h.app.selected_action, 3);

        h.app.select_next_action();
        assert_eq!(h.app.selected_action, 0);
    }

    #[test]
    fn test_dead_target_blocks_dispatch() {
        let mut h = harness();
        h.updates.send(Update::Liveness(Liveness::Dead)).unwrap();
        h.app.drain_updates();

        h.app.trigger_index(0);
        assert!(h.app.action_in_flight().is_none());
        assert_eq!(h.app.get_status_message(), Some("Target Down: controls disabled"));
    }

    #[test]
    fn test_dispatch_lifecycle_in_footer() {
        let mut h = harness();
        h.updates.send(Update::Liveness(Liveness::Alive)).unwrap();
        h.app.drain_updates();
        assert!(h.app.controls_enabled());

        h.app.trigger_index(1);
        let action = h.app.action_in_flight().unwrap();
        assert_eq!(action.name, "hard-crash");
        assert_eq!(h.app.control_status(), "Triggering: Hard Crash...");
        assert!(!h.app.controls_enabled());

        h.updates
            .send(Update::Dispatch(DispatchReport {
                action,
                outcome: DispatchOutcome::Destroyed,
            }))
            .unwrap();
        h.app.drain_updates();
        assert!(h.app.action_in_flight().is_none());
        assert_eq!(
            h.app.control_status(),
            "Server destroyed! Watch the dashboard..."
        );
    }

    #[test]
    fn test_dispatch_while_reporting_api_offline() {
        let mut h = harness();
        h.updates.send(Update::Liveness(Liveness::Alive)).unwrap();
        for cycle in 1..=3 {
            fail_cycle(&h, cycle);
        }
        h.app.drain_updates();
        assert!(h.app.poller.is_degraded());
        assert!(h.app.controls_enabled());

        h.app.trigger_index(0);
        assert_eq!(h.app.action_in_flight().map(|a| a.name), Some("crash"));
        assert_eq!(h.app.control_status(), "Triggering: Crash...");
        assert!(h.app.get_status_message().is_none());
    }

    #[test]
    fn test_log_growth_snaps_to_newest() {
        let mut h = harness();
        let send_logs = |h: &Harness, entries: Vec<LogEntry>| {
            h.updates
                .send(Update::Telemetry(TelemetryUpdate::Fetched {
                    cycle: 1,
                    resource: Resource::Logs,
                    result: Ok(Slice::Logs(entries)),
                }))
                .unwrap();
        };

        send_logs(&h, (0..30).map(|i| log(&i.to_string())).collect());
        h.app.drain_updates();
        h.app.scroll_logs_up(5);
        assert_eq!(h.app.log_scroll.from_bottom(), 5);

        send_logs(&h, (0..31).map(|i| log(&i.to_string())).collect());
        h.app.drain_updates();
        assert_eq!(h.app.log_scroll.from_bottom(), 0);
    }
}
