//! Terminal UI rendering using ratatui.
//!
//! Each panel lives in its own submodule with a `render` function. Panels
//! only read the view model; the one piece of state they write is the log
//! panel's viewport height.
//!
//! ## Submodules
//!
//! - [`status`]: Current service status snapshot
//! - [`controls`]: Fault-injection actions and the dispatch footer
//! - [`latency`]: Heartbeat latency sparkline
//! - [`logs`]: Remote log stream with follow-newest scrolling
//! - [`offline`]: Shown instead of the telemetry panels while degraded
//! - [`common`]: Shared components (header, status bar, help overlay)
//! - [`theme`]: Light/dark theme support with terminal auto-detection
//!
//! ## Layout
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │ Header (common::render_header)       │
//! ├───────────────────┬──────────────────┤
//! │ Service status    │ Chaos controls   │
//! ├───────────────────┴──────────────────┤
//! │ Latency sparkline                    │
//! ├──────────────────────────────────────┤
//! │ Logs                                 │
//! ├──────────────────────────────────────┤
//! │ Status Bar (common::render_status)   │
//! └──────────────────────────────────────┘
//!         ↑
//!    While degraded, offline::render replaces the status, latency
//!    and log panels; the controls stay. Help renders on top.
//! ```

pub mod common;
pub mod controls;
pub mod latency;
pub mod logs;
pub mod offline;
pub mod status;
pub mod theme;

pub use theme::Theme;

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};

use crate::app::App;

/// Minimum terminal size for usable display
pub const MIN_WIDTH: u16 = 70;
pub const MIN_HEIGHT: u16 = 20;

/// Render one frame.
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Check for minimum terminal size
    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = format!(
            "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
            area.width, area.height, MIN_WIDTH, MIN_HEIGHT
        );
        let paragraph = Paragraph::new(msg)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Yellow));
        let top = (area.height / 2).saturating_sub(2);
        let centered = Rect::new(0, top, area.width, 5u16.min(area.height - top));
        frame.render_widget(paragraph, centered);
        return;
    }

    let [header, content, status_bar] = Layout::vertical([
        Constraint::Length(1), // Header bar
        Constraint::Min(8),    // Dashboard or offline panel
        Constraint::Length(1), // Status bar
    ])
    .areas(area);

    common::render_header(frame, app, header);

    if app.poller.is_degraded() {
        render_offline(frame, app, content);
    } else {
        render_dashboard(frame, app, content);
    }

    common::render_status_bar(frame, app, status_bar);

    if app.show_help {
        common::render_help(frame, app, area);
    }
}

fn render_dashboard(frame: &mut Frame, app: &mut App, area: Rect) {
    let top_height = controls::height_for(app.visible_actions().len()).max(10);

    let [top, chart, log_area] = Layout::vertical([
        Constraint::Length(top_height),
        Constraint::Length(7),
        Constraint::Min(4),
    ])
    .areas(area);

    let [status_area, controls_area] =
        Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)]).areas(top);

    status::render(frame, app, status_area);
    controls::render(frame, app, controls_area);
    latency::render(frame, app, chart);
    logs::render(frame, app, log_area);
}

// Fault injection does not depend on the reporting API, so the controls
// stay reachable next to the offline panel.
fn render_offline(frame: &mut Frame, app: &mut App, area: Rect) {
    let [panel, controls_area] =
        Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)]).areas(area);
    let controls_height = controls::height_for(app.visible_actions().len()).min(controls_area.height);
    let [controls_area, _] =
        Layout::vertical([Constraint::Length(controls_height), Constraint::Min(0)]).areas(controls_area);

    offline::render(frame, app, panel);
    controls::render(frame, app, controls_area);
}
