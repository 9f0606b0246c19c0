//! Common UI components shared across the dashboard and offline views.
//!
//! This module contains the header bar, status bar, and help overlay.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::telemetry::ServiceStatus;

/// Render the header bar.
///
/// Displays: service status, reporting connection, target liveness.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let view = app.poller.view();
    let status = view.status().map(|s| s.status).unwrap_or(ServiceStatus::Unknown);
    let phase = view.connection().phase();

    let line = Line::from(vec![
        Span::styled(" ● ", app.theme.status_style(status)),
        Span::styled("HEALWATCH ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ "),
        Span::styled(status.label(), app.theme.status_style(status)),
        Span::raw(" │ API "),
        Span::styled(phase.label(), app.theme.phase_style(phase)),
        Span::raw(" │ "),
        Span::styled(app.liveness.label(), app.theme.liveness_style(app.liveness)),
        Span::styled(
            format!(" │ {}", app.api_url),
            Style::default().add_modifier(Modifier::DIM),
        ),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

/// Render the status bar at the bottom.
///
/// Shows: time since last update, available controls.
/// Also displays temporary status messages and errors.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    // Check for temporary status message first
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    let status = if app.poller.is_degraded() {
        " Offline | r:reconnect ↑↓:select Enter:fire ?:help q:quit".to_string()
    } else {
        let controls = "↑↓:select Enter:fire m:more PgUp/PgDn:logs r:refresh ?:help q:quit";
        match app.poller.view().last_update() {
            Some(at) => format!(
                " Updated {:.1}s ago | {}",
                at.elapsed().as_secs_f64(),
                controls
            ),
            None => match app.poller.last_error() {
                Some(err) => format!(" Error: {} | {}", err, controls),
                None => format!(" Connecting... | {}", controls),
            },
        }
    };

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));

    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the current view.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let section = |title: &'static str| {
        Line::from(vec![Span::styled(
            title,
            Style::default().add_modifier(Modifier::BOLD),
        )])
    };

    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        section(" Chaos controls"),
        Line::from("  ↑/↓ j/k     Select action"),
        Line::from("  Enter       Fire selected action"),
        Line::from("  1-9         Fire action by number"),
        Line::from("  m           More / fewer actions"),
        Line::from(""),
        section(" Logs"),
        Line::from("  PgUp/PgDn   Scroll 10 lines"),
        Line::from("  Home        Oldest entry"),
        Line::from("  End         Follow newest"),
        Line::from(""),
        section(" General"),
        Line::from("  r           Refresh / reconnect"),
        Line::from("  ?           Toggle help"),
        Line::from("  q           Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    // Center the help overlay - responsive to terminal size
    let help_width = 42u16.min(area.width.saturating_sub(4));
    let help_height = 23u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    // Clear the area behind the help
    frame.render_widget(ratatui::widgets::Clear, help_area);
    frame.render_widget(paragraph, help_area);
}
