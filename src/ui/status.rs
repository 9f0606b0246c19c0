//! Service status panel.

use chrono::Local;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::telemetry::{StatusSnapshot, Timestamp};

/// Render the status snapshot, or a placeholder before the first one.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(Span::styled(" Service ", app.theme.header))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    let Some(status) = app.poller.view().status() else {
        let waiting = Paragraph::new(Line::from(Span::styled(
            " Waiting for status...",
            Style::default().add_modifier(Modifier::DIM),
        )))
        .block(block);
        frame.render_widget(waiting, area);
        return;
    };

    let lines = status_lines(app, status);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn status_lines<'a>(app: &App, status: &'a StatusSnapshot) -> Vec<Line<'a>> {
    let dim = Style::default().add_modifier(Modifier::DIM);
    let row = |label: &'static str, value: Span<'a>| {
        Line::from(vec![Span::styled(format!(" {:<11}", label), dim), value])
    };

    let latency = match status.latency() {
        Some(ms) => Span::raw(format!("{:.1} ms", ms)),
        None => Span::styled("-", dim),
    };

    let resources = match (status.memory_mb, status.cpu_percent) {
        (None, None) => Span::styled("-", dim),
        (mem, cpu) => Span::raw(format!(
            "{} MB / {} %",
            mem.map_or("-".to_string(), |m| format!("{:.0}", m)),
            cpu.map_or("-".to_string(), |c| format!("{:.0}", c)),
        )),
    };

    let crashes = if status.total_crashes > 0 {
        Span::styled(
            status.total_crashes.to_string(),
            Style::default().fg(app.theme.critical),
        )
    } else {
        Span::raw("0")
    };

    let events = match status.last_event.as_deref() {
        Some(label) if status.total_events > 0 => Span::styled(
            format!("{} (last: {})", status.total_events, label),
            Style::default().fg(app.theme.event),
        ),
        _ => Span::raw(status.total_events.to_string()),
    };

    vec![
        row(
            "Status",
            Span::styled(
                format!("● {}", status.status.label()),
                app.theme.status_style(status.status),
            ),
        ),
        row("Uptime", Span::raw(uptime(status.uptime_start.as_ref()))),
        row("Latency", latency),
        row("Crashes", crashes),
        row("Last crash", clock_or_dash(status.last_crash.as_ref())),
        row("Last heal", clock_or_dash(status.last_heal.as_ref())),
        row("Events", events),
        row("Mem / CPU", resources),
    ]
}

fn clock_or_dash(ts: Option<&Timestamp>) -> Span<'static> {
    match ts {
        Some(ts) => Span::raw(ts.clock()),
        None => Span::styled("-", Style::default().add_modifier(Modifier::DIM)),
    }
}

/// Time since `start`, in local wall-clock terms.
fn uptime(start: Option<&Timestamp>) -> String {
    let Some(start) = start.and_then(Timestamp::parse) else {
        return "-".to_string();
    };
    let secs = (Local::now().naive_local() - start).num_seconds().max(0) as u64;
    format_duration(secs)
}

/// Format seconds as `1h 02m 03s`, dropping leading zero units.
fn format_duration(secs: u64) -> String {
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if h > 0 {
        format!("{}h {:02}m {:02}s", h, m, s)
    } else if m > 0 {
        format!("{}m {:02}s", m, s)
    } else {
        format!("{}s", s)
    }
}
