//! Heartbeat latency chart.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Sparkline},
    Frame,
};

use crate::app::App;
use crate::telemetry::HeartbeatPoint;

/// Summary figures shown in the chart title.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SeriesStats {
    pub latest: Option<u64>,
    pub peak: u64,
    pub down: usize,
    pub spikes: usize,
}

impl SeriesStats {
    pub fn of(points: &[HeartbeatPoint]) -> Self {
        Self {
            latest: points.last().filter(|p| p.is_up()).map(|p| p.latency_ms()),
            peak: points.iter().map(HeartbeatPoint::latency_ms).max().unwrap_or(0),
            down: points.iter().filter(|p| !p.is_up()).count(),
            spikes: points.iter().filter(|p| p.event_spike).count(),
        }
    }
}

/// Render the most recent heartbeats that fit, newest on the right.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let points = app.poller.view().heartbeat();
    let stats = SeriesStats::of(points);

    let mut title = vec![Span::styled(" Latency ", app.theme.header)];
    match stats.latest {
        Some(ms) => title.push(Span::raw(format!("now {} ms ", ms))),
        None if !points.is_empty() => title.push(Span::styled(
            "DOWN ",
            Style::default().fg(app.theme.critical).add_modifier(Modifier::BOLD),
        )),
        None => {}
    }
    if !points.is_empty() {
        title.push(Span::raw(format!("peak {} ms ", stats.peak)));
    }
    if stats.down > 0 {
        title.push(Span::styled(
            format!("{} down ", stats.down),
            Style::default().fg(app.theme.critical),
        ));
    }
    if stats.spikes > 0 {
        title.push(Span::styled(
            format!("{} spikes ", stats.spikes),
            Style::default().fg(app.theme.event),
        ));
    }

    let block = Block::default()
        .title(Line::from(title))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    if points.is_empty() {
        let waiting = Paragraph::new(Span::styled(
            " Waiting for heartbeat...",
            Style::default().add_modifier(Modifier::DIM),
        ))
        .block(block);
        frame.render_widget(waiting, area);
        return;
    }

    let max_points = area.width.saturating_sub(2) as usize;
    let start = points.len().saturating_sub(max_points);
    let data: Vec<u64> = points[start..].iter().map(HeartbeatPoint::latency_ms).collect();

    let spark = Sparkline::default()
        .block(block)
        .data(&data)
        .style(Style::default().fg(app.theme.highlight));
    frame.render_widget(spark, area);
}
