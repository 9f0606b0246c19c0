//! Offline panel, shown in place of the telemetry panels while degraded.

use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::App;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let connection = app.poller.view().connection();

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "REPORTING API OFFLINE",
            Style::default()
                .fg(app.theme.critical)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(format!("Could not reach {}", app.api_url)),
        Line::from(format!(
            "{} consecutive poll cycles failed",
            connection.consecutive_failures()
        )),
    ];
    if let Some(err) = app.poller.last_error() {
        lines.push(Line::from(Span::styled(
            err.to_string(),
            Style::default().add_modifier(Modifier::DIM),
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::raw("Press "),
        Span::styled("r", app.theme.header),
        Span::raw(" to reconnect, "),
        Span::styled("q", app.theme.header),
        Span::raw(" to quit"),
    ]));

    let block = Block::default()
        .title(Span::styled(" Offline ", app.theme.header))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.critical));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    let width = 64u16.min(area.width);
    let height = 12u16.min(area.height);
    let x = area.x + (area.width - width) / 2;
    let y = area.y + (area.height - height) / 2;
    let panel = Rect::new(x, y, width, height);

    frame.render_widget(Clear, panel);
    frame.render_widget(paragraph, panel);
}
