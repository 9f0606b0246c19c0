//! Fault-injection control panel.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;

/// Rows the panel needs for `actions` entries, borders and footer included.
pub fn height_for(actions: usize) -> u16 {
    actions as u16 + 5
}

/// Render the action list and the dispatch footer.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let enabled = app.controls_enabled();
    let in_flight = app.action_in_flight();

    let title = vec![
        Span::styled(" Chaos ", app.theme.header),
        Span::styled(
            format!("{} ", app.liveness.label()),
            app.theme.liveness_style(app.liveness),
        ),
    ];
    let block = Block::default()
        .title(Line::from(title))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [list_area, footer_area] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(2)]).areas(inner);

    let actions = app.visible_actions();
    let mut lines: Vec<Line> = actions
        .iter()
        .enumerate()
        .map(|(i, action)| {
            let selected = i == app.selected_action;
            let busy = in_flight.is_some_and(|a| a.name == action.name);

            let label_style = if !enabled && !busy {
                app.theme.disabled
            } else if action.violent {
                Style::default().fg(app.theme.critical)
            } else {
                Style::default()
            };
            let row_style = if selected { app.theme.selected } else { Style::default() };

            let key = if i < 9 { format!(" {} ", i + 1) } else { "   ".to_string() };
            let marker = if busy { "…" } else if selected { "›" } else { " " };

            Line::from(vec![
                Span::styled(key, Style::default().add_modifier(Modifier::DIM)),
                Span::raw(marker),
                Span::styled(format!(" {:<14}", action.label), label_style),
                Span::styled(action.detail, Style::default().add_modifier(Modifier::DIM)),
            ])
            .style(row_style)
        })
        .collect();

    let toggle = if app.show_all_actions { " m: fewer" } else { " m: more actions" };
    lines.push(Line::from(Span::styled(
        toggle,
        Style::default().add_modifier(Modifier::DIM),
    )));
    frame.render_widget(Paragraph::new(lines), list_area);

    let footer_style = if in_flight.is_some() {
        Style::default().fg(app.theme.warning)
    } else {
        Style::default().fg(app.theme.highlight)
    };
    let footer = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(format!(" {}", app.control_status()), footer_style)),
    ]);
    frame.render_widget(footer, footer_area);
}
