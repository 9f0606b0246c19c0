//! Log stream panel.
//!
//! The panel follows the newest entry. Scrolling back detaches it until the
//! stream grows again, or until the operator presses End.

use std::ops::Range;

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::telemetry::LogEntry;

/// Scroll position of the log panel, counted back from the newest entry.
///
/// The remote buffer is capped, so growth is detected as "longer than
/// before, or a different newest entry", not by length alone.
#[derive(Debug, Clone, Default)]
pub struct LogScroll {
    from_bottom: usize,
    viewport: usize,
    seen_len: usize,
    seen_tail: Option<LogEntry>,
}

impl LogScroll {
    /// Record the current log stream. Snaps to the newest entry if it grew.
    ///
    /// Returns true if the position snapped.
    pub fn observe(&mut self, logs: &[LogEntry]) -> bool {
        let tail = logs.last();
        let grew = logs.len() > self.seen_len || tail != self.seen_tail.as_ref();

        self.seen_len = logs.len();
        if tail != self.seen_tail.as_ref() {
            self.seen_tail = tail.cloned();
        }

        if grew {
            self.from_bottom = 0;
        } else {
            self.clamp();
        }
        grew
    }

    /// Lines between the newest entry and the bottom of the panel.
    pub fn from_bottom(&self) -> usize {
        self.from_bottom
    }

    pub fn is_following(&self) -> bool {
        self.from_bottom == 0
    }

    pub fn scroll_up(&mut self, n: usize) {
        self.from_bottom = self.from_bottom.saturating_add(n);
        self.clamp();
    }

    pub fn scroll_down(&mut self, n: usize) {
        self.from_bottom = self.from_bottom.saturating_sub(n);
    }

    /// Jump back to the newest entry.
    pub fn follow(&mut self) {
        self.from_bottom = 0;
    }

    /// Jump to the oldest entry.
    pub fn oldest(&mut self) {
        self.from_bottom = self.max_offset();
    }

    /// Tell the scroller how many lines the panel shows.
    pub fn set_viewport(&mut self, lines: usize) {
        self.viewport = lines;
        self.clamp();
    }

    /// Indices of the entries to show, oldest first.
    pub fn window(&self, len: usize) -> Range<usize> {
        let height = self.viewport.max(1).min(len);
        let end = len.saturating_sub(self.from_bottom).max(height);
        end - height..end
    }

    fn max_offset(&self) -> usize {
        self.seen_len.saturating_sub(self.viewport.max(1))
    }

    fn clamp(&mut self) {
        self.from_bottom = self.from_bottom.min(self.max_offset());
    }
}

/// Render the log stream.
pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let inner_height = area.height.saturating_sub(2) as usize;
    app.log_scroll.set_viewport(inner_height);

    let logs = app.poller.view().logs();
    let window = app.log_scroll.window(logs.len());

    let title = if app.log_scroll.is_following() {
        format!(" Logs ({}) ", logs.len())
    } else {
        format!(
            " Logs ({}) [{} newer, End to follow] ",
            logs.len(),
            app.log_scroll.from_bottom()
        )
    };

    let lines: Vec<Line> = if logs.is_empty() {
        vec![Line::from(Span::styled(
            " Waiting for logs...",
            Style::default().add_modifier(Modifier::DIM),
        ))]
    } else {
        logs[window]
            .iter()
            .map(|entry| {
                Line::from(vec![
                    Span::styled(
                        format!("{} ", entry.timestamp.clock()),
                        Style::default().add_modifier(Modifier::DIM),
                    ),
                    Span::styled(
                        format!("{:<5} ", entry.kind.tag()),
                        app.theme.log_style(entry.kind),
                    ),
                    Span::raw(entry.message.as_str()),
                ])
            })
            .collect()
    };

    let block = Block::default()
        .title(Span::styled(title, app.theme.header))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
