use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};

use crate::app::App;

/// Log lines moved per PgUp/PgDn.
const LOG_PAGE: usize = 10;
/// Log lines moved per mouse wheel notch.
const LOG_WHEEL: usize = 3;

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Handle a key event
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    // If help is shown, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    match key.code {
        // Quit
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit(),

        // Reconnect when offline, otherwise poll now
        KeyCode::Char('r') => app.retry_or_refresh(),

        // Help
        KeyCode::Char('?') => app.toggle_help(),

        // Fault actions
        KeyCode::Up | KeyCode::Char('k') => app.select_prev_action(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next_action(),
        KeyCode::Enter => app.trigger_selected(),
        KeyCode::Char('m') => app.toggle_more_actions(),
        KeyCode::Char(c @ '1'..='9') => {
            let index = (c as u8 - b'1') as usize;
            app.trigger_index(index);
        }

        // Log panel
        KeyCode::PageUp => app.scroll_logs_up(LOG_PAGE),
        KeyCode::PageDown => app.scroll_logs_down(LOG_PAGE),
        KeyCode::End => app.log_scroll.follow(),
        KeyCode::Home => app.log_scroll.oldest(),

        _ => {}
    }
}

/// Handle mouse events
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::ScrollUp => app.scroll_logs_up(LOG_WHEEL),
        MouseEventKind::ScrollDown => app.scroll_logs_down(LOG_WHEEL),
        _ => {}
    }
}
