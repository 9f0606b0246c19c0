//! Theme configuration for the TUI.
//!
//! Supports light and dark themes with automatic terminal detection.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

use crate::probe::Liveness;
use crate::telemetry::{LogKind, Phase, ServiceStatus};

/// Color and style theme for the TUI.
///
/// Use [`Theme::auto_detect()`] for automatic theme selection based on
/// terminal background, or [`Theme::dark()`]/[`Theme::light()`] explicitly.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent color for highlights and active elements.
    pub highlight: Color,
    /// Color for degraded or transitional states (healing, disconnected).
    pub warning: Color,
    /// Color for critical states (crashed, offline).
    pub critical: Color,
    /// Color for healthy states.
    pub healthy: Color,
    /// Color for borders and separators.
    pub border: Color,
    /// Color for fault-injection events and spikes.
    pub event: Color,
    /// Style for panel titles.
    pub header: Style,
    /// Style for the selected action.
    pub selected: Style,
    /// Style for controls that cannot be used right now.
    pub disabled: Style,
    /// Border style (rounded, plain, etc.).
    pub border_type: BorderType,
}

impl Theme {
    /// Create a dark theme suitable for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            highlight: Color::Cyan,
            warning: Color::Yellow,
            critical: Color::Red,
            healthy: Color::Green,
            border: Color::Gray,
            event: Color::Magenta,
            header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD),
            disabled: Style::default().fg(Color::DarkGray),
            border_type: BorderType::Rounded,
        }
    }

    /// Create a light theme suitable for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            highlight: Color::Blue,
            warning: Color::Yellow,
            critical: Color::Red,
            healthy: Color::Green,
            border: Color::DarkGray,
            event: Color::Magenta,
            header: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::LightBlue).add_modifier(Modifier::BOLD),
            disabled: Style::default().fg(Color::Gray),
            border_type: BorderType::Rounded,
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Get style for the service status
    pub fn status_style(&self, status: ServiceStatus) -> Style {
        match status {
            ServiceStatus::Healthy => Style::default().fg(self.healthy),
            ServiceStatus::Healing => Style::default().fg(self.warning),
            ServiceStatus::Critical => {
                Style::default().fg(self.critical).add_modifier(Modifier::BOLD)
            }
            ServiceStatus::Unknown => Style::default().add_modifier(Modifier::DIM),
        }
    }

    /// Get style for the reporting connection phase
    pub fn phase_style(&self, phase: Phase) -> Style {
        match phase {
            Phase::Connected => Style::default().fg(self.healthy),
            Phase::Connecting => Style::default().add_modifier(Modifier::DIM),
            Phase::Disconnected => Style::default().fg(self.warning),
            Phase::Degraded => Style::default().fg(self.critical).add_modifier(Modifier::BOLD),
        }
    }

    pub fn liveness_style(&self, liveness: Liveness) -> Style {
        match liveness {
            Liveness::Unknown => Style::default().add_modifier(Modifier::DIM),
            Liveness::Alive => Style::default().fg(self.healthy),
            Liveness::Dead => Style::default().fg(self.critical),
        }
    }

    /// Get style for a log tag
    pub fn log_style(&self, kind: LogKind) -> Style {
        match kind {
            LogKind::Info => Style::default().fg(self.border),
            LogKind::Warn => Style::default().fg(self.warning),
            LogKind::Error => Style::default().fg(self.critical),
            LogKind::Crash => Style::default().fg(self.critical).add_modifier(Modifier::BOLD),
            LogKind::Heal => Style::default().fg(self.healthy).add_modifier(Modifier::BOLD),
            LogKind::Event => Style::default().fg(self.event),
        }
    }
}
