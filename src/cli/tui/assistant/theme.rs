use ratatui::style::{Color, Modifier, Style};

use crate::jobs::FailureKind;

/// Consistent theme for the TUI
pub struct Theme {
    pub title: Style,
    pub focused: Style,
    pub error: Style,
    pub success: Style,
    pub muted: Style,
    pub highlight: Style,
    pub step_reached: Style,
    pub step_pending: Style,
    pub help_bar: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            title: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            focused: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            error: Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
            success: Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
            muted: Style::default()
                .fg(Color::DarkGray),
            highlight: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            step_reached: Style::default()
                .fg(Color::White)
                .bg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            step_pending: Style::default()
                .fg(Color::DarkGray),
            help_bar: Style::default()
                .bg(Color::DarkGray),
        }
    }
}

impl Theme {
    /// Style of a step bubble in the indicator
    pub fn step_style(&self, reached: bool) -> Style {
        if reached {
            self.step_reached
        } else {
            self.step_pending
        }
    }

    /// Style of the connector after a step
    pub fn connector_style(&self, passed: bool) -> Style {
        if passed {
            Style::default().fg(Color::Blue)
        } else {
            self.step_pending
        }
    }

    /// Get failure icon
    pub fn failure_icon(kind: &FailureKind) -> &'static str {
        match kind {
            FailureKind::Failed => "✗",
            FailureKind::TimedOut { .. } => "⏱",
            FailureKind::Cancelled => "■",
        }
    }
}
