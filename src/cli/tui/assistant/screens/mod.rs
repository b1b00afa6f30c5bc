/// Screen modules for the assistant, one per step
pub mod extracting;
pub mod preview;
pub mod query;
pub mod report;
pub mod upload;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
};

use super::state::ViewState;
use super::theme::Theme;
use crate::jobs::JobFailure;
use crate::wizard::{FileDescriptor, Step, WizardState};

/// Everything a screen needs to draw itself
pub struct ScreenContext<'a> {
    pub state: &'a WizardState,
    pub view: &'a ViewState,
    pub progress: Option<f64>,
    pub accept_filter: &'a str,
    pub theme: &'a Theme,
}

/// Draw the body for the current step
pub fn render_body(frame: &mut Frame, area: Rect, ctx: &ScreenContext) {
    match ctx.state.step {
        Step::AwaitUpload => upload::render(frame, area, ctx),
        Step::AwaitQuery => query::render(frame, area, ctx),
        Step::Extracting => extracting::render(frame, area, ctx),
        Step::PreviewReady => preview::render(frame, area, ctx),
        Step::ReportReady => report::render(frame, area, ctx),
    }
}

/// Help bar text for the current step
pub fn help_line(ctx: &ScreenContext) -> Line<'static> {
    match ctx.state.step {
        Step::AwaitUpload => upload::help_line(),
        Step::AwaitQuery => query::help_line(ctx),
        Step::Extracting => extracting::help_line(ctx),
        Step::PreviewReady => preview::help_line(),
        Step::ReportReady => report::help_line(ctx),
    }
}

pub fn render_header(frame: &mut Frame, area: Rect, theme: &Theme) {
    let lines = vec![
        Line::from(Span::styled("AI Document Assistant", theme.title)),
        Line::from(Span::styled(
            "Extract exactly what you need from documents in plain English, convert to Excel, and generate actionable reports",
            theme.muted,
        )),
    ];
    let header = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(header, area);
}

/// Step indicator: `( 1 )────( 2 )────...` with reached steps highlighted
pub fn render_stepper(frame: &mut Frame, area: Rect, state: &WizardState, theme: &Theme) {
    let mut spans = Vec::new();
    for step in Step::ALL {
        spans.push(Span::styled(format!(" {} ", step.index()), theme.step_style(state.has_reached(step))));
        if !step.is_terminal() {
            spans.push(Span::styled(" ──── ", theme.connector_style(state.step > step)));
        }
    }

    let lines = vec![
        Line::from(spans),
        Line::from(Span::styled(state.step.to_string(), theme.highlight)),
    ];
    let stepper = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(stepper, area);
}

pub fn render_help(frame: &mut Frame, area: Rect, line: Line<'static>, theme: &Theme) {
    let help = Paragraph::new(line).style(theme.help_bar);
    frame.render_widget(help, area);
}

/// Completed step 1: the chosen document
pub fn render_document_card(frame: &mut Frame, area: Rect, file: &FileDescriptor, theme: &Theme) {
    let lines = vec![
        Line::from(Span::styled(
            file.name.clone(),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(file.display_size(), Style::default().fg(Color::Green))),
    ];
    let card = Paragraph::new(lines).block(
        Block::default()
            .title(" Step 1: Upload Document ✓ ")
            .borders(Borders::ALL)
            .border_style(theme.success),
    );
    frame.render_widget(card, area);
}

/// Completed step 2: the submitted query, read-only
pub fn render_query_card(frame: &mut Frame, area: Rect, query: &str, theme: &Theme) {
    let card = Paragraph::new(query.trim().to_string())
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(" Step 2: What data do you want to extract? ✓ ")
                .borders(Borders::ALL)
                .border_style(theme.success),
        );
    frame.render_widget(card, area);
}

/// Spinner, message and gauge for a running job
pub fn render_busy(frame: &mut Frame, area: Rect, message: &str, ctx: &ScreenContext) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),      // Spacing
            Constraint::Length(1),      // Message
            Constraint::Length(1),      // Spacing
            Constraint::Length(1),      // Gauge
            Constraint::Min(0),
        ])
        .split(area);

    let line = Line::from(vec![
        Span::styled(format!("{} ", ctx.view.spinner()), ctx.theme.highlight),
        Span::raw(message.to_string()),
    ]);
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), chunks[1]);

    let progress = ctx.progress.unwrap_or(0.0).clamp(0.0, 1.0);
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Blue))
        .ratio(progress)
        .label(format!("{:.0}%", progress * 100.0));
    frame.render_widget(gauge, chunks[3]);
}

/// Failure message with the retry hint
pub fn render_failure(frame: &mut Frame, area: Rect, failure: &JobFailure, theme: &Theme) {
    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(format!("{} ", Theme::failure_icon(&failure.kind)), theme.error),
            Span::styled(failure.message.clone(), theme.error),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::raw("Press "),
            Span::styled("r", theme.highlight),
            Span::raw(" to retry."),
        ]),
    ];
    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

/// Shared key hint span pair
pub fn key_hint(key: &'static str, label: &'static str) -> Vec<Span<'static>> {
    vec![
        Span::styled(key, Style::default().fg(Color::Cyan)),
        Span::raw(format!(" {}  ", label)),
    ]
}
