use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::preview::{preview_height, render_preview};
use super::{key_hint, render_busy, render_failure, ScreenContext};
use crate::wizard::Report;

pub fn render(frame: &mut Frame, area: Rect, ctx: &ScreenContext) {
    let preview = ctx.state.extraction.as_ref().map(preview_height).unwrap_or(0);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(preview), Constraint::Min(6)])
        .split(area);

    if let Some(extraction) = &ctx.state.extraction {
        render_preview(frame, chunks[0], extraction, ctx.theme);
    }

    let title = if ctx.state.report_ready() {
        " Step 5: Actionable Report Generated ✓ "
    } else {
        " Step 5: Generating Report "
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(if ctx.state.report_ready() {
            ctx.theme.success
        } else {
            ctx.theme.focused
        });
    let inner = block.inner(chunks[1]);
    frame.render_widget(block, chunks[1]);

    if let Some(report) = &ctx.state.report {
        render_report(frame, inner, report, ctx);
    } else if let Some(failure) = &ctx.state.failure {
        render_failure(frame, inner, failure, ctx.theme);
    } else {
        render_busy(frame, inner, "Generating your report...", ctx);
    }
}

fn render_report(frame: &mut Frame, area: Rect, report: &Report, ctx: &ScreenContext) {
    let mut lines = vec![
        Line::from(Span::styled(report.title.clone(), ctx.theme.highlight)),
        Line::from(""),
        Line::from(Span::styled("Executive Summary", ctx.theme.title)),
        Line::from(report.summary.clone()),
        Line::from(""),
        Line::from(Span::styled("Key Metrics", ctx.theme.title)),
    ];
    for metric in &report.metrics {
        lines.push(Line::from(vec![
            Span::raw(format!("  • {}: ", metric.label)),
            Span::styled(metric.value.clone(), ctx.theme.success),
        ]));
    }

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), area);
}

pub fn help_line(ctx: &ScreenContext) -> Line<'static> {
    let mut spans = Vec::new();
    if ctx.state.report_ready() {
        spans.extend(key_hint("d", "Download Full Report"));
        spans.extend(key_hint("x", "Download Excel"));
    } else if ctx.state.is_busy() {
        spans.extend(key_hint("Esc", "Cancel"));
    } else if ctx.state.can_retry() {
        spans.extend(key_hint("r", "Retry"));
    }
    spans.extend(key_hint("q", "Quit"));
    Line::from(spans)
}
