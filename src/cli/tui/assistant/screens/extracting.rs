use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::Line,
    widgets::{Block, Borders},
};

use super::{key_hint, render_busy, render_document_card, render_failure, render_query_card, ScreenContext};

pub fn render(frame: &mut Frame, area: Rect, ctx: &ScreenContext) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Document
            Constraint::Length(3), // Query
            Constraint::Min(6),    // Processing
        ])
        .split(area);

    if let Some(file) = &ctx.state.file {
        render_document_card(frame, chunks[0], file, ctx.theme);
    }
    render_query_card(frame, chunks[1], &ctx.state.query, ctx.theme);

    let block = Block::default()
        .title(" Step 3: Extracting Data ")
        .borders(Borders::ALL)
        .border_style(ctx.theme.focused);
    let inner = block.inner(chunks[2]);
    frame.render_widget(block, chunks[2]);

    if let Some(failure) = &ctx.state.failure {
        render_failure(frame, inner, failure, ctx.theme);
    } else {
        render_busy(frame, inner, "Analyzing document and extracting requested data...", ctx);
    }
}

pub fn help_line(ctx: &ScreenContext) -> Line<'static> {
    let mut spans = Vec::new();
    if ctx.state.is_busy() {
        spans.extend(key_hint("Esc", "Cancel"));
    } else if ctx.state.can_retry() {
        spans.extend(key_hint("r", "Retry"));
    }
    spans.extend(key_hint("q", "Quit"));
    Line::from(spans)
}
