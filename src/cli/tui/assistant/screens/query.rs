use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::{key_hint, render_document_card, ScreenContext};

pub fn render(frame: &mut Frame, area: Rect, ctx: &ScreenContext) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Document
            Constraint::Min(5),    // Query
            Constraint::Length(1), // Status
            Constraint::Length(1), // Error
        ])
        .split(area);

    if let Some(file) = &ctx.state.file {
        render_document_card(frame, chunks[0], file, ctx.theme);
    }

    let input = &ctx.view.query_input;
    let block = Block::default()
        .title(" Step 2: What data do you want to extract? ")
        .borders(Borders::ALL)
        .border_style(ctx.theme.focused);
    let inner = block.inner(chunks[1]);

    let text = if input.value().is_empty() {
        Line::from(Span::styled(
            "e.g., Extract all company names, revenue figures, and dates from this document",
            ctx.theme.muted,
        ))
    } else {
        Line::from(input.value().to_string())
    };
    frame.render_widget(
        Paragraph::new(text).wrap(Wrap { trim: false }).block(block),
        chunks[1],
    );

    // Cursor on the wrapped text
    let width = inner.width.max(1) as usize;
    let cursor = input.visual_cursor();
    let row = (cursor / width) as u16;
    if row < inner.height {
        frame.set_cursor_position((inner.x + (cursor % width) as u16, inner.y + row));
    }

    let status = if ctx.state.can_submit_query() {
        Line::from(vec![
            Span::raw("Press "),
            Span::styled("Enter", ctx.theme.highlight),
            Span::raw(" to extract data"),
        ])
    } else {
        Line::from(Span::styled(
            "Describe what to extract to enable extraction",
            ctx.theme.muted,
        ))
    };
    frame.render_widget(Paragraph::new(status), chunks[2]);

    if let Some(error) = &ctx.view.error {
        frame.render_widget(
            Paragraph::new(Span::styled(error.clone(), ctx.theme.error)),
            chunks[3],
        );
    }
}

pub fn help_line(ctx: &ScreenContext) -> Line<'static> {
    let mut spans = Vec::new();
    if ctx.state.can_submit_query() {
        spans.extend(key_hint("Enter", "Extract Data"));
    }
    spans.extend(key_hint("Esc", "Quit"));
    Line::from(spans)
}
