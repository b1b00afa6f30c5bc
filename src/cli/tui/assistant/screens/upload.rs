use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::{key_hint, ScreenContext};

pub fn render(frame: &mut Frame, area: Rect, ctx: &ScreenContext) {
    let block = Block::default()
        .title(" Step 1: Upload Document ")
        .borders(Borders::ALL)
        .border_style(ctx.theme.focused);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Prompt
            Constraint::Length(3), // Path input
            Constraint::Length(1), // Error
            Constraint::Min(0),
        ])
        .split(inner);

    let prompt = vec![
        Line::from("Upload your document (PDF, Word, Image)"),
        Line::from(Span::styled(
            format!("Accepted: {}", ctx.accept_filter),
            ctx.theme.muted,
        )),
    ];
    frame.render_widget(Paragraph::new(prompt), chunks[0]);

    let input = &ctx.view.path_input;
    let input_block = Block::default().title(" Path ").borders(Borders::ALL);
    let input_inner = input_block.inner(chunks[1]);
    let width = input_inner.width.max(1) as usize;
    let scroll = input.visual_scroll(width);
    let paragraph = Paragraph::new(input.value())
        .scroll((0, scroll as u16))
        .block(input_block);
    frame.render_widget(paragraph, chunks[1]);
    frame.set_cursor_position((
        input_inner.x + (input.visual_cursor().max(scroll) - scroll) as u16,
        input_inner.y,
    ));

    if let Some(error) = &ctx.view.error {
        frame.render_widget(
            Paragraph::new(Span::styled(error.clone(), ctx.theme.error)),
            chunks[2],
        );
    }
}

pub fn help_line() -> Line<'static> {
    let mut spans = key_hint("Enter", "Choose file");
    spans.extend(key_hint("Esc", "Quit"));
    Line::from(spans)
}
