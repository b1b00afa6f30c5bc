use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
};

use super::super::theme::Theme;
use super::{key_hint, ScreenContext};
use crate::wizard::ExtractionResult;

/// Height needed to show the whole preview card
pub fn preview_height(extraction: &ExtractionResult) -> u16 {
    // Borders, counts, spacing, header and its margin
    extraction.preview_rows.len() as u16 + 6
}

pub fn render(frame: &mut Frame, area: Rect, ctx: &ScreenContext) {
    let Some(extraction) = &ctx.state.extraction else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(preview_height(extraction)),
            Constraint::Length(2),
            Constraint::Min(0),
        ])
        .split(area);

    render_preview(frame, chunks[0], extraction, ctx.theme);

    let actions = Paragraph::new(vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("[d] ", ctx.theme.highlight),
            Span::raw("Download Excel    "),
            Span::styled("[g] ", ctx.theme.highlight),
            Span::raw("Generate Report"),
        ]),
    ]);
    frame.render_widget(actions, chunks[1]);
}

/// Counts plus the preview table
pub fn render_preview(frame: &mut Frame, area: Rect, extraction: &ExtractionResult, theme: &Theme) {
    let block = Block::default()
        .title(" Step 4: Extracted Data Preview ✓ ")
        .borders(Borders::ALL)
        .border_style(theme.success);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Counts
            Constraint::Length(1), // Spacing
            Constraint::Min(0),    // Table
        ])
        .split(inner);

    let counts = Line::from(vec![
        Span::styled("Rows: ", theme.muted),
        Span::styled(extraction.row_count.to_string(), theme.title),
        Span::raw("    "),
        Span::styled("Columns: ", theme.muted),
        Span::styled(extraction.column_count().to_string(), theme.title),
    ]);
    frame.render_widget(Paragraph::new(counts), chunks[0]);

    let header = Row::new(
        extraction
            .columns
            .iter()
            .map(|c| Cell::from(c.clone()).style(theme.title.add_modifier(Modifier::UNDERLINED))),
    )
    .bottom_margin(1);

    let rows = extraction
        .preview_rows
        .iter()
        .map(|row| Row::new(row.iter().map(|cell| Cell::from(cell.clone()))));

    let widths = vec![Constraint::Fill(1); extraction.column_count()];
    let table = Table::new(rows, widths).header(header).column_spacing(2);
    frame.render_widget(table, chunks[2]);
}

pub fn help_line() -> Line<'static> {
    let mut spans = key_hint("d", "Download Excel");
    spans.extend(key_hint("g", "Generate Report"));
    spans.extend(key_hint("q", "Quit"));
    Line::from(spans)
}
