//! Modal overlay system for the TUI

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Flex, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};

use crate::wizard::Notice;

/// Area of `percent_x` by `percent_y` of `area`, centered in it
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let [row] = Layout::vertical([Constraint::Percentage(percent_y)])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Percentage(percent_x)])
        .flex(Flex::Center)
        .areas(row);
    cell
}

/// Render a notice in a centered box over the current screen
pub fn render_notice_modal(frame: &mut Frame, area: Rect, notice: &Notice) {
    let modal_area = centered_rect(50, 30, area);

    // Clear the area to create overlay effect
    frame.render_widget(Clear, modal_area);

    let modal_block = Block::default()
        .title(format!(" {} ", notice.title))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Cyan));

    let inner_area = modal_block.inner(modal_area);
    frame.render_widget(modal_block, modal_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),      // Spacing
            Constraint::Min(1),         // Message
            Constraint::Length(1),      // Help text
        ])
        .split(inner_area);

    let message = Paragraph::new(notice.message.as_str())
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(Color::White));
    frame.render_widget(message, chunks[1]);

    let help_text = Line::from(vec![
        Span::styled("[any key]", Style::default().fg(Color::Cyan)),
        Span::raw(" Close"),
    ]);
    let help = Paragraph::new(help_text)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, chunks[2]);
}
