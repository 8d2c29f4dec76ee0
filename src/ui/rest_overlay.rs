use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

use repflow::util::format_countdown;

const POPUP_WIDTH: u16 = 30;
const POPUP_HEIGHT: u16 = 7;

/// Rectangle of at most `width` x `height` centered in `area`
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

pub fn render_rest_overlay(remaining_secs: u64, area: Rect, buf: &mut Buffer) {
    let popup = centered_rect(POPUP_WIDTH, POPUP_HEIGHT, area);
    Clear.render(popup, buf);

    let countdown_style = if remaining_secs <= 5 {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::Yellow)
    }
    .add_modifier(Modifier::BOLD);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(format_countdown(remaining_secs), countdown_style)),
        Line::from(""),
        Line::from(Span::styled(
            "(s)kip  (+/-) adjust",
            Style::default().add_modifier(Modifier::ITALIC),
        )),
    ];

    Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Rest "))
        .alignment(Alignment::Center)
        .render(popup, buf);
}
