pub mod finished;
pub mod rest_overlay;
pub mod screen;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Widget, Wrap},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};
use webbrowser::Browser;

use crate::App;

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;

/// Cut `text` to at most `max` terminal columns, marking the cut with an ellipsis
pub fn truncate_to_width(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

/// Workout screen: progress header, current exercise, set checklist
impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let engine = &self.engine;
        let Some(exercise) = engine.current_exercise() else {
            return;
        };

        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let dim_style = Style::default().add_modifier(Modifier::DIM);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);
        let done_style = Style::default().patch(bold_style).fg(Color::Green);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(3), // progress
                Constraint::Length(4), // exercise card
                Constraint::Min(1),    // set checklist
                Constraint::Length(1), // up next / rest notice
                Constraint::Length(1), // legend
            ])
            .split(area);

        let total = engine.queue().len();
        let progress = engine.progress_percent();
        let gauge = Gauge::default()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(Span::styled(self.plan_title.clone(), bold_style)),
            )
            .gauge_style(Style::default().fg(Color::Magenta))
            .percent(progress as u16)
            .label(format!(
                "exercise {}/{}  {}%",
                engine.cursor() + 1,
                total,
                progress
            ));
        gauge.render(chunks[0], buf);

        let width = chunks[1].width as usize;
        let mut card = vec![
            Line::from(Span::styled(
                truncate_to_width(&exercise.name, width),
                bold_style.fg(Color::Cyan),
            )),
            Line::from(Span::styled(
                truncate_to_width(&exercise.muscle_group, width),
                italic_style,
            )),
            Line::from(format!(
                "{} sets x {} reps",
                exercise.target_sets, exercise.target_reps
            )),
        ];
        if exercise.media.is_some() && Browser::is_available() {
            card.push(Line::from(Span::styled("(m) watch demonstration", dim_style)));
        }
        Paragraph::new(card)
            .alignment(Alignment::Center)
            .render(chunks[1], buf);

        let checklist: Vec<Line> = engine
            .set_vector()
            .iter()
            .enumerate()
            .map(|(i, done)| {
                if *done {
                    Line::from(Span::styled(format!("[x] set {}", i + 1), done_style))
                } else {
                    Line::from(Span::styled(format!("[ ] set {}", i + 1), dim_style))
                }
            })
            .collect();
        Paragraph::new(checklist)
            .alignment(Alignment::Center)
            .render(chunks[2], buf);

        let footer = if self.rest_over {
            Span::styled(
                "Rest over, next set!",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )
        } else {
            match engine.next_exercise() {
                Some(next) => Span::styled(format!("up next: {}", next.name), italic_style),
                None => Span::styled("last exercise", italic_style),
            }
        };
        Paragraph::new(footer)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(chunks[3], buf);

        Paragraph::new(Span::styled(
            "(1-9) set / (n)ext / (s)kip rest / (+/-) rest / (r)estart / (esc)ape",
            italic_style,
        ))
        .render(chunks[4], buf);

        if let Some(remaining) = engine.rest_timer().remaining_secs() {
            rest_overlay::render_rest_overlay(remaining, area, buf);
        }
    }
}
