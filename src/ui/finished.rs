use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use repflow::celebration::Celebration;
use time_humanize::{Accuracy, HumanTime, Tense};

use crate::App;

/// Human readable session length, e.g. "12 minutes and 5 seconds"
pub fn describe_duration(secs: u64) -> String {
    if secs == 0 {
        return "under a second".to_string();
    }
    HumanTime::from(std::time::Duration::from_secs(secs)).to_text_en(Accuracy::Precise, Tense::Present)
}

pub fn render_finished(app: &App, area: Rect, buf: &mut Buffer) {
    let engine = &app.engine;
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let italic_style = Style::default().add_modifier(Modifier::ITALIC);

    let elapsed_secs = engine
        .finished_at()
        .map(|end| (end - engine.started_at()).num_seconds().max(0) as u64)
        .unwrap_or(0);

    let lines = vec![
        Line::from(Span::styled(
            "Session complete",
            bold_style.fg(Color::Green),
        )),
        Line::from(""),
        Line::from(Span::styled(app.plan_title.clone(), bold_style)),
        Line::from(format!(
            "{} exercises, {} sets planned",
            engine.queue().len(),
            engine.queue().total_sets()
        )),
        Line::from(format!("progress {}%", engine.progress_percent())),
        Line::from(format!(
            "started {}, took {}",
            engine.started_at().format("%H:%M"),
            describe_duration(elapsed_secs)
        )),
        Line::from(""),
        Line::from(Span::styled("(r)estart / (esc)ape", italic_style)),
    ];

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(lines.len() as u16),
            Constraint::Fill(1),
        ])
        .split(area);

    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

    if app.celebration.is_active {
        render_confetti(&app.celebration, area, buf);
    }
}

fn render_confetti(celebration: &Celebration, area: Rect, buf: &mut Buffer) {
    let colors = [
        Color::Yellow,
        Color::Magenta,
        Color::Cyan,
        Color::Green,
        Color::Red,
        Color::Blue,
    ];

    for particle in &celebration.particles {
        if particle.x < 0.0 || particle.y < 0.0 {
            continue;
        }
        let (x, y) = (particle.x as u16, particle.y as u16);
        if x >= area.width || y >= area.height {
            continue;
        }

        let color = colors[particle.color_index % colors.len()];
        let fade = 1.0 - particle.age / particle.max_age;
        let style = if fade > 0.5 {
            Style::default().fg(color).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(color).add_modifier(Modifier::DIM)
        };

        if let Some(cell) = buf.cell_mut((area.x + x, area.y + y)) {
            cell.set_char(particle.symbol).set_style(style);
        }
    }

    let banner_width = celebration.banner.chars().count() as u16;
    if banner_width < area.width && area.height > 2 {
        let x = area.x + (area.width - banner_width) / 2;
        buf.set_string(
            x,
            area.y + 1,
            celebration.banner,
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        );
    }
}
