use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::{ui::finished::render_finished, App, AppState};

/// A UI Screen boundary: responsible for rendering the app in one state
pub trait Screen {
    fn render(&self, app: &mut App, f: &mut Frame);
}

/// Active session: checklist, progress and rest overlay
pub struct WorkoutScreen;

impl Screen for WorkoutScreen {
    fn render(&self, app: &mut App, f: &mut Frame) {
        f.render_widget(&*app, f.area());
    }
}

pub struct FinishedScreen;

impl Screen for FinishedScreen {
    fn render(&self, app: &mut App, f: &mut Frame) {
        let area = f.area();
        render_finished(app, area, f.buffer_mut());
    }
}

/// Shown when the selected plan has no exercises
pub struct EmptyScreen;

impl Screen for EmptyScreen {
    fn render(&self, app: &mut App, f: &mut Frame) {
        let text = vec![
            Line::from(Span::styled(
                "No exercises in this plan",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(format!(
                "'{}' was not found or is empty. Try `repflow --list`.",
                app.plan_id
            )),
            Line::from(""),
            Line::from(Span::styled(
                "(esc)ape",
                Style::default().add_modifier(Modifier::ITALIC),
            )),
        ];

        let widget = Paragraph::new(text)
            .block(Block::default().borders(Borders::ALL).title(app.plan_title.as_str()))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        f.render_widget(widget, f.area());
    }
}

/// Helper to construct the appropriate screen for the current state
pub fn current_screen(state: AppState) -> Box<dyn Screen> {
    match state {
        AppState::Workout => Box::new(WorkoutScreen),
        AppState::Finished => Box::new(FinishedScreen),
        AppState::Empty => Box::new(EmptyScreen),
    }
}
