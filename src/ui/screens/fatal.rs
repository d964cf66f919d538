use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    text::Span,
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::ui::theme::Theme;
use crate::ui::widgets;

use super::Action;

/// Startup failed; the form is never shown and nothing can be predicted.
pub struct FatalState {
    title: String,
    reason: String,
}

impl FatalState {
    pub fn new(title: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

pub fn handle_key(_state: &mut FatalState, key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc | KeyCode::Enter => Action::Quit,
        _ => Action::None,
    }
}

pub fn draw(f: &mut Frame, state: &FatalState) {
    let outer = widgets::centered_rect(60, 60, f.size());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // title
            Constraint::Length(2), // subtitle
            Constraint::Min(4),    // reason box
            Constraint::Length(1), // spacer
            Constraint::Length(2), // hints
        ])
        .split(outer);

    f.render_widget(
        Paragraph::new(Span::styled(state.title.as_str(), Theme::title())),
        chunks[0],
    );

    f.render_widget(
        Paragraph::new(Span::styled(
            "The scaler or model could not be loaded. Make sure both artifacts exist at the paths in config/config.toml.",
            Theme::dim(),
        ))
        .wrap(Wrap { trim: true }),
        chunks[1],
    );

    f.render_widget(
        Paragraph::new(state.reason())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Theme::error())
                    .title(" Error ")
                    .title_style(Theme::error()),
            )
            .style(Theme::text())
            .wrap(Wrap { trim: true }),
        chunks[2],
    );

    widgets::render_hints(f, chunks[4], &[("q / esc", "quit")]);
}
