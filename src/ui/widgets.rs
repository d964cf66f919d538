use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::config::FormLabels;
use crate::types::verdict::{PredictionOutcome, Verdict};
use crate::ui::theme::Theme;

/// What the output region currently shows
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    /// No prediction requested in this interaction
    Idle,
    Predicted(PredictionOutcome),
    Failed(String),
}

/// Bordered panel with the idle prompt, the verdict or a prediction error.
pub fn output_panel<'a>(output: &'a Output, labels: &'a FormLabels) -> Paragraph<'a> {
    let (lines, style) = match output {
        Output::Idle => (
            vec![Line::from(Span::styled(labels.idle_prompt.as_str(), Theme::info()))],
            Theme::border(),
        ),
        Output::Predicted(outcome) => {
            let style = match outcome.verdict {
                Verdict::Churn => Theme::warn(),
                Verdict::NoChurn => Theme::ok(),
            };
            let scaled = outcome
                .scaled
                .iter()
                .map(|v| format!("{v:.3}"))
                .collect::<Vec<_>>()
                .join(", ");

            (
                vec![
                    Line::from(vec![
                        Span::styled("Predicted Churn: ", Theme::text()),
                        Span::styled(outcome.verdict.answer(), style),
                    ]),
                    Line::from(Span::styled(labels.message(outcome.verdict), style)),
                    Line::from(""),
                    Line::from(Span::styled(
                        format!(
                            "scaled [{scaled}]  at {}",
                            outcome.predicted_at.format("%H:%M:%S UTC")
                        ),
                        Theme::dim(),
                    )),
                ],
                style,
            )
        }
        Output::Failed(reason) => (
            vec![
                Line::from(Span::styled("Prediction failed", Theme::error())),
                Line::from(Span::styled(reason.as_str(), Theme::text())),
            ],
            Theme::error(),
        ),
    };

    Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(style)
                .title(" Prediction ")
                .title_style(Theme::title()),
        )
        .wrap(Wrap { trim: true })
}

/// Key hints laid out as `[key] action` rows.
pub fn render_hints(f: &mut Frame, area: Rect, hints: &[(&str, &str)]) {
    let key_col_width = hints
        .iter()
        .map(|(k, _)| k.len() as u16 + 2)
        .max()
        .unwrap_or(8)
        + 2;

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            hints
                .iter()
                .map(|_| Constraint::Length(1))
                .chain(std::iter::once(Constraint::Min(0)))
                .collect::<Vec<_>>(),
        )
        .split(area);

    for (i, (key, action)) in hints.iter().enumerate() {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(key_col_width), Constraint::Min(0)])
            .split(rows[i]);

        f.render_widget(
            Paragraph::new(Span::styled(format!("[{key}]"), Theme::title())),
            cols[0],
        );
        f.render_widget(Paragraph::new(Span::styled(*action, Theme::dim())), cols[1]);
    }
}

pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vert[1])[1]
}
