use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tracing::{error, info};

use crate::config::FormConfig;
use crate::metrics::SessionMetrics;
use crate::models::ChurnPredictor;
use crate::types::request::{Gender, PredictionRequest};
use crate::ui::theme::Theme;
use crate::ui::widgets::{self, Output};

use super::Action;

const CHARGE_STEP: f64 = 0.5;
const MAX_INPUT_LEN: usize = 10;

/// Controls in tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Age,
    Gender,
    Tenure,
    MonthlyCharge,
    Predict,
}

impl Field {
    const ORDER: [Field; 5] = [
        Field::Age,
        Field::Gender,
        Field::Tenure,
        Field::MonthlyCharge,
        Field::Predict,
    ];

    fn index(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    fn next(self) -> Self {
        Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
    }

    fn prev(self) -> Self {
        Self::ORDER[(self.index() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }

    fn is_numeric(self) -> bool {
        matches!(self, Field::Age | Field::Tenure | Field::MonthlyCharge)
    }
}

/// The churn form: committed values, an optional edit buffer for the
/// focused numeric control, and the output region.
pub struct FormState<'a> {
    config: &'a FormConfig,
    predictor: &'a ChurnPredictor,
    metrics: &'a SessionMetrics,
    focus: Field,
    values: PredictionRequest,
    editing: Option<String>,
    output: Output,
}

impl<'a> FormState<'a> {
    pub fn new(config: &'a FormConfig, predictor: &'a ChurnPredictor, metrics: &'a SessionMetrics) -> Self {
        Self {
            config,
            predictor,
            metrics,
            focus: Field::Age,
            values: config.defaults.request(),
            editing: None,
            output: Output::Idle,
        }
    }

    pub fn focus(&self) -> Field {
        self.focus
    }

    /// Committed control values as a request
    pub fn request(&self) -> PredictionRequest {
        self.values
    }

    pub fn output(&self) -> &Output {
        &self.output
    }

    /// Run the loaded pipeline on the current values.
    pub fn submit(&mut self) {
        self.commit_edit();
        let request = self.values;
        debug_assert!(self.config.bounds.contains(&request));
        let started = Instant::now();

        match self.predictor.predict(&request) {
            Ok(outcome) => {
                let elapsed = started.elapsed();
                self.metrics.record_prediction(elapsed, outcome.verdict);
                info!(
                    age = request.age,
                    gender = %request.gender,
                    tenure = request.tenure,
                    monthly_charge = request.monthly_charge,
                    churn = outcome.verdict.answer(),
                    elapsed_us = elapsed.as_micros() as u64,
                    "Prediction served"
                );
                self.output = Output::Predicted(outcome);
            }
            Err(e) => {
                self.metrics.record_failure();
                error!(error = %e, "Prediction failed");
                self.output = Output::Failed(e.to_string());
            }
        }
    }

    /// A committed change to the inputs starts a new interaction. The edit
    /// buffer alone does not.
    fn touch(&mut self) {
        self.output = Output::Idle;
    }

    fn set_values(&mut self, values: PredictionRequest) {
        if values != self.values {
            self.values = values;
            self.touch();
        }
    }

    /// Parse the edit buffer into the focused control, clamped into bounds.
    /// Unparseable input leaves the previous value in place.
    fn commit_edit(&mut self) {
        let Some(buffer) = self.editing.take() else {
            return;
        };
        let bounds = &self.config.bounds;
        let mut values = self.values;

        match self.focus {
            Field::Age => {
                if let Some(v) = parse_count(&buffer) {
                    values.age = bounds.age.clamp(v);
                }
            }
            Field::Tenure => {
                if let Some(v) = parse_count(&buffer) {
                    values.tenure = bounds.tenure.clamp(v);
                }
            }
            Field::MonthlyCharge => {
                if let Some(v) = buffer.parse::<f64>().ok().filter(|v| v.is_finite()) {
                    values.monthly_charge = bounds.monthly_charge.clamp(v);
                }
            }
            Field::Gender | Field::Predict => {}
        }

        self.set_values(values);
    }

    fn step(&mut self, up: bool) {
        self.commit_edit();
        let bounds = &self.config.bounds;
        let mut values = self.values;

        match self.focus {
            Field::Age => values.age = bounds.age.clamp(step_count(values.age, up)),
            Field::Tenure => values.tenure = bounds.tenure.clamp(step_count(values.tenure, up)),
            Field::MonthlyCharge => {
                let delta = if up { CHARGE_STEP } else { -CHARGE_STEP };
                let stepped = ((values.monthly_charge + delta) * 100.0).round() / 100.0;
                values.monthly_charge = bounds.monthly_charge.clamp(stepped);
            }
            Field::Gender => values.gender = values.gender.toggled(),
            Field::Predict => {}
        }

        self.set_values(values);
    }

    fn set_gender(&mut self, gender: Gender) {
        let mut values = self.values;
        values.gender = gender;
        self.set_values(values);
    }

    fn type_char(&mut self, c: char) {
        let accepts = c.is_ascii_digit() || (c == '.' && self.focus == Field::MonthlyCharge);
        if !accepts {
            return;
        }

        let buffer = self.editing.get_or_insert_with(String::new);
        if (c == '.' && buffer.contains('.')) || buffer.len() >= MAX_INPUT_LEN {
            return;
        }
        buffer.push(c);
    }

    fn backspace(&mut self) {
        let current = self.display_value(self.focus);
        let buffer = self.editing.get_or_insert(current);
        buffer.pop();
    }

    fn move_focus(&mut self, forward: bool) {
        self.commit_edit();
        self.focus = if forward { self.focus.next() } else { self.focus.prev() };
    }

    fn display_value(&self, field: Field) -> String {
        match field {
            Field::Age => self.values.age.to_string(),
            Field::Gender => self.values.gender.to_string(),
            Field::Tenure => self.values.tenure.to_string(),
            Field::MonthlyCharge => format!("{:.2}", self.values.monthly_charge),
            Field::Predict => String::new(),
        }
    }
}

fn parse_count(buffer: &str) -> Option<u32> {
    let v = buffer.parse::<u64>().ok()?;
    Some(u32::try_from(v).unwrap_or(u32::MAX))
}

fn step_count(value: u32, up: bool) -> u32 {
    if up {
        value.saturating_add(1)
    } else {
        value.saturating_sub(1)
    }
}

pub fn handle_key(state: &mut FormState, key: KeyEvent) -> Action {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('p') => {
                state.submit();
                Action::None
            }
            KeyCode::Char('c') => Action::Quit,
            _ => Action::None,
        };
    }

    match key.code {
        KeyCode::Esc => {
            if state.editing.take().is_some() {
                Action::None
            } else {
                Action::Quit
            }
        }
        KeyCode::Tab | KeyCode::Down => {
            state.move_focus(true);
            Action::None
        }
        KeyCode::BackTab | KeyCode::Up => {
            state.move_focus(false);
            Action::None
        }
        KeyCode::Right => {
            state.step(true);
            Action::None
        }
        KeyCode::Left => {
            state.step(false);
            Action::None
        }
        KeyCode::Enter => {
            if state.focus == Field::Predict {
                state.submit();
            } else {
                state.move_focus(true);
            }
            Action::None
        }
        KeyCode::Backspace if state.focus.is_numeric() => {
            state.backspace();
            Action::None
        }
        KeyCode::Char('q') if state.editing.is_none() => Action::Quit,
        KeyCode::Char(' ') if state.focus == Field::Gender => {
            state.step(true);
            Action::None
        }
        KeyCode::Char('m') if state.focus == Field::Gender => {
            state.set_gender(Gender::Male);
            Action::None
        }
        KeyCode::Char('f') if state.focus == Field::Gender => {
            state.set_gender(Gender::Female);
            Action::None
        }
        KeyCode::Char(c) if state.focus.is_numeric() => {
            state.type_char(c);
            Action::None
        }
        _ => Action::None,
    }
}

pub fn draw(f: &mut Frame, state: &FormState) {
    let area = widgets::centered_rect(70, 95, f.size());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // title
            Constraint::Length(2), // instructions
            Constraint::Length(9), // controls
            Constraint::Min(6),    // output
            Constraint::Length(4), // keybinds
        ])
        .split(area);

    let header = vec![
        Line::from(Span::styled(state.config.title.as_str(), Theme::title())),
        Line::from(Span::styled(
            format!(
                "{}  |  {}",
                state.predictor.scaler_description(),
                state.predictor.classifier_description()
            ),
            Theme::dim(),
        )),
    ];
    f.render_widget(Paragraph::new(header), chunks[0]);

    f.render_widget(
        Paragraph::new(Span::styled(
            "Please enter the values and hit the predict button for getting a prediction.",
            Theme::text(),
        )),
        chunks[1],
    );

    let bounds = &state.config.bounds;
    let rows = [
        (Field::Age, "Enter age".to_string(), format!("{}-{}", bounds.age.min, bounds.age.max)),
        (Field::Gender, "Enter the Gender".to_string(), "Male / Female".to_string()),
        (
            Field::Tenure,
            "Enter Tenure".to_string(),
            format!("{}-{} months", bounds.tenure.min, bounds.tenure.max),
        ),
        (
            Field::MonthlyCharge,
            "Enter Monthly Charge".to_string(),
            format!(
                "{:.2}-{:.2}",
                bounds.monthly_charge.min, bounds.monthly_charge.max
            ),
        ),
    ];

    let mut lines = Vec::with_capacity(rows.len() * 2 + 1);
    for (field, label, range) in rows {
        let focused = state.focus == field;
        let value = match (&state.editing, focused) {
            (Some(buffer), true) => format!("{buffer}█"),
            _ => state.display_value(field),
        };
        let value_style = if focused { Theme::focused() } else { Theme::text() };

        lines.push(Line::from(vec![
            Span::styled(format!("{label:<22}"), Theme::text()),
            Span::styled(format!(" {value:<12}"), value_style),
            Span::styled(format!("  ({range})"), Theme::dim()),
        ]));
        lines.push(Line::from(""));
    }
    let button_style = if state.focus == Field::Predict {
        Theme::focused()
    } else {
        Theme::title()
    };
    lines.push(Line::from(Span::styled(" Predict! ", button_style)));

    f.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Theme::border()),
        ),
        chunks[2],
    );

    f.render_widget(
        widgets::output_panel(&state.output, &state.config.labels),
        chunks[3],
    );

    widgets::render_hints(
        f,
        chunks[4],
        &[
            ("tab / arrows", "move, step values"),
            ("enter / ctrl+p", "predict"),
            ("q / esc", "quit"),
        ],
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LinearClassifier, LinearScaler};
    use crate::types::verdict::Verdict;

    /// Identity scaling, churn when tenure is below 12 months
    fn predictor() -> ChurnPredictor {
        let scaler = LinearScaler::Standard {
            mean: vec![0.0; 4],
            scale: vec![1.0; 4],
        };
        let model = LinearClassifier::LogisticRegression {
            coefficients: vec![0.0, 0.0, -1.0, 0.0],
            intercept: 11.5,
            classes: [0, 1],
        };
        ChurnPredictor::from_parts(Box::new(scaler), Box::new(model))
    }

    fn press(state: &mut FormState, code: KeyCode) -> Action {
        handle_key(state, KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_str(state: &mut FormState, s: &str) {
        for c in s.chars() {
            press(state, KeyCode::Char(c));
        }
    }

    fn verdict(state: &FormState) -> Option<Verdict> {
        match state.output() {
            Output::Predicted(outcome) => Some(outcome.verdict),
            _ => None,
        }
    }

    #[test]
    fn test_starts_idle_with_defaults() {
        let config = FormConfig::default();
        let predictor = predictor();
        let metrics = SessionMetrics::new();
        let state = FormState::new(&config, &predictor, &metrics);

        assert_eq!(state.output(), &Output::Idle);
        assert_eq!(state.request(), config.defaults.request());
        assert_eq!(state.focus(), Field::Age);
    }

    #[test]
    fn test_submit_shows_verdict() {
        let config = FormConfig::default();
        let predictor = predictor();
        let metrics = SessionMetrics::new();
        let mut state = FormState::new(&config, &predictor, &metrics);

        // default tenure is 10 months
        handle_key(&mut state, KeyEvent::new(KeyCode::Char('p'), KeyModifiers::CONTROL));

        assert_eq!(verdict(&state), Some(Verdict::Churn));
        assert_eq!(metrics.churn.load(std::sync::atomic::Ordering::Relaxed), 1);
    }

    #[test]
    fn test_typing_commits_clamped_values() {
        let config = FormConfig::default();
        let predictor = predictor();
        let metrics = SessionMetrics::new();
        let mut state = FormState::new(&config, &predictor, &metrics);

        press(&mut state, KeyCode::Backspace);
        press(&mut state, KeyCode::Backspace);
        type_str(&mut state, "250");
        press(&mut state, KeyCode::Enter);
        assert_eq!(state.request().age, 100);
        assert_eq!(state.focus(), Field::Gender);

        press(&mut state, KeyCode::Char('f'));
        assert_eq!(state.request().gender, Gender::Female);

        press(&mut state, KeyCode::Tab);
        type_str(&mut state, "24");
        press(&mut state, KeyCode::Tab);
        assert_eq!(state.request().tenure, 24);

        type_str(&mut state, "5.5");
        press(&mut state, KeyCode::Enter);
        assert_eq!(state.request().monthly_charge, 30.0);
        assert_eq!(state.focus(), Field::Predict);

        press(&mut state, KeyCode::Enter);
        assert_eq!(verdict(&state), Some(Verdict::NoChurn));
    }

    #[test]
    fn test_editing_resets_to_idle() {
        let config = FormConfig::default();
        let predictor = predictor();
        let metrics = SessionMetrics::new();
        let mut state = FormState::new(&config, &predictor, &metrics);

        state.submit();
        assert!(verdict(&state).is_some());

        press(&mut state, KeyCode::Right);
        assert_eq!(state.request().age, 31);
        assert_eq!(state.output(), &Output::Idle);
    }

    #[test]
    fn test_moving_focus_keeps_verdict() {
        let config = FormConfig::default();
        let predictor = predictor();
        let metrics = SessionMetrics::new();
        let mut state = FormState::new(&config, &predictor, &metrics);

        state.submit();
        press(&mut state, KeyCode::Tab);
        press(&mut state, KeyCode::Up);
        assert!(verdict(&state).is_some());
    }

    #[test]
    fn test_steps_respect_bounds() {
        let mut config = FormConfig::default();
        config.defaults.monthly_charge = 149.75;
        config.defaults.tenure = 0;
        let predictor = predictor();
        let metrics = SessionMetrics::new();
        let mut state = FormState::new(&config, &predictor, &metrics);

        press(&mut state, KeyCode::Tab);
        press(&mut state, KeyCode::Left);
        assert_eq!(state.request().gender, Gender::Female);

        press(&mut state, KeyCode::Tab);
        press(&mut state, KeyCode::Left);
        assert_eq!(state.request().tenure, 0);

        press(&mut state, KeyCode::Tab);
        press(&mut state, KeyCode::Right);
        assert_eq!(state.request().monthly_charge, 150.0);
        press(&mut state, KeyCode::Right);
        assert_eq!(state.request().monthly_charge, 150.0);
    }

    #[test]
    fn test_invalid_input_keeps_previous_value() {
        let config = FormConfig::default();
        let predictor = predictor();
        let metrics = SessionMetrics::new();
        let mut state = FormState::new(&config, &predictor, &metrics);

        press(&mut state, KeyCode::Tab);
        press(&mut state, KeyCode::Tab);
        press(&mut state, KeyCode::Tab);
        // '.' alone is not a number
        type_str(&mut state, "..");
        press(&mut state, KeyCode::Tab);
        assert_eq!(state.request().monthly_charge, 50.0);

        // letters are ignored on numeric controls
        press(&mut state, KeyCode::BackTab);
        press(&mut state, KeyCode::BackTab);
        type_str(&mut state, "x");
        press(&mut state, KeyCode::Tab);
        assert_eq!(state.request().tenure, 10);
    }

    #[test]
    fn test_quit_and_cancel() {
        let config = FormConfig::default();
        let predictor = predictor();
        let metrics = SessionMetrics::new();
        let mut state = FormState::new(&config, &predictor, &metrics);

        type_str(&mut state, "4");
        assert!(matches!(press(&mut state, KeyCode::Esc), Action::None));
        assert_eq!(state.request().age, 30);

        assert!(matches!(press(&mut state, KeyCode::Char('q')), Action::Quit));
        assert!(matches!(press(&mut state, KeyCode::Esc), Action::Quit));
    }

    #[test]
    fn test_cancelled_edit_keeps_verdict() {
        let config = FormConfig::default();
        let predictor = predictor();
        let metrics = SessionMetrics::new();
        let mut state = FormState::new(&config, &predictor, &metrics);

        state.submit();
        let shown = verdict(&state);
        assert!(shown.is_some());

        type_str(&mut state, "4");
        press(&mut state, KeyCode::Backspace);
        assert_eq!(verdict(&state), shown);
        press(&mut state, KeyCode::Esc);
        assert_eq!(verdict(&state), shown);

        // retyping the same value is not a change either
        press(&mut state, KeyCode::Backspace);
        press(&mut state, KeyCode::Backspace);
        type_str(&mut state, "30");
        press(&mut state, KeyCode::Enter);
        assert_eq!(state.request().age, 30);
        assert_eq!(verdict(&state), shown);
    }

    #[test]
    fn test_values_never_leave_bounds() {
        let mut config = FormConfig::default();
        config.bounds.age = crate::config::Bounds::new(18, 90);
        config.bounds.tenure = crate::config::Bounds::new(0, 72);
        config.bounds.monthly_charge = crate::config::Bounds::new(10.0, 200.0);
        let predictor = predictor();
        let metrics = SessionMetrics::new();
        let mut state = FormState::new(&config, &predictor, &metrics);

        let keys = [
            KeyCode::Char('9'),
            KeyCode::Char('9'),
            KeyCode::Char('9'),
            KeyCode::Tab,
            KeyCode::Right,
            KeyCode::Tab,
            KeyCode::Char('0'),
            KeyCode::Left,
            KeyCode::Tab,
            KeyCode::Char('5'),
            KeyCode::Char('.'),
            KeyCode::Char('5'),
            KeyCode::Left,
            KeyCode::BackTab,
            KeyCode::Char('8'),
            KeyCode::Char('0'),
            KeyCode::Enter,
        ];
        for key in keys {
            press(&mut state, key);
            assert!(config.bounds.contains(&state.request()), "{:?}", state.request());
        }
        assert_eq!(state.request().age, 90);
        assert_eq!(state.request().tenure, 72);
        assert_eq!(state.request().monthly_charge, 10.0);
    }

    #[test]
    fn test_identical_inputs_identical_verdicts() {
        let config = FormConfig::default();
        let predictor = predictor();
        let metrics = SessionMetrics::new();
        let mut state = FormState::new(&config, &predictor, &metrics);

        state.submit();
        let first = verdict(&state);

        // another interaction in between
        press(&mut state, KeyCode::Tab);
        press(&mut state, KeyCode::Tab);
        type_str(&mut state, "60");
        state.submit();
        assert_eq!(verdict(&state), Some(Verdict::NoChurn));

        press(&mut state, KeyCode::Backspace);
        press(&mut state, KeyCode::Backspace);
        type_str(&mut state, "10");
        state.submit();
        assert_eq!(verdict(&state), first);
    }
}
