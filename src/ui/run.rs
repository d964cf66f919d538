use std::io;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{debug, warn};

use super::screens::{fatal::FatalState, Action, Screen};
use crate::models::PipelineError;

struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

/// Runs the terminal form until the user quits.
///
/// # Errors
/// Returns an error if terminal setup or rendering fails.
pub fn run(mut screen: Screen<'_>) -> Result<()> {
    let _guard = TerminalGuard::enter()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    loop {
        terminal.draw(|f| screen.draw(f))?;

        if event::poll(Duration::from_millis(120))? {
            if let Event::Key(k) = event::read()? {
                if k.kind != KeyEventKind::Press {
                    continue;
                }
                match screen.handle_key(k) {
                    Action::Quit => break,
                    Action::None => {}
                }
            }
        }
    }

    debug!("Terminal form closed");
    terminal.show_cursor()?;
    Ok(())
}

/// Shows the startup failure on the error screen and hands the failure back
/// to the caller, whether or not the screen could be shown.
pub fn refuse_service<F>(state: FatalState, error: PipelineError, show: F) -> PipelineError
where
    F: FnOnce(Screen<'_>) -> Result<()>,
{
    if let Err(e) = show(Screen::Fatal(state)) {
        warn!(error = %e, "Could not show the error screen");
    }
    error
}
