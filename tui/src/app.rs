use std::{io, time::Duration};

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Frame, Terminal, backend::CrosstermBackend};

use crate::chart::{ChartData, render};

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

/// Which chart is on screen and whether the user asked to leave.
#[derive(Debug)]
pub struct App {
    data: ChartData,
    selected: usize,
    quit: bool,
}

impl App {
    pub fn new(data: ChartData) -> Self {
        Self {
            data,
            selected: 0,
            quit: false,
        }
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn handle_key(&mut self, key: KeyCode) {
        let count = self.data.lines().len();

        match key {
            KeyCode::Char('q') | KeyCode::Esc => self.quit = true,
            KeyCode::Right | KeyCode::Tab if count > 0 => {
                self.selected = (self.selected + 1) % count;
            }
            KeyCode::Left | KeyCode::BackTab if count > 0 => {
                self.selected = (self.selected + count - 1) % count;
            }
            _ => {}
        }
    }

    pub fn draw(&self, f: &mut Frame) {
        render(f, &self.data, self.selected);
    }
}

/// Runs the chart viewer until the user quits.
///
/// # Errors
/// Returns an error if terminal setup or rendering fails.
pub fn run(mut app: App) -> Result<()> {
    let _guard = TerminalGuard::enter()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    while !app.should_quit() {
        terminal.draw(|f| app.draw(f))?;

        if event::poll(Duration::from_millis(120))? {
            if let Event::Key(k) = event::read()? {
                if k.kind == KeyEventKind::Press {
                    app.handle_key(k.code);
                }
            }
        }
    }

    terminal.show_cursor()?;
    Ok(())
}
