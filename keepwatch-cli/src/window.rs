//! The terminal acting as the stopwatch's host window.

use std::io::{self, Stdout};

use crossterm::{
    cursor, execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use keepwatch_lib::lifecycle::HostWindow;
use ratatui::{backend::CrosstermBackend, Terminal};

/// Alternate-screen terminal that stays open until closed through
/// [`HostWindow::close`].
pub struct TerminalWindow {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    open: bool,
    _raw_mode: RawModeGuard,
}

impl TerminalWindow {
    pub fn open() -> io::Result<Self> {
        let raw_mode = RawModeGuard::enable()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, cursor::Hide)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self {
            terminal,
            open: true,
            _raw_mode: raw_mode,
        })
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn terminal_mut(&mut self) -> &mut Terminal<CrosstermBackend<Stdout>> {
        &mut self.terminal
    }

    fn restore(&mut self) {
        let _ = self.terminal.show_cursor();
        let _ = execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            cursor::Show
        );
    }
}

impl HostWindow for TerminalWindow {
    fn close(&mut self) {
        if self.open {
            self.restore();
            self.open = false;
        }
    }
}

impl Drop for TerminalWindow {
    fn drop(&mut self) {
        self.close();
    }
}

struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}
