use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use keepwatch_lib::stopwatch::to_hms;
use signal_hook::consts::{SIGHUP, SIGTERM};

/// User intents routed into the stopwatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    ToggleRun,
    Reset,
    /// Ask the window to close.
    Close,
}

pub struct StatusSnapshot {
    pub hours: String,
    pub minutes: String,
    pub seconds: String,
    pub text: String,
    pub running: bool,
}

pub fn status_snapshot(elapsed_ms: u64, running: bool, storage: &str) -> StatusSnapshot {
    let hms = to_hms(elapsed_ms);
    let state = if running { "▶ Running" } else { "⏸ Paused" };
    StatusSnapshot {
        hours: format!("{:02}", hms.hours),
        minutes: format!("{:02}", hms.minutes),
        seconds: format!("{:02}", hms.seconds),
        text: format!("{}   {}   ({} ms)\n{}", state, hms, elapsed_ms, storage),
        running,
    }
}

/// Set when the terminal hangs up or the process is asked to terminate.
#[derive(Clone)]
pub struct CloseSignal {
    requested: Arc<AtomicBool>,
}

impl CloseSignal {
    /// Route SIGHUP and SIGTERM into a close request instead of killing the
    /// process.
    pub fn register() -> io::Result<Self> {
        let signal = Self::unregistered();
        for sig in [SIGHUP, SIGTERM] {
            signal_hook::flag::register(sig, signal.requested.clone())?;
        }
        Ok(signal)
    }

    fn unregistered() -> Self {
        Self {
            requested: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }
}

/// Wait up to `timeout` for input and translate it into an intent.
///
/// A pending close signal wins over any key. Losing the terminal (a poll or
/// read error) is a close request.
pub fn poll_intent(signal: &CloseSignal, timeout: Duration) -> Option<Intent> {
    if signal.is_requested() {
        return Some(Intent::Close);
    }
    let polled = match event::poll(timeout) {
        Ok(true) => event::read().map(Some),
        Ok(false) => Ok(None),
        Err(err) => Err(err),
    };
    resolve_intent(signal.is_requested(), polled)
}

fn resolve_intent(signalled: bool, polled: io::Result<Option<Event>>) -> Option<Intent> {
    if signalled {
        return Some(Intent::Close);
    }
    match polled {
        Ok(Some(Event::Key(key))) => map_key(key),
        Ok(_) => None,
        Err(err) if err.kind() == io::ErrorKind::Interrupted => None,
        Err(_) => Some(Intent::Close),
    }
}

pub fn map_key(key: KeyEvent) -> Option<Intent> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match key.code {
        KeyCode::Char(' ') | KeyCode::Enter => Some(Intent::ToggleRun),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(Intent::Close)
        }
        KeyCode::Char('r') | KeyCode::Char('R') => Some(Intent::Reset),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Intent::Close),
        _ => None,
    }
}
