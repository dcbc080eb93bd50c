//! Running/paused state machine for accumulated elapsed time.
//!
//! The stopwatch stores only the committed milliseconds and, while running,
//! the clock reading at which the open run segment began. The effective
//! elapsed value is derived on demand, so reading it never mutates state.

mod handle;
mod hms;

use std::sync::Arc;
use std::time::Instant;

use log::debug;

use crate::clock::Clock;

pub use handle::StopwatchHandle;
pub use hms::{to_hms, Hms};

/// Whether the stopwatch is accumulating time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    /// Running since `anchor`.
    Running { anchor: Instant },
}

/// Snapshot of the stopwatch's owned state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StopwatchState {
    /// Milliseconds committed by closed run segments.
    pub elapsed_ms: u64,
    pub run: RunState,
}

impl StopwatchState {
    pub fn is_running(&self) -> bool {
        matches!(self.run, RunState::Running { .. })
    }

    /// Clock reading at which the open run segment began, if any.
    pub fn anchor(&self) -> Option<Instant> {
        match self.run {
            RunState::Running { anchor } => Some(anchor),
            RunState::Idle => None,
        }
    }
}

/// Elapsed-time tracker driven by start/pause/reset intents.
pub struct Stopwatch {
    clock: Arc<dyn Clock>,
    state: StopwatchState,
}

impl Stopwatch {
    /// Create an idle stopwatch at zero.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_elapsed(clock, 0)
    }

    /// Create an idle stopwatch holding previously accumulated time.
    pub fn with_elapsed(clock: Arc<dyn Clock>, elapsed_ms: u64) -> Self {
        Self {
            clock,
            state: StopwatchState {
                elapsed_ms,
                run: RunState::Idle,
            },
        }
    }

    /// Begin a run segment. No-op while already running.
    pub fn start(&mut self) {
        if self.state.is_running() {
            return;
        }
        self.state.run = RunState::Running {
            anchor: self.clock.now(),
        };
        debug!("stopwatch started at {} ms", self.state.elapsed_ms);
    }

    /// Close the open run segment and commit its length. No-op while idle.
    pub fn pause(&mut self) {
        let RunState::Running { anchor } = self.state.run else {
            return;
        };
        let segment = segment_ms(anchor, self.clock.now());
        self.state.elapsed_ms = self.state.elapsed_ms.saturating_add(segment);
        self.state.run = RunState::Idle;
        debug!("stopwatch paused at {} ms", self.state.elapsed_ms);
    }

    /// Stop and zero the stopwatch, whatever its prior state.
    pub fn reset(&mut self) {
        self.state = StopwatchState {
            elapsed_ms: 0,
            run: RunState::Idle,
        };
        debug!("stopwatch reset");
    }

    /// Start when idle, pause when running. Returns the new running flag.
    pub fn toggle_run(&mut self) -> bool {
        if self.state.is_running() {
            self.pause();
        } else {
            self.start();
        }
        self.state.is_running()
    }

    /// Effective elapsed milliseconds, including the open segment.
    pub fn current_elapsed_ms(&self) -> u64 {
        match self.state.run {
            RunState::Idle => self.state.elapsed_ms,
            RunState::Running { anchor } => self
                .state
                .elapsed_ms
                .saturating_add(segment_ms(anchor, self.clock.now())),
        }
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    pub fn state(&self) -> StopwatchState {
        self.state
    }
}

fn segment_ms(anchor: Instant, now: Instant) -> u64 {
    let millis = now.saturating_duration_since(anchor).as_millis();
    u64::try_from(millis).unwrap_or(u64::MAX)
}
