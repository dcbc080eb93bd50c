use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::persistence::PersistedRecord;

use super::{Stopwatch, StopwatchState};

/// Shared handle to a single [`Stopwatch`].
///
/// The presentation loop drives intents through it while the autosave task
/// and the close guard only sample the elapsed value.
#[derive(Clone)]
pub struct StopwatchHandle {
    inner: Arc<Mutex<Stopwatch>>,
}

impl StopwatchHandle {
    pub fn new(stopwatch: Stopwatch) -> Self {
        Self {
            inner: Arc::new(Mutex::new(stopwatch)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Stopwatch> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn start(&self) {
        self.lock().start();
    }

    pub fn pause(&self) {
        self.lock().pause();
    }

    pub fn reset(&self) {
        self.lock().reset();
    }

    pub fn toggle_run(&self) -> bool {
        self.lock().toggle_run()
    }

    pub fn current_elapsed_ms(&self) -> u64 {
        self.lock().current_elapsed_ms()
    }

    pub fn is_running(&self) -> bool {
        self.lock().is_running()
    }

    pub fn state(&self) -> StopwatchState {
        self.lock().state()
    }

    /// Record of the elapsed value as of this call.
    pub fn record(&self) -> PersistedRecord {
        PersistedRecord::new(self.current_elapsed_ms())
    }
}
