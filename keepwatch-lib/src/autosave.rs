//! Periodic best-effort snapshot of the elapsed value.
//!
//! Every tick samples [`StopwatchHandle::current_elapsed_ms`] and overwrites
//! the persisted record. Ticks never start or stop the stopwatch, and a
//! failed save is only logged: the next tick tries again on its own.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};

use crate::persistence::{PersistedRecord, PersistenceStore, StoreError};
use crate::schedule::PeriodicTask;
use crate::stopwatch::StopwatchHandle;

/// Default time between autosaves.
pub const DEFAULT_AUTOSAVE_INTERVAL: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutosaveConfig {
    pub interval: Duration,
}

impl AutosaveConfig {
    pub fn from_millis(interval_ms: u64) -> Self {
        Self {
            interval: Duration::from_millis(interval_ms),
        }
    }
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_AUTOSAVE_INTERVAL,
        }
    }
}

/// Owns the autosave background task.
pub struct AutosaveScheduler {
    stopwatch: StopwatchHandle,
    store: Arc<dyn PersistenceStore>,
    config: AutosaveConfig,
    task: Option<PeriodicTask>,
}

impl AutosaveScheduler {
    pub fn new(
        stopwatch: StopwatchHandle,
        store: Arc<dyn PersistenceStore>,
        config: AutosaveConfig,
    ) -> Self {
        Self {
            stopwatch,
            store,
            config,
            task: None,
        }
    }

    pub fn config(&self) -> AutosaveConfig {
        self.config
    }

    /// Start the periodic task, replacing any task already running.
    pub fn start(&mut self) -> io::Result<()> {
        self.stop();
        let stopwatch = self.stopwatch.clone();
        let store = self.store.clone();
        let task = PeriodicTask::spawn("keepwatch-autosave", self.config.interval, move || {
            let _ = save_snapshot(&stopwatch, store.as_ref());
        })?;
        info!("Autosave every {} ms", self.config.interval.as_millis());
        self.task = Some(task);
        Ok(())
    }

    /// Cancel the periodic task. No tick runs after this returns.
    pub fn stop(&mut self) {
        if let Some(mut task) = self.task.take() {
            task.cancel();
            debug!("Autosave stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(PeriodicTask::is_active)
    }

    /// Run one autosave tick on the calling thread.
    pub fn save_now(&self) -> Result<PersistedRecord, StoreError> {
        save_snapshot(&self.stopwatch, self.store.as_ref())
    }
}

impl Drop for AutosaveScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

fn save_snapshot(
    stopwatch: &StopwatchHandle,
    store: &dyn PersistenceStore,
) -> Result<PersistedRecord, StoreError> {
    let record = stopwatch.record();
    match store.save(&record) {
        Ok(()) => {
            debug!("Auto-saved: {} ms", record.elapsed_ms);
            Ok(record)
        }
        Err(err) => {
            warn!("Auto-save failed: {}", err);
            Err(err)
        }
    }
}
