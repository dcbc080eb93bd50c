//! Close-request interception with one final save.
//!
//! Closing is a two-phase protocol. [`LifecycleGuard::intercept`] defers the
//! host's close and hands out a [`PendingClose`]; resolving it performs the
//! close-save and, success or failure, tells the host to go ahead. Only one
//! close cycle is honored: requests arriving while a save is in flight, or
//! after the close has resolved, are ignored. Once the guard is disarmed it
//! no longer intercepts and closes pass straight through.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{error, info, warn};

use crate::persistence::{PersistedRecord, PersistenceStore, StoreError};
use crate::stopwatch::StopwatchHandle;

/// Host window whose close has been deferred and can be completed.
pub trait HostWindow {
    /// Perform the actual close.
    fn close(&mut self);
}

/// Where the guard is in its single close cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardPhase {
    /// Waiting for a close request.
    Armed,
    /// A close was deferred and its save has not resolved yet.
    Closing,
    /// The close cycle finished.
    Closed,
    /// Torn down before any close request; no longer intercepting.
    Disarmed,
}

/// Result of a close request.
pub enum Interception {
    /// The close is deferred until the token is resolved.
    Deferred(PendingClose),
    /// A close cycle is already running or finished.
    Ignored,
    /// The guard is disarmed; the host should close without saving.
    PassThrough,
}

/// What happened to a close request handled end to end.
#[derive(Debug)]
pub enum CloseOutcome {
    /// Saved, then closed.
    Saved(PersistedRecord),
    /// The save failed; the window was closed anyway.
    SaveFailed(StoreError),
    Ignored,
    /// Closed without saving because the guard was disarmed.
    PassedThrough,
}

/// Guarantees a final save before the host window closes.
pub struct LifecycleGuard {
    stopwatch: StopwatchHandle,
    store: Arc<dyn PersistenceStore>,
    phase: Arc<Mutex<GuardPhase>>,
}

impl LifecycleGuard {
    pub fn new(stopwatch: StopwatchHandle, store: Arc<dyn PersistenceStore>) -> Self {
        Self {
            stopwatch,
            store,
            phase: Arc::new(Mutex::new(GuardPhase::Armed)),
        }
    }

    pub fn phase(&self) -> GuardPhase {
        *lock_phase(&self.phase)
    }

    /// First phase: defer the close if this is the first request.
    pub fn intercept(&self) -> Interception {
        let mut phase = lock_phase(&self.phase);
        match *phase {
            GuardPhase::Armed => {
                *phase = GuardPhase::Closing;
                info!("Close requested, saving...");
                Interception::Deferred(PendingClose {
                    stopwatch: self.stopwatch.clone(),
                    store: self.store.clone(),
                    phase: self.phase.clone(),
                    resolved: false,
                })
            }
            GuardPhase::Closing | GuardPhase::Closed => {
                warn!("Close already in progress; ignoring request");
                Interception::Ignored
            }
            GuardPhase::Disarmed => Interception::PassThrough,
        }
    }

    /// Intercept, save, then close `window`.
    ///
    /// The window is closed whether or not the save succeeds.
    pub fn handle_close_request(&self, window: &mut dyn HostWindow) -> CloseOutcome {
        match self.intercept() {
            Interception::Deferred(pending) => {
                let result = pending.resolve();
                window.close();
                match result {
                    Ok(record) => CloseOutcome::Saved(record),
                    Err(err) => CloseOutcome::SaveFailed(err),
                }
            }
            Interception::Ignored => CloseOutcome::Ignored,
            Interception::PassThrough => {
                window.close();
                CloseOutcome::PassedThrough
            }
        }
    }

    /// Stop intercepting. Has no effect once a close cycle has begun.
    pub fn disarm(&self) {
        let mut phase = lock_phase(&self.phase);
        if *phase == GuardPhase::Armed {
            *phase = GuardPhase::Disarmed;
        }
    }
}

impl Drop for LifecycleGuard {
    fn drop(&mut self) {
        self.disarm();
    }
}

/// A deferred close holding the right to perform the close-save.
///
/// Dropping it unresolved still completes the cycle, so the guard never
/// stays stuck in [`GuardPhase::Closing`].
pub struct PendingClose {
    stopwatch: StopwatchHandle,
    store: Arc<dyn PersistenceStore>,
    phase: Arc<Mutex<GuardPhase>>,
    resolved: bool,
}

impl PendingClose {
    /// Second phase: save the current elapsed value and release the close.
    pub fn resolve(mut self) -> Result<PersistedRecord, StoreError> {
        let record = self.stopwatch.record();
        let result = match self.store.save(&record) {
            Ok(()) => {
                info!("Saved successfully: {} ms", record.elapsed_ms);
                Ok(record)
            }
            Err(err) => {
                error!("Failed to save on close: {}", err);
                Err(err)
            }
        };
        self.finish();
        result
    }

    fn finish(&mut self) {
        self.resolved = true;
        *lock_phase(&self.phase) = GuardPhase::Closed;
    }
}

impl Drop for PendingClose {
    fn drop(&mut self) {
        if !self.resolved {
            warn!("Close released without saving");
            self.finish();
        }
    }
}

fn lock_phase(phase: &Mutex<GuardPhase>) -> MutexGuard<'_, GuardPhase> {
    phase.lock().unwrap_or_else(PoisonError::into_inner)
}
