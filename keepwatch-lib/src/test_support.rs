//! Store doubles shared by unit tests.

use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::persistence::{PersistedRecord, PersistenceStore, StoreError};

fn io_failure() -> StoreError {
    StoreError::Io(io::Error::new(io::ErrorKind::Other, "disk unavailable"))
}

/// Store whose loads and saves always fail.
#[derive(Default)]
pub(crate) struct FailingStore {
    pub(crate) save_attempts: AtomicUsize,
}

impl PersistenceStore for FailingStore {
    fn ensure_ready(&self) -> Result<(), StoreError> {
        Ok(())
    }

    fn load(&self) -> Result<Option<PersistedRecord>, StoreError> {
        Err(io_failure())
    }

    fn save(&self, _record: &PersistedRecord) -> Result<(), StoreError> {
        self.save_attempts.fetch_add(1, Ordering::SeqCst);
        Err(io_failure())
    }
}

/// Store that keeps every saved record in order.
#[derive(Default)]
pub(crate) struct RecordingStore {
    saves: Mutex<Vec<PersistedRecord>>,
    fail_next: AtomicBool,
}

impl RecordingStore {
    pub(crate) fn saves(&self) -> Vec<PersistedRecord> {
        self.saves.lock().unwrap().clone()
    }

    /// Make the next save fail without recording it.
    pub(crate) fn fail_next_save(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }
}

impl PersistenceStore for RecordingStore {
    fn ensure_ready(&self) -> Result<(), StoreError> {
        Ok(())
    }

    fn load(&self) -> Result<Option<PersistedRecord>, StoreError> {
        Ok(self.saves.lock().unwrap().last().copied())
    }

    fn save(&self, record: &PersistedRecord) -> Result<(), StoreError> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(io_failure());
        }
        self.saves.lock().unwrap().push(*record);
        Ok(())
    }
}
