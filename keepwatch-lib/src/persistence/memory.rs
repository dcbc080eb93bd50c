use std::sync::{Mutex, PoisonError};

use super::{PersistedRecord, PersistenceStore, StoreError};

/// In-process store; nothing survives the process.
///
/// Used when the data directory is unusable so the stopwatch keeps working
/// in memory-only mode.
#[derive(Debug, Default)]
pub struct MemoryStore {
    record: Mutex<Option<PersistedRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(record: PersistedRecord) -> Self {
        Self {
            record: Mutex::new(Some(record)),
        }
    }

    /// Last saved record, if any.
    pub fn record(&self) -> Option<PersistedRecord> {
        *self.record.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl PersistenceStore for MemoryStore {
    fn ensure_ready(&self) -> Result<(), StoreError> {
        Ok(())
    }

    fn load(&self) -> Result<Option<PersistedRecord>, StoreError> {
        Ok(self.record())
    }

    fn save(&self, record: &PersistedRecord) -> Result<(), StoreError> {
        *self.record.lock().unwrap_or_else(PoisonError::into_inner) = Some(*record);
        Ok(())
    }
}
