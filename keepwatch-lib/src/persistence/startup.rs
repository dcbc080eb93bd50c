//! One-shot restore of the stopwatch from the persisted record.

use std::sync::Arc;

use log::{info, warn};

use crate::clock::Clock;
use crate::stopwatch::Stopwatch;

use super::{PersistedRecord, PersistenceStore};

/// Result of the startup load.
pub struct Startup {
    /// Idle stopwatch holding the restored (or zero) elapsed value.
    pub stopwatch: Stopwatch,
    /// `false` when the storage location could not be prepared; the caller
    /// should continue without durable persistence.
    pub storage_ready: bool,
    /// The record that was restored, if one was found and parsed.
    pub restored: Option<PersistedRecord>,
}

/// Prepare the store and restore the last saved elapsed value.
///
/// A missing, unreadable or malformed record is a fresh start, never an
/// error. The returned stopwatch is always paused.
pub fn load_startup(store: &dyn PersistenceStore, clock: Arc<dyn Clock>) -> Startup {
    if let Err(err) = store.ensure_ready() {
        warn!("Storage unavailable, persistence disabled: {}", err);
        return Startup {
            stopwatch: Stopwatch::new(clock),
            storage_ready: false,
            restored: None,
        };
    }

    let restored = match store.load() {
        Ok(Some(record)) => {
            info!("Loaded saved time: {} ms", record.elapsed_ms);
            Some(record)
        }
        Ok(None) => {
            info!("No saved record found, starting fresh");
            None
        }
        Err(err) => {
            warn!("Discarding saved record, starting fresh: {}", err);
            None
        }
    };

    let elapsed_ms = restored.map(|record| record.elapsed_ms).unwrap_or(0);
    Startup {
        stopwatch: Stopwatch::with_elapsed(clock, elapsed_ms),
        storage_ready: true,
        restored,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::persistence::{FileStore, MemoryStore};
    use crate::test_support::FailingStore;

    fn clock() -> Arc<ManualClock> {
        Arc::new(ManualClock::new())
    }

    #[test]
    fn restores_saved_value_paused() {
        let store = MemoryStore::with_record(PersistedRecord::new(4321));
        let startup = load_startup(&store, clock());

        assert!(startup.storage_ready);
        assert_eq!(startup.restored, Some(PersistedRecord::new(4321)));
        assert_eq!(startup.stopwatch.current_elapsed_ms(), 4321);
        assert!(!startup.stopwatch.is_running());
    }

    #[test]
    fn missing_record_starts_at_zero() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileStore::new(dir.path().join("fresh"));
        let startup = load_startup(&store, clock());

        assert!(startup.storage_ready);
        assert!(store.dir().is_dir());
        assert_eq!(startup.restored, None);
        assert_eq!(startup.stopwatch.current_elapsed_ms(), 0);
    }

    #[test]
    fn malformed_record_starts_at_zero() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileStore::new(dir.path());
        std::fs::write(store.record_path(), r#"{"elapsedMs":"lots"}"#).expect("write");

        let startup = load_startup(&store, clock());
        assert!(startup.storage_ready);
        assert_eq!(startup.restored, None);
        assert_eq!(startup.stopwatch.current_elapsed_ms(), 0);
    }

    #[test]
    fn load_failure_starts_at_zero() {
        let store = FailingStore::default();
        let startup = load_startup(&store, clock());

        assert!(startup.storage_ready);
        assert_eq!(startup.stopwatch.current_elapsed_ms(), 0);
    }

    #[test]
    fn unusable_location_disables_storage_but_not_the_stopwatch() {
        let dir = tempfile::tempdir().expect("tempdir");
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"file").expect("write");
        let store = FileStore::new(&blocker);

        let clock = clock();
        let mut startup = load_startup(&store, clock.clone());
        assert!(!startup.storage_ready);

        startup.stopwatch.start();
        clock.advance_ms(250);
        assert_eq!(startup.stopwatch.current_elapsed_ms(), 250);
    }
}
