use std::{
    error::Error,
    io::{self, Write},
    path::PathBuf,
    sync::Arc,
};

use clap::ArgMatches;
use keepwatch_lib::{
    autosave::AutosaveScheduler,
    clock::{Clock, SystemClock},
    lifecycle::{CloseOutcome, HostWindow, LifecycleGuard},
    persistence::{load_startup, FileStore, MemoryStore, PersistenceStore},
    stopwatch::StopwatchHandle,
};
use log::{error, info, warn};

use crate::{
    cli::{config::AppConfig, record},
    controls::{self, CloseSignal, Intent},
    logging::{self, LogBuffer},
    ui,
    window::TerminalWindow,
};

/// Where elapsed time is being persisted this session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageMode {
    File(PathBuf),
    MemoryOnly,
}

impl StorageMode {
    fn label(&self) -> String {
        match self {
            Self::File(path) => format!("saving to {}", path.display()),
            Self::MemoryOnly => "memory only: time will not survive a restart".to_string(),
        }
    }
}

/// Stopwatch restored from storage, plus the store it keeps writing to.
pub struct Session {
    pub stopwatch: StopwatchHandle,
    pub store: Arc<dyn PersistenceStore>,
    pub storage: StorageMode,
}

/// Restore the stopwatch, falling back to memory-only mode when the file
/// store is unavailable.
pub fn open_session(file_store: Option<FileStore>, clock: Arc<dyn Clock>) -> Session {
    if let Some(file_store) = file_store {
        let startup = load_startup(&file_store, clock.clone());
        if startup.storage_ready {
            return Session {
                stopwatch: StopwatchHandle::new(startup.stopwatch),
                storage: StorageMode::File(file_store.record_path()),
                store: Arc::new(file_store),
            };
        }
    }

    warn!("Running in memory-only mode");
    let store = MemoryStore::new();
    let startup = load_startup(&store, clock);
    Session {
        stopwatch: StopwatchHandle::new(startup.stopwatch),
        store: Arc::new(store),
        storage: StorageMode::MemoryOnly,
    }
}

pub fn run(args: &ArgMatches, log_buffer: LogBuffer) -> Result<i32, Box<dyn Error>> {
    let config = AppConfig::from_matches(args);
    let file_store = match config.file_store() {
        Ok(store) => Some(store),
        Err(err) => {
            warn!("{}", err);
            None
        }
    };

    // Record subcommands run without the UI.
    if args.subcommand().is_some() {
        let Some(store) = file_store.as_ref() else {
            error!("No data directory; pass --data-dir");
            return Ok(1);
        };
        if let Some(code) = record::maybe_run_record_command(args, store)? {
            return Ok(code);
        }
    }

    info!("Starting keepwatch");
    let session = open_session(file_store, Arc::new(SystemClock::new()));
    let stopwatch = session.stopwatch.clone();

    let mut autosave =
        AutosaveScheduler::new(stopwatch.clone(), session.store.clone(), config.autosave);
    autosave.start()?;
    let guard = LifecycleGuard::new(stopwatch.clone(), session.store.clone());
    let close_signal = CloseSignal::register()?;

    let outcome = {
        let mut window = TerminalWindow::open()?;
        let _stderr_capture = logging::capture_stderr(log_buffer.clone());
        let storage_label = session.storage.label();
        let mut outcome = None;

        // Display refresh / intent loop.
        while window.is_open() {
            let status = controls::status_snapshot(
                stopwatch.current_elapsed_ms(),
                stopwatch.is_running(),
                &storage_label,
            );
            let log_lines = logging::snapshot(&log_buffer);
            ui::draw_status(window.terminal_mut(), &status, &log_lines);

            match controls::poll_intent(&close_signal, config.refresh_interval) {
                Some(Intent::ToggleRun) => {
                    stopwatch.toggle_run();
                }
                Some(Intent::Reset) => stopwatch.reset(),
                Some(Intent::Close) => {
                    outcome = Some(close_session(&mut autosave, &guard, &mut window));
                }
                None => {}
            }
        }
        outcome
    };

    // The terminal and stderr are restored here, so the report is visible.
    Ok(report_close_outcome(outcome.as_ref(), &mut io::stderr()))
}

/// Report a failed close-save to `out`, returning the exit code.
fn report_close_outcome(outcome: Option<&CloseOutcome>, out: &mut dyn Write) -> i32 {
    match outcome {
        Some(CloseOutcome::SaveFailed(err)) => {
            warn!("Closed without saving: {}", err);
            let _ = writeln!(out, "keepwatch: closed without saving: {}", err);
            1
        }
        _ => 0,
    }
}

/// Stop autosave, then run the close-save and close `window`.
///
/// Autosave is cancelled first so the close-save is the final write.
pub fn close_session(
    autosave: &mut AutosaveScheduler,
    guard: &LifecycleGuard,
    window: &mut dyn HostWindow,
) -> CloseOutcome {
    autosave.stop();
    guard.handle_close_request(window)
}

#[cfg(test)]
mod tests {
    use super::*;
    use keepwatch_lib::autosave::AutosaveConfig;
    use keepwatch_lib::clock::ManualClock;
    use keepwatch_lib::persistence::{PersistedRecord, StoreError};
    use keepwatch_lib::stopwatch::Stopwatch;
    use std::sync::Mutex;
    use std::time::{Duration, Instant};

    #[derive(Default)]
    struct RecordingStore {
        saves: Mutex<Vec<PersistedRecord>>,
    }

    impl RecordingStore {
        fn saves(&self) -> Vec<PersistedRecord> {
            self.saves.lock().unwrap().clone()
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
            self.saves.lock().unwrap().push(*record);
            Ok(())
        }
    }

    struct TestWindow {
        store: Arc<RecordingStore>,
        saves_at_close: Option<usize>,
    }

    impl HostWindow for TestWindow {
        fn close(&mut self) {
            self.saves_at_close = Some(self.store.saves().len());
        }
    }

    #[test]
    fn close_save_is_the_last_write() {
        let clock = Arc::new(ManualClock::new());
        let stopwatch = StopwatchHandle::new(Stopwatch::new(clock.clone()));
        stopwatch.start();
        clock.advance_ms(4321);

        let store = Arc::new(RecordingStore::default());
        let mut autosave = AutosaveScheduler::new(
            stopwatch.clone(),
            store.clone(),
            AutosaveConfig::from_millis(1),
        );
        autosave.start().expect("start");
        let deadline = Instant::now() + Duration::from_secs(5);
        while store.saves().len() < 3 {
            assert!(Instant::now() < deadline, "autosave never ticked");
            std::thread::sleep(Duration::from_millis(1));
        }

        let guard = LifecycleGuard::new(stopwatch.clone(), store.clone());
        let mut window = TestWindow {
            store: store.clone(),
            saves_at_close: None,
        };
        clock.advance_ms(1000);
        let outcome = close_session(&mut autosave, &guard, &mut window);

        assert!(matches!(outcome, CloseOutcome::Saved(r) if r.elapsed_ms == 5321));
        assert!(!autosave.is_running());
        std::thread::sleep(Duration::from_millis(20));

        let saves = store.saves();
        assert_eq!(saves.last(), Some(&PersistedRecord::new(5321)));
        assert_eq!(window.saves_at_close, Some(saves.len()));
    }

    #[test]
    fn failed_close_save_is_reported() {
        let err = StoreError::Io(io::Error::new(io::ErrorKind::Other, "disk full"));
        let mut out = Vec::new();

        let code = report_close_outcome(Some(&CloseOutcome::SaveFailed(err)), &mut out);

        assert_eq!(code, 1);
        let text = String::from_utf8(out).expect("utf8");
        assert_eq!(text, "keepwatch: closed without saving: io error: disk full\n");
    }

    #[test]
    fn successful_close_is_silent() {
        let mut out = Vec::new();
        let saved = CloseOutcome::Saved(PersistedRecord::new(10));
        assert_eq!(report_close_outcome(Some(&saved), &mut out), 0);
        assert_eq!(report_close_outcome(None, &mut out), 0);
        assert!(out.is_empty());
    }

    #[test]
    fn session_restores_from_file_store() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file_store = FileStore::new(dir.path());
        file_store.ensure_ready().expect("ready");
        file_store.save(&PersistedRecord::new(7_200_000)).expect("save");

        let session = open_session(Some(file_store), Arc::new(ManualClock::new()));

        assert_eq!(session.stopwatch.current_elapsed_ms(), 7_200_000);
        assert!(!session.stopwatch.is_running());
        assert_eq!(
            session.storage,
            StorageMode::File(dir.path().join("stopwatch.json"))
        );
    }

    #[test]
    fn unusable_directory_falls_back_to_memory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"file").expect("write");

        let clock = Arc::new(ManualClock::new());
        let session = open_session(Some(FileStore::new(&blocker)), clock.clone());
        assert_eq!(session.storage, StorageMode::MemoryOnly);

        session.stopwatch.start();
        clock.advance_ms(3000);
        session.store.save(&session.stopwatch.record()).expect("save");
        assert_eq!(
            session.store.load().expect("load"),
            Some(PersistedRecord::new(3000))
        );
    }

    #[test]
    fn missing_data_dir_runs_in_memory() {
        let session = open_session(None, Arc::new(ManualClock::new()));
        assert_eq!(session.storage, StorageMode::MemoryOnly);
        assert_eq!(session.stopwatch.current_elapsed_ms(), 0);
    }
}
