//! Subcommands that work on the saved record without opening the TUI.

use clap::ArgMatches;
use log::warn;

use keepwatch_lib::persistence::{FileStore, PersistedRecord, PersistenceStore, StoreError};
use keepwatch_lib::stopwatch::to_hms;

/// Run a record subcommand if one was given, returning its exit code.
pub fn maybe_run_record_command(
    args: &ArgMatches,
    store: &FileStore,
) -> Result<Option<i32>, StoreError> {
    match args.subcommand() {
        Some(("status", sub)) => run_status(store, sub.get_flag("json")).map(Some),
        Some(("reset", _)) => run_reset(store).map(Some),
        Some(("path", _)) => {
            println!("{}", store.record_path().display());
            Ok(Some(0))
        }
        _ => Ok(None),
    }
}

fn run_status(store: &FileStore, json: bool) -> Result<i32, StoreError> {
    let record = match store.load() {
        Ok(record) => record.unwrap_or(PersistedRecord::new(0)),
        Err(err) => {
            warn!("Ignoring unreadable record: {}", err);
            PersistedRecord::new(0)
        }
    };

    if json {
        println!("{}", record.to_json()?);
    } else {
        println!("{} ({} ms)", to_hms(record.elapsed_ms), record.elapsed_ms);
    }
    Ok(0)
}

fn run_reset(store: &FileStore) -> Result<i32, StoreError> {
    store.ensure_ready()?;
    store.save(&PersistedRecord::new(0))?;
    println!("Saved time reset to 00:00:00");
    Ok(0)
}
