//! Resolved runtime configuration for the CLI.

use std::path::PathBuf;
use std::time::Duration;

use clap::ArgMatches;
use keepwatch_lib::autosave::AutosaveConfig;
use keepwatch_lib::persistence::{FileStore, StoreError};

/// Environment variable naming the data directory.
pub const DATA_DIR_ENV: &str = "KEEPWATCH_DATA_DIR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Explicit data directory; `None` means the per-user app data directory.
    pub data_dir: Option<PathBuf>,
    pub autosave: AutosaveConfig,
    pub refresh_interval: Duration,
}

impl AppConfig {
    /// Resolve from parsed arguments, falling back to `KEEPWATCH_DATA_DIR`.
    pub fn from_matches(args: &ArgMatches) -> Self {
        Self::resolve(args, std::env::var_os(DATA_DIR_ENV).map(PathBuf::from))
    }

    fn resolve(args: &ArgMatches, env_data_dir: Option<PathBuf>) -> Self {
        // The flag is global, so it may have been given after a subcommand.
        let data_dir = args
            .subcommand()
            .and_then(|(_, sub)| sub.get_one::<String>("data-dir"))
            .or_else(|| args.get_one::<String>("data-dir"))
            .map(PathBuf::from)
            .or(env_data_dir);
        let autosave_ms = args.get_one::<u64>("autosave-ms").copied().unwrap_or(5000);
        let refresh_ms = args.get_one::<u64>("refresh-ms").copied().unwrap_or(100);

        Self {
            data_dir,
            autosave: AutosaveConfig::from_millis(autosave_ms),
            refresh_interval: Duration::from_millis(refresh_ms),
        }
    }

    /// File store for the configured data directory.
    pub fn file_store(&self) -> Result<FileStore, StoreError> {
        match &self.data_dir {
            Some(dir) => Ok(FileStore::new(dir)),
            None => FileStore::in_app_data_dir(),
        }
    }
}
