//! JSON-file backed [`PersistenceStore`].

use std::fs;
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use directories::ProjectDirs;
use log::info;

use super::{PersistedRecord, PersistenceStore, StoreError};

/// File name of the record inside the data directory.
pub const RECORD_FILE_NAME: &str = "stopwatch.json";

const TEMP_SUFFIX: &str = "tmp";

/// Stores the record as `stopwatch.json` inside a data directory.
///
/// Saves go to a sibling temp file that is then renamed over the record, so
/// an interrupted write leaves the previous record intact.
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Store rooted at the per-user application-data directory.
    pub fn in_app_data_dir() -> Result<Self, StoreError> {
        let dirs =
            ProjectDirs::from("org", "keepwatch", "keepwatch").ok_or(StoreError::NoDataDir)?;
        Ok(Self::new(dirs.data_dir()))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn record_path(&self) -> PathBuf {
        self.dir.join(RECORD_FILE_NAME)
    }

    fn temp_path(&self) -> PathBuf {
        self.record_path().with_extension(format!("json.{}", TEMP_SUFFIX))
    }
}

impl PersistenceStore for FileStore {
    fn ensure_ready(&self) -> Result<(), StoreError> {
        if self.dir.is_dir() {
            return Ok(());
        }
        fs::create_dir_all(&self.dir)?;
        info!("Created data directory {}", self.dir.display());
        Ok(())
    }

    fn load(&self) -> Result<Option<PersistedRecord>, StoreError> {
        let text = match fs::read_to_string(self.record_path()) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        PersistedRecord::from_json(&text).map(Some)
    }

    fn save(&self, record: &PersistedRecord) -> Result<(), StoreError> {
        let json = record.to_json()?;
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let temp_path = self.temp_path();
        if let Err(err) = replace_with(&temp_path, &self.record_path(), json.as_bytes()) {
            let _ = fs::remove_file(&temp_path);
            return Err(err.into());
        }
        Ok(())
    }
}

/// Write `contents` to `temp_path`, flush it, then rename it over `path`.
fn replace_with(temp_path: &Path, path: &Path, contents: &[u8]) -> io::Result<()> {
    let mut file = fs::File::create(temp_path)?;
    file.write_all(contents)?;
    file.sync_all()?;
    drop(file);
    fs::rename(temp_path, path)
}
