//! Durable storage for the single elapsed-time record.
//!
//! Callers only go through [`PersistenceStore`]; the on-disk layout is one
//! JSON object with a single `elapsedMs` field. Any other shape is rejected
//! as malformed.

mod error;
mod file;
mod memory;
mod startup;

use serde::{Deserialize, Serialize};

pub use error::StoreError;
pub use file::{FileStore, RECORD_FILE_NAME};
pub use memory::MemoryStore;
pub use startup::{load_startup, Startup};

/// The persisted elapsed value, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PersistedRecord {
    #[serde(rename = "elapsedMs")]
    pub elapsed_ms: u64,
}

impl PersistedRecord {
    pub fn new(elapsed_ms: u64) -> Self {
        Self { elapsed_ms }
    }

    /// Parse a record document.
    pub fn from_json(text: &str) -> Result<Self, StoreError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Load/save access to the single durable record.
///
/// Implementations must tolerate back-to-back `save` calls; the last call
/// wins and nothing is merged.
pub trait PersistenceStore: Send + Sync {
    /// Verify the storage location exists, creating it when missing.
    fn ensure_ready(&self) -> Result<(), StoreError>;

    /// Read the record. `Ok(None)` means nothing has been saved yet.
    fn load(&self) -> Result<Option<PersistedRecord>, StoreError>;

    /// Overwrite the record.
    fn save(&self, record: &PersistedRecord) -> Result<(), StoreError>;
}
