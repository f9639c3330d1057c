//! JSON snapshot persistence for the content store.
//!
//! A snapshot holds every record together with its stored vector, so the
//! file-backed store survives restarts. Writes go to a sibling temp file
//! first and are renamed into place.

use serde::{Deserialize, Serialize};
use std::path::Path;
use vitrine_core::{ContentRecord, Error, Result};

use crate::types::StoredVector;

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// A record and the vector last written for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord {
    /// The record content.
    #[serde(flatten)]
    pub record: ContentRecord,

    /// Vector from the last reindex, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<StoredVector>,
}

impl StoredRecord {
    /// Wrap a record with no vector.
    pub fn new(record: ContentRecord) -> Self {
        Self {
            record,
            embedding: None,
        }
    }
}

/// On-disk snapshot of the content store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    /// Format version.
    #[serde(default = "default_version")]
    pub version: u32,

    /// All records, in store order.
    #[serde(default)]
    pub records: Vec<StoredRecord>,
}

fn default_version() -> u32 {
    SNAPSHOT_VERSION
}

/// Save a snapshot to a JSON file.
pub fn save_snapshot(path: &Path, snapshot: &Snapshot) -> Result<()> {
    let json = serde_json::to_string_pretty(snapshot)?;

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = std::path::PathBuf::from(tmp);

    std::fs::write(&tmp, json).map_err(|e| Error::io_with_path(e, &tmp))?;
    std::fs::rename(&tmp, path).map_err(|e| Error::io_with_path(e, path))?;
    Ok(())
}

/// Load a snapshot from a JSON file.
pub fn load_snapshot(path: &Path) -> Result<Snapshot> {
    let json = std::fs::read_to_string(path).map_err(|e| Error::io_with_path(e, path))?;
    let snapshot: Snapshot = serde_json::from_str(&json)?;

    if snapshot.version > SNAPSHOT_VERSION {
        return Err(Error::invalid_data(format!(
            "snapshot version {} is newer than supported version {}",
            snapshot.version, SNAPSHOT_VERSION
        )));
    }
    Ok(snapshot)
}

// ============================================================================
// Tests
// ============================================================================
