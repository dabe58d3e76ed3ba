//! Backing stores for the single versioned row.

use crate::store::error::StoreError;
use crate::store::types::Snapshot;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Raw persistence of one snapshot. Revision checks live in
/// [`StateStore`](crate::store::StateStore), not here.
pub trait StateBackend: Send + Sync {
    fn load(&self) -> Result<Snapshot, StoreError>;
    fn store(&self, snapshot: &Snapshot) -> Result<(), StoreError>;
}

/// Process-local backend. State is lost on restart.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    cell: Mutex<Snapshot>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateBackend for MemoryBackend {
    fn load(&self) -> Result<Snapshot, StoreError> {
        self.cell
            .lock()
            .map(|s| s.clone())
            .map_err(|_| StoreError::Backend("memory backend lock poisoned".into()))
    }

    fn store(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        let mut cell = self
            .cell
            .lock()
            .map_err(|_| StoreError::Backend("memory backend lock poisoned".into()))?;
        *cell = snapshot.clone();
        Ok(())
    }
}

/// JSON file backend. A missing file reads as the empty snapshot; writes go to
/// a temporary file that is then renamed over the target.
#[derive(Clone, Debug)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateBackend for FileBackend {
    fn load(&self) -> Result<Snapshot, StoreError> {
        if !self.path.exists() {
            return Ok(Snapshot::empty());
        }
        let raw = fs::read_to_string(&self.path)
            .map_err(|e| StoreError::Backend(format!("read {}: {}", self.path.display(), e)))?;
        serde_json::from_str(&raw)
            .map_err(|e| StoreError::Backend(format!("parse {}: {}", self.path.display(), e)))
    }

    fn store(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        write_json_atomic(&self.path, snapshot)
            .map_err(|e| StoreError::Backend(format!("write {}: {}", self.path.display(), e)))
    }
}

/// Serialize `value` to `path` via a sibling `.tmp` file and rename.
pub(crate) fn write_json_atomic<T: serde::Serialize>(path: &Path, value: &T) -> std::io::Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    let json = serde_json::to_string_pretty(value)?;
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)
}
