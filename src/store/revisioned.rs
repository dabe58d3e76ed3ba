//! Revision-checked access to the shared document.

use crate::models::Document;
use crate::store::backend::StateBackend;
use crate::store::error::StoreError;
use crate::store::types::{PutOutcome, Snapshot};
use std::sync::Mutex;

/// Single logical row `{payload, rev}` with optimistic concurrency: a write
/// applies only when the caller's revision equals the current one. Stale
/// writes are discarded, never merged.
pub struct StateStore {
    backend: Option<Box<dyn StateBackend>>,
    /// Serialises compare-and-swap on the backend.
    write_lock: Mutex<()>,
}

impl StateStore {
    pub fn new(backend: impl StateBackend + 'static) -> Self {
        Self {
            backend: Some(Box::new(backend)),
            write_lock: Mutex::new(()),
        }
    }

    /// Store with no backend: `get` reports an empty state, `put` fails.
    pub fn unconfigured() -> Self {
        Self {
            backend: None,
            write_lock: Mutex::new(()),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.backend.is_some()
    }

    /// Current payload and revision (`{payload: None, rev: 0}` when unconfigured).
    pub fn get(&self) -> Result<Snapshot, StoreError> {
        match &self.backend {
            Some(backend) => backend.load(),
            None => Ok(Snapshot::empty()),
        }
    }

    /// Write `payload` if `expected_rev` is the current revision.
    pub fn put(&self, payload: Document, expected_rev: u64) -> Result<PutOutcome, StoreError> {
        let backend = self.backend.as_ref().ok_or(StoreError::NotConfigured)?;
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| StoreError::Backend("store lock poisoned".into()))?;

        let current = backend.load()?;
        if current.rev != expected_rev {
            log::warn!(
                "Rejected stale write (expected rev {}, current rev {})",
                expected_rev,
                current.rev
            );
            return Ok(PutOutcome::Conflict { latest: current });
        }

        let rev = current.rev + 1;
        backend.store(&Snapshot {
            payload: Some(payload),
            rev,
        })?;
        log::debug!("Stored document at rev {}", rev);
        Ok(PutOutcome::Saved { rev })
    }
}
