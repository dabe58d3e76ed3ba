//! Sync status shown to the user and the sync error type.

use crate::store::StoreError;
use serde::{Deserialize, Serialize};

/// `Idle -> Saving -> {Idle | Conflict | Error}`. Conflict and Error are not
/// fatal: the next edit starts a new save.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    #[default]
    Idle,
    Saving,
    /// Last save was stale; server state was adopted.
    Conflict,
    /// Last save failed; the local cache holds the edits.
    Error,
}

impl SyncStatus {
    /// Short indicator text.
    pub fn label(&self) -> &'static str {
        match self {
            SyncStatus::Idle => "Saved",
            SyncStatus::Saving => "Saving…",
            SyncStatus::Conflict => "Conflict – reloaded",
            SyncStatus::Error => "Cloud error",
        }
    }
}

impl std::fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Failure talking to the remote store.
#[derive(Debug)]
pub enum SyncError {
    /// Request never completed (connection refused, timeout, ...).
    Transport(String),
    /// Server answered with an error status.
    Server { status: u16, message: String },
    /// Response body could not be decoded.
    Decode(String),
    /// In-process store failure.
    Store(StoreError),
}

impl std::fmt::Display for SyncError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncError::Transport(msg) => write!(f, "Transport error: {}", msg),
            SyncError::Server { status, message } => write!(f, "Server error {}: {}", status, message),
            SyncError::Decode(msg) => write!(f, "Could not decode response: {}", msg),
            SyncError::Store(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for SyncError {}

impl From<StoreError> for SyncError {
    fn from(e: StoreError) -> Self {
        SyncError::Store(e)
    }
}

impl From<reqwest::Error> for SyncError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            SyncError::Decode(e.to_string())
        } else {
            SyncError::Transport(e.to_string())
        }
    }
}
