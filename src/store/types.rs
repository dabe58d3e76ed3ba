//! Versioned snapshots and the JSON bodies exchanged over `/api/state`.

use crate::models::Document;
use crate::store::error::StoreError;
use serde::{Deserialize, Serialize};

/// The stored document together with its revision. `payload` is `None`
/// until the first successful write (or when no backend is configured).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub payload: Option<Document>,
    pub rev: u64,
}

impl Snapshot {
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Result of a conditional write.
#[derive(Clone, Debug, PartialEq)]
pub enum PutOutcome {
    /// Write applied; `rev` is the new revision.
    Saved { rev: u64 },
    /// Caller's revision was stale; the write was discarded.
    Conflict { latest: Snapshot },
}

/// Body of `POST /api/state`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SaveRequest {
    pub payload: Document,
    pub rev: u64,
}

impl SaveRequest {
    /// Parse and check a request body before anything touches storage.
    pub fn from_json(body: &[u8]) -> Result<Self, StoreError> {
        let value: serde_json::Value = serde_json::from_slice(body)
            .map_err(|e| StoreError::Validation(format!("body is not JSON: {e}")))?;
        let rev = value
            .get("rev")
            .and_then(serde_json::Value::as_u64)
            .ok_or_else(|| StoreError::Validation("missing numeric rev".into()))?;
        let payload = match value.get("payload") {
            Some(p @ serde_json::Value::Object(_)) => p.clone(),
            _ => return Err(StoreError::Validation("missing payload object".into())),
        };
        let payload: Document = serde_json::from_value(payload)
            .map_err(|e| StoreError::Validation(format!("payload: {e}")))?;
        Ok(Self { payload, rev })
    }
}

/// `200` response to a successful save.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SavedBody {
    pub ok: bool,
    pub rev: u64,
}

/// `409` response to a stale save.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConflictBody {
    pub conflict: bool,
    pub latest: Snapshot,
}

/// `4xx`/`5xx` error response.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
