//! Store error type.

/// Failures surfaced by the state store. A stale revision is not an error;
/// it is reported as [`PutOutcome::Conflict`](crate::store::PutOutcome).
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum StoreError {
    /// No backing store configured: reads degrade to an empty state, writes fail.
    NotConfigured,
    /// Malformed save request. Nothing was written.
    Validation(String),
    /// The backing store failed. Nothing was written.
    Backend(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::NotConfigured => write!(
                f,
                "No state backend configured (set STATE_BACKEND=file or STATE_BACKEND=memory)"
            ),
            StoreError::Validation(msg) => write!(f, "Invalid save request: {}", msg),
            StoreError::Backend(msg) => write!(f, "State backend failure: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}
