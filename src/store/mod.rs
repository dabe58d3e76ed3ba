//! Server-side state store: one versioned document behind get / conditional put.

mod backend;
mod error;
mod revisioned;
mod types;

pub(crate) use backend::write_json_atomic;
pub use backend::{FileBackend, MemoryBackend, StateBackend};
pub use error::StoreError;
pub use revisioned::StateStore;
pub use types::{ConflictBody, ErrorBody, PutOutcome, SaveRequest, SavedBody, Snapshot};
