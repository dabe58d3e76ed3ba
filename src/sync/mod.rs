//! Sync client: local cache plus optimistic-concurrency saves to the shared store.
//!
//! On conflict the server's document wins and the rejected edit is dropped.

mod cache;
mod client;
mod remote;
mod status;

pub use cache::{LocalCache, CACHE_KEY};
pub use client::{LoadSource, SyncClient};
pub use remote::{HttpRemote, RemoteStore};
pub use status::{SyncError, SyncStatus};
