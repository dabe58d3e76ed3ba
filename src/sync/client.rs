//! Client-side orchestration: load, local persistence, conditional saves, conflicts.

use crate::logic::RatedPlayer;
use crate::models::{Document, PlayerId};
use crate::store::{PutOutcome, Snapshot};
use crate::sync::cache::LocalCache;
use crate::sync::remote::RemoteStore;
use crate::sync::status::SyncStatus;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

/// Where the document came from at startup.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LoadSource {
    Remote,
    LocalCache,
    Empty,
}

#[derive(Debug)]
struct ClientState {
    document: Document,
    /// Last revision known from the store.
    rev: u64,
    status: SyncStatus,
    /// Bumped on every local edit.
    edits: u64,
    /// Edits up to this counter are settled (saved or discarded on conflict).
    settled_edits: u64,
    /// Id of the newest save attempt started.
    attempts: u64,
    /// Id of the newest save attempt whose response was applied.
    resolved_attempt: u64,
}

/// Keeps one client's copy of the document in step with the shared store.
///
/// Every edit is written to the local cache immediately. [`sync`](Self::sync)
/// then sends the whole current document with the last known revision. Saves
/// run one at a time; edits made while a save is in flight are carried by the
/// next save, so intermediate documents are never sent.
pub struct SyncClient<R> {
    remote: R,
    cache: LocalCache,
    state: Mutex<ClientState>,
    save_gate: tokio::sync::Mutex<()>,
    source: LoadSource,
}

impl<R: RemoteStore> SyncClient<R> {
    /// Load from the remote store; fall back to the local cache, then to an empty document.
    pub async fn start(remote: R, cache: LocalCache) -> Self {
        let (document, rev, source) = match remote.fetch().await {
            Ok(Snapshot {
                payload: Some(document),
                rev,
            }) => (document, rev, LoadSource::Remote),
            Ok(_) => Self::fallback(&cache),
            Err(e) => {
                log::warn!("Remote state unavailable, using local data: {}", e);
                Self::fallback(&cache)
            }
        };
        log::info!("Loaded document from {:?} at rev {}", source, rev);
        Self {
            remote,
            cache,
            state: Mutex::new(ClientState {
                document,
                rev,
                status: SyncStatus::Idle,
                edits: 0,
                settled_edits: 0,
                attempts: 0,
                resolved_attempt: 0,
            }),
            save_gate: tokio::sync::Mutex::new(()),
            source,
        }
    }

    fn fallback(cache: &LocalCache) -> (Document, u64, LoadSource) {
        match cache.load() {
            Some(document) => (document, 0, LoadSource::LocalCache),
            None => (Document::new(), 0, LoadSource::Empty),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ClientState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn source(&self) -> LoadSource {
        self.source
    }

    pub fn document(&self) -> Document {
        self.lock().document.clone()
    }

    pub fn revision(&self) -> u64 {
        self.lock().rev
    }

    pub fn status(&self) -> SyncStatus {
        self.lock().status
    }

    /// Whether there are local edits not yet settled by a save.
    pub fn has_pending(&self) -> bool {
        let st = self.lock();
        st.edits > st.settled_edits
    }

    /// Ratings derived from the current document.
    pub fn ratings(&self) -> BTreeMap<PlayerId, RatedPlayer> {
        self.lock().document.ratings()
    }

    /// Apply a local edit and write the local cache. Nothing is sent until
    /// [`sync`](Self::sync). A failed edit leaves the document untouched.
    pub fn edit<T, E>(&self, f: impl FnOnce(&mut Document) -> Result<T, E>) -> Result<T, E> {
        let mut st = self.lock();
        let mut draft = st.document.clone();
        let out = f(&mut draft)?;
        st.document = draft;
        st.edits += 1;
        self.persist_local(&st.document);
        Ok(out)
    }

    /// [`edit`](Self::edit) followed by [`sync`](Self::sync).
    pub async fn commit<T, E>(
        &self,
        f: impl FnOnce(&mut Document) -> Result<T, E>,
    ) -> Result<(T, SyncStatus), E> {
        let out = self.edit(f)?;
        let status = self.sync().await;
        Ok((out, status))
    }

    /// Reset to an empty document, drop the local cache, and save.
    pub async fn reset(&self) -> SyncStatus {
        {
            let mut st = self.lock();
            st.document.reset();
            st.edits += 1;
            if let Err(e) = self.cache.clear() {
                log::warn!("Could not clear local cache: {}", e);
            }
        }
        self.sync().await
    }

    /// Save the latest document if any edit is unsettled.
    ///
    /// The save gate keeps one attempt in flight per client. The attempt id
    /// check only ever applies a response to the newest attempt. If this future
    /// is dropped mid-save, the attempt is settled as [`SyncStatus::Error`] and
    /// its edits stay pending.
    pub async fn sync(&self) -> SyncStatus {
        let _gate = self.save_gate.lock().await;

        let (payload, rev, edits, attempt) = {
            let mut st = self.lock();
            if st.edits <= st.settled_edits {
                return st.status;
            }
            st.attempts += 1;
            st.status = SyncStatus::Saving;
            (st.document.clone(), st.rev, st.edits, st.attempts)
        };

        let mut in_flight = InFlight {
            state: &self.state,
            attempt,
            finished: false,
        };
        let outcome = self.remote.save(&payload, rev).await;
        in_flight.finished = true;

        let mut st = self.lock();
        if attempt <= st.resolved_attempt {
            log::debug!("Ignoring response to superseded save attempt {}", attempt);
            return st.status;
        }
        st.resolved_attempt = attempt;
        match outcome {
            Ok(PutOutcome::Saved { rev }) => {
                st.rev = rev;
                st.settled_edits = edits;
                st.status = SyncStatus::Idle;
                log::debug!("Saved at rev {}", rev);
            }
            Ok(PutOutcome::Conflict { latest }) => {
                log::warn!(
                    "Save at rev {} rejected; adopting server state at rev {}",
                    rev,
                    latest.rev
                );
                st.rev = latest.rev;
                if let Some(document) = latest.payload {
                    st.document = document;
                    self.persist_local(&st.document);
                }
                st.settled_edits = st.edits;
                st.status = SyncStatus::Conflict;
            }
            Err(e) => {
                log::warn!("Cloud save failed, keeping local copy: {}", e);
                st.status = SyncStatus::Error;
            }
        }
        st.status
    }

    fn persist_local(&self, doc: &Document) {
        if let Err(e) = self.cache.save(doc) {
            log::warn!("Could not write local cache {}: {}", self.cache.path().display(), e);
        }
    }
}

/// Settles a save attempt whose future was dropped before the response arrived.
struct InFlight<'a> {
    state: &'a Mutex<ClientState>,
    attempt: u64,
    finished: bool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        let mut st = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if self.attempt > st.resolved_attempt {
            st.resolved_attempt = self.attempt;
            st.status = SyncStatus::Error;
            log::warn!("Save attempt {} abandoned before a response", self.attempt);
        }
    }
}
