//! Remote side of the sync protocol: HTTP client or an in-process store.

use crate::models::Document;
use crate::store::{ConflictBody, PutOutcome, SavedBody, Snapshot, StateStore};
use crate::sync::status::SyncError;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// Get / conditional put against the shared document.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    async fn fetch(&self) -> Result<Snapshot, SyncError>;
    async fn save(&self, payload: &Document, rev: u64) -> Result<PutOutcome, SyncError>;
}

#[async_trait]
impl<T: RemoteStore + ?Sized> RemoteStore for Arc<T> {
    async fn fetch(&self) -> Result<Snapshot, SyncError> {
        (**self).fetch().await
    }

    async fn save(&self, payload: &Document, rev: u64) -> Result<PutOutcome, SyncError> {
        (**self).save(payload, rev).await
    }
}

#[async_trait]
impl RemoteStore for StateStore {
    async fn fetch(&self) -> Result<Snapshot, SyncError> {
        Ok(self.get()?)
    }

    async fn save(&self, payload: &Document, rev: u64) -> Result<PutOutcome, SyncError> {
        Ok(self.put(payload.clone(), rev)?)
    }
}

#[derive(Serialize)]
struct SaveBody<'a> {
    payload: &'a Document,
    rev: u64,
}

/// Talks to `/api/state` on a running server.
pub struct HttpRemote {
    client: Client,
    state_url: String,
}

impl HttpRemote {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, SyncError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SyncError::Transport(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            state_url: format!("{}/api/state", base_url.trim_end_matches('/')),
        })
    }
}

#[async_trait]
impl RemoteStore for HttpRemote {
    async fn fetch(&self) -> Result<Snapshot, SyncError> {
        let response = self.client.get(&self.state_url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SyncError::Server {
                status: status.as_u16(),
                message,
            });
        }
        // Older deployments answer a bare `null` when nothing is configured.
        let snapshot: Option<Snapshot> = response.json().await?;
        Ok(snapshot.unwrap_or_default())
    }

    async fn save(&self, payload: &Document, rev: u64) -> Result<PutOutcome, SyncError> {
        let response = self
            .client
            .post(&self.state_url)
            .json(&SaveBody { payload, rev })
            .send()
            .await?;
        match response.status() {
            StatusCode::CONFLICT => {
                let body: ConflictBody = response.json().await?;
                Ok(PutOutcome::Conflict {
                    latest: body.latest,
                })
            }
            status if status.is_success() => {
                let body: SavedBody = response.json().await?;
                Ok(PutOutcome::Saved { rev: body.rev })
            }
            status => {
                let message = response.text().await.unwrap_or_default();
                Err(SyncError::Server {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }
}
