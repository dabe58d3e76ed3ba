//! Integration tests for the HTTP sync transport against a live server.

use actix_web::{dev::ServerHandle, web, web::Data, App, HttpResponse, HttpServer};
use serde_json::Value;
use std::time::Duration;
use tourney_rating::api;
use tourney_rating::store::{MemoryBackend, PutOutcome, StateStore};
use tourney_rating::sync::{HttpRemote, LocalCache, RemoteStore, SyncClient, SyncError, SyncStatus};
use tourney_rating::Document;

/// Bind an app on an ephemeral local port and return its base URL.
macro_rules! serve {
    ($factory:expr) => {{
        let server = HttpServer::new($factory)
            .workers(1)
            .bind(("127.0.0.1", 0))
            .unwrap();
        let addr = server.addrs()[0];
        let server = server.run();
        let handle: ServerHandle = server.handle();
        actix_web::rt::spawn(server);
        (format!("http://{addr}"), handle)
    }};
}

fn remote(base_url: &str) -> HttpRemote {
    HttpRemote::new(base_url, Duration::from_secs(5)).unwrap()
}

fn doc_named(name: &str) -> Document {
    let mut doc = Document::new();
    doc.add_player(name).unwrap();
    doc
}

#[actix_web::test]
async fn fetch_and_save_follow_the_revision_protocol() {
    let store = Data::new(StateStore::new(MemoryBackend::new()));
    let app_store = store.clone();
    let (url, handle) =
        serve!(move || App::new().app_data(app_store.clone()).configure(api::configure));
    let remote = remote(&url);

    let empty = remote.fetch().await.unwrap();
    assert_eq!(empty.rev, 0);
    assert_eq!(empty.payload, None);

    let first = doc_named("first");
    assert_eq!(
        remote.save(&first, 0).await.unwrap(),
        PutOutcome::Saved { rev: 1 }
    );
    let fetched = remote.fetch().await.unwrap();
    assert_eq!(fetched.rev, 1);
    assert_eq!(fetched.payload, Some(first.clone()));

    match remote.save(&doc_named("stale"), 0).await.unwrap() {
        PutOutcome::Conflict { latest } => {
            assert_eq!(latest.rev, 1);
            assert_eq!(latest.payload, Some(first.clone()));
        }
        other => panic!("expected Conflict, got {other:?}"),
    }
    assert_eq!(store.get().unwrap().payload, Some(first));

    handle.stop(true).await;
}

#[actix_web::test]
async fn unconfigured_server_answers_save_with_400() {
    let store = Data::new(StateStore::unconfigured());
    let (url, handle) =
        serve!(move || App::new().app_data(store.clone()).configure(api::configure));
    let remote = remote(&url);

    assert_eq!(remote.fetch().await.unwrap().rev, 0);
    match remote.save(&Document::new(), 0).await {
        Err(SyncError::Server { status, message }) => {
            assert_eq!(status, 400);
            assert!(message.contains("error"));
        }
        other => panic!("expected a 400 server error, got {other:?}"),
    }

    handle.stop(true).await;
}

#[actix_web::test]
async fn bare_null_state_is_an_empty_snapshot() {
    let (url, handle) = serve!(|| App::new().route(
        "/api/state",
        web::get().to(|| async { HttpResponse::Ok().json(Value::Null) })
    ));

    let snapshot = remote(&url).fetch().await.unwrap();
    assert_eq!(snapshot.rev, 0);
    assert_eq!(snapshot.payload, None);

    handle.stop(true).await;
}

#[actix_web::test]
async fn unreachable_server_is_a_transport_error() {
    let (url, handle) = serve!(|| App::new());
    handle.stop(true).await;

    let err = remote(&url).fetch().await.unwrap_err();
    assert!(matches!(err, SyncError::Transport(_)), "got {err:?}");
}

#[actix_web::test]
async fn two_http_clients_resolve_a_conflict() {
    let store = Data::new(StateStore::new(MemoryBackend::new()));
    let app_store = store.clone();
    let (url, handle) =
        serve!(move || App::new().app_data(app_store.clone()).configure(api::configure));
    let dir_a = tempfile::tempdir().unwrap();
    let dir_b = tempfile::tempdir().unwrap();

    let a = SyncClient::start(remote(&url), LocalCache::in_dir(dir_a.path())).await;
    let b = SyncClient::start(remote(&url), LocalCache::in_dir(dir_b.path())).await;

    let (_, status) = a.commit(|doc| doc.add_player("from A")).await.unwrap();
    assert_eq!(status, SyncStatus::Idle);
    let (_, status) = b.commit(|doc| doc.add_player("from B")).await.unwrap();
    assert_eq!(status, SyncStatus::Conflict);

    assert_eq!(b.revision(), 1);
    assert_eq!(b.document(), a.document());
    assert_eq!(store.get().unwrap().payload, Some(a.document()));

    let (_, status) = b.commit(|doc| doc.add_player("B again")).await.unwrap();
    assert_eq!(status, SyncStatus::Idle);
    assert_eq!(store.get().unwrap().rev, 2);

    handle.stop(true).await;
}
