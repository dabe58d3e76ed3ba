//! REST handlers: `/api/state` (get / conditional save), leaderboard views, health.

use crate::logic::{leaderboard, leaderboard_csv};
use crate::models::Document;
use crate::store::{
    ConflictBody, ErrorBody, PutOutcome, SaveRequest, SavedBody, StateStore, StoreError,
};
use actix_web::{
    get, post,
    web::{self, Bytes, Data},
    HttpResponse, Responder,
};

type AppState = Data<StateStore>;

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
    configured: bool,
}

#[get("/api/health")]
async fn api_health(store: AppState) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "tourney-rating",
        configured: store.is_configured(),
    })
}

/// Current `{payload, rev}`. Without a backend this is `{payload: null, rev: 0}`.
#[get("/api/state")]
async fn api_get_state(store: AppState) -> HttpResponse {
    match store.get() {
        Ok(snapshot) => HttpResponse::Ok().json(snapshot),
        Err(e) => error_response(&e),
    }
}

/// Save `{payload, rev}` if `rev` is current; otherwise 409 with the latest state.
#[post("/api/state")]
async fn api_save_state(store: AppState, body: Bytes) -> HttpResponse {
    let request = match SaveRequest::from_json(&body) {
        Ok(r) => r,
        Err(e) => return error_response(&e),
    };
    match store.put(request.payload, request.rev) {
        Ok(PutOutcome::Saved { rev }) => {
            log::info!("Saved state at rev {}", rev);
            HttpResponse::Ok().json(SavedBody { ok: true, rev })
        }
        Ok(PutOutcome::Conflict { latest }) => HttpResponse::Conflict().json(ConflictBody {
            conflict: true,
            latest,
        }),
        Err(e) => error_response(&e),
    }
}

/// Leaderboard of the stored document (empty when nothing is stored yet).
#[get("/api/leaderboard")]
async fn api_leaderboard(store: AppState) -> HttpResponse {
    match stored_document(&store) {
        Ok(doc) => HttpResponse::Ok().json(leaderboard(&doc.ratings())),
        Err(e) => error_response(&e),
    }
}

#[get("/api/leaderboard.csv")]
async fn api_leaderboard_csv(store: AppState) -> HttpResponse {
    let doc = match stored_document(&store) {
        Ok(doc) => doc,
        Err(e) => return error_response(&e),
    };
    match leaderboard_csv(&leaderboard(&doc.ratings())) {
        Ok(csv) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .body(csv),
        Err(e) => {
            log::error!("CSV export failed: {}", e);
            HttpResponse::InternalServerError().json(ErrorBody {
                error: e.to_string(),
            })
        }
    }
}

fn stored_document(store: &StateStore) -> Result<Document, StoreError> {
    Ok(store.get()?.payload.unwrap_or_default())
}

fn error_response(e: &StoreError) -> HttpResponse {
    let body = ErrorBody {
        error: e.to_string(),
    };
    match e {
        StoreError::NotConfigured | StoreError::Validation(_) => {
            log::warn!("{}", e);
            HttpResponse::BadRequest().json(body)
        }
        StoreError::Backend(_) => {
            log::error!("{}", e);
            HttpResponse::InternalServerError().json(body)
        }
    }
}

/// Register every API route.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(api_health)
        .service(api_get_state)
        .service(api_save_state)
        .service(api_leaderboard)
        .service(api_leaderboard_csv);
}
