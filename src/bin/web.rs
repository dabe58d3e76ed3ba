//! Single binary web server: shared state API under /api, optional static front end at /.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default.
//! Override with env: HOST, PORT, STATE_BACKEND (file | memory | none), STATE_FILE, STATIC_DIR.

use actix_files::Files;
use actix_web::{get, web::Data, App, HttpResponse, HttpServer};
use tourney_rating::config::{BackendKind, ServerConfig};
use tourney_rating::api;

/// Avoid 404 in browser tab: favicon not required for app logic.
#[get("/favicon.ico")]
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = ServerConfig::from_env()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
    match &config.backend {
        BackendKind::File(path) => log::info!("Storing state in {}", path.display()),
        BackendKind::Memory => log::info!("Storing state in memory (lost on restart)"),
        BackendKind::None => {
            log::warn!("No state backend configured: clients will keep data locally only")
        }
    }

    let store = Data::new(config.build_store());
    let static_dir = config.static_dir.clone();
    let serve_static = static_dir.is_dir();
    if serve_static {
        log::info!("Serving front end from {}", static_dir.display());
    }

    let bind = (config.host.as_str(), config.port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    HttpServer::new(move || {
        let app = App::new()
            .app_data(store.clone())
            .configure(api::configure)
            .service(favicon);
        if serve_static {
            app.service(Files::new("/", static_dir.clone()).index_file("index.html"))
        } else {
            app
        }
    })
    .bind(bind)?
    .run()
    .await
}
