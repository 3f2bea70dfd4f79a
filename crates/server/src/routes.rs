use std::path::Path;

use axum::{
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;
use service::Stores;

pub mod auth;
pub mod charts;
pub mod rankings;
pub mod settings;

/// Shared handler state: one handle per resource store.
#[derive(Clone)]
pub struct ServerState {
    pub stores: Stores,
}

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router: JSON API, health check and the static frontend.
pub fn build_router(state: ServerState, frontend_dir: &Path, cors: CorsLayer) -> Router {
    let static_dir = ServeDir::new(frontend_dir).fallback(ServeFile::new(frontend_dir.join("index.html")));

    let api = Router::new()
        .route("/api/signup", post(auth::signup))
        .route("/api/login", post(auth::login))
        .route("/api/get_settings", get(settings::get_settings))
        .route("/api/save_settings", post(settings::save_settings))
        .route("/api/get_rankings", get(rankings::get_rankings))
        .route("/api/save_score", post(rankings::save_score))
        .route("/api/songs", get(charts::list_songs))
        .route("/api/update_songs", post(charts::update_songs));

    Router::new()
        .route("/health", get(health))
        .merge(api)
        .fallback_service(static_dir)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
