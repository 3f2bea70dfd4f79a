use std::net::SocketAddr;

use axum::Router;
use configs::{AppConfig, ServerConfig};
use dotenvy::dotenv;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::errors::StartupError;
use crate::routes::{self, ServerState};
use service::{runtime, Stores};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(server: &ServerConfig) -> anyhow::Result<SocketAddr> {
    Ok(format!("{}:{}", server.host, server.port).parse()?)
}

/// Build the router from an already validated configuration.
pub async fn build_app(cfg: &AppConfig) -> anyhow::Result<Router> {
    runtime::ensure_env(&cfg.storage)
        .await
        .map_err(|e| StartupError::Runtime(e.to_string()))?;
    let stores = Stores::open(&cfg.storage, &cfg.auth)?;
    let state = ServerState { stores };
    Ok(routes::build_router(state, &cfg.storage.frontend_dir, build_cors()))
}

/// Public entry: load configuration, build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    common::utils::logging::init_logging_from_env();

    let cfg = AppConfig::load_and_validate().map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
    let app = build_app(&cfg).await?;

    let addr = bind_addr(&cfg.server)?;
    info!(%addr, frontend = %cfg.storage.frontend_dir.display(), admin = %cfg.auth.admin_user, "starting server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
