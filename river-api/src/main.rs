mod config;
mod error;
mod handlers;
mod river;
mod state;
mod store;

use axum::{routing::get, Router};
use config::Config;
use state::AppState;
use std::{net::SocketAddr, sync::Arc};
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config_path = std::env::var("RIVER_API_CONFIG").unwrap_or_else(|_| "config.toml".into());
    let cfg = Config::load(&config_path)?;

    let state = Arc::new(AppState::from_config(&cfg)?);
    let app = router(state);

    let listen = cfg.listen.unwrap_or_else(|| "0.0.0.0:8080".into());
    let addr: SocketAddr = listen.parse()?;
    info!(%addr, "Starting river-api");

    let server = axum::Server::bind(&addr).serve(app.into_make_service());

    let graceful = server.with_graceful_shutdown(shutdown_signal());
    graceful.await?;
    Ok(())
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/river", get(handlers::river_handler))
        .route("/health", get(handlers::health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn shutdown_signal() {
    let _ = signal::ctrl_c().await;
    info!("Shutdown signal received");
}
