/*****************************************************************************************
 *
 *  Leaderboard – Ranked Score Microservice in Rust
 *  -----------------------------------------------
 *
 *  Submit named scores over HTTP, read back the current top ten.
 *
 *****************************************************************************************/

mod app;
mod config;
mod errors;
mod routes;
mod services;
mod state;

use axum::serve;
use tokio::net::TcpListener;

use tracing_subscriber::EnvFilter;

use crate::config::{locate_config, AppConfig};
use crate::errors::StartupError;
use crate::state::leaderboard::new_leaderboard;

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    //
    // ────────────────────────────────────────────────────────
    //  Load configuration ($LEADERBOARD_CONFIG, EXE folder, parent)
    // ────────────────────────────────────────────────────────
    //
    let config_path = locate_config();
    let cfg = match &config_path {
        Some(path) => AppConfig::load_from_file(path)?,
        None => AppConfig::default(),
    };

    //
    // ────────────────────────────────────────────────────────
    //  Configure logging (RUST_LOG overrides config.log_level)
    // ────────────────────────────────────────────────────────
    //
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cfg.log_level.to_lowercase()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .init();

    tracing::info!("Starting leaderboard…");
    match &config_path {
        Some(path) => tracing::info!("Loaded config.json from {}", path.display()),
        None => tracing::info!("No config.json found, using defaults"),
    }
    tracing::info!("Loaded configuration: {:?}", cfg);

    //
    // ────────────────────────────────────────────────────────
    //  Create the ranked store and build the Axum app
    // ────────────────────────────────────────────────────────
    //
    let board = new_leaderboard(cfg.leaderboard_size);
    let app = app::build_app(board, cfg.clone());

    //
    // ────────────────────────────────────────────────────────
    //  Bind server and start listening
    // ────────────────────────────────────────────────────────
    //
    let addr = cfg.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| StartupError::Bind { addr: addr.clone(), source })?;

    tracing::info!("Listening on http://{}", addr);

    serve(listener, app)
        .with_graceful_shutdown(shutdown())
        .await
        .map_err(StartupError::Serve)?;

    tracing::info!("Server stopped. Goodbye.");
    Ok(())
}

//
// ─────────────────────────────────────────────────────────────
//  Graceful shutdown handler
// ─────────────────────────────────────────────────────────────
//
async fn shutdown() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }

    tracing::warn!("CTRL+C received, shutting down…");
}
