// =============================================================================
// Trendcast: Main Entry Point
// =============================================================================

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use trendcast::api;
use trendcast::app_state::AppState;
use trendcast::runtime_config::{GameConfig, DEFAULT_CONFIG_PATH};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Trendcast starting up");

    let config_path =
        std::env::var("TRENDCAST_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

    let mut config = GameConfig::load(&config_path).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        let defaults = GameConfig::default();
        if !std::path::Path::new(&config_path).exists() {
            if let Err(e) = defaults.save(&config_path) {
                warn!(error = %e, "Failed to write default config");
            }
        }
        defaults
    });

    if let Ok(syms) = std::env::var("TRENDCAST_SYMBOLS") {
        config.symbols = syms
            .split(',')
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .collect();
    }
    if let Ok(addr) = std::env::var("TRENDCAST_BIND_ADDR") {
        config.bind_addr = addr;
    }

    info!(
        symbols = ?config.symbols,
        max_sessions = config.max_sessions,
        score_final_move = config.score_final_move,
        "Configuration resolved"
    );

    // ── 2. Shared state & API server ─────────────────────────────────────
    let bind_addr = config.bind_addr.clone();
    let state = Arc::new(AppState::new(config));
    let app = api::rest::router(state.clone());

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind API server on {bind_addr}"))?;
    info!(addr = %bind_addr, "API server listening");

    // ── 3. Serve until Ctrl+C ────────────────────────────────────────────
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "Failed to listen for shutdown signal");
            }
            warn!("Shutdown signal received, stopping gracefully");
        })
        .await
        .context("API server failed")?;

    info!(
        sessions = state.session_count(),
        uptime_secs = state.uptime_secs(),
        "Trendcast shut down complete."
    );
    Ok(())
}
