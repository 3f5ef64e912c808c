// =============================================================================
// Dip & Rally Analyst — Main Entry Point
// =============================================================================
//
// Serves contrarian technical analysis of spot pairs over a small read-only
// REST API. Every analysis is computed on request from public kline data.
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod analysis;
mod api;
mod app_state;
mod binance;
mod catalog;
mod error;
mod indicators;
mod market_data;
mod runtime_config;
mod signals;
#[cfg(test)]
mod test_support;

use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::app_state::AppState;
use crate::runtime_config::AnalystConfig;

const CONFIG_PATH: &str = "analyst_config.json";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Dip & Rally Analyst starting up");

    let mut config = AnalystConfig::load(CONFIG_PATH).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        AnalystConfig::default()
    });
    config.apply_overrides(|name| std::env::var(name).ok());

    info!(
        interval = %config.interval,
        limit = config.limit,
        instruments = config.instruments.len(),
        "Analysis settings"
    );

    // ── 2. Build shared state ────────────────────────────────────────────
    let bind_addr = config.bind_addr.clone();
    let state = Arc::new(AppState::new(config).context("failed to build application state")?);

    // ── 3. Cache sweeper ─────────────────────────────────────────────────
    if state.cache.is_enabled() {
        let sweep_state = state.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(sweep_state.cache.ttl());
            loop {
                interval.tick().await;
                let purged = sweep_state.cache.purge_expired(Instant::now());
                if purged > 0 {
                    debug!(purged, remaining = sweep_state.cache.len(), "kline cache swept");
                }
            }
        });
    }

    // ── 4. API server ────────────────────────────────────────────────────
    let app = api::rest::router(state);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind API server on {bind_addr}"))?;
    info!(addr = %bind_addr, "API server listening. Press Ctrl+C to stop.");

    // ── 5. Graceful shutdown ─────────────────────────────────────────────
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "Failed to listen for Ctrl+C");
            }
            warn!("Shutdown signal received — stopping gracefully");
        })
        .await
        .context("API server failed")?;

    info!("Dip & Rally Analyst shut down complete.");
    Ok(())
}
