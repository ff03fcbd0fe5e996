//! OPSS dashboard server
//!
//! Run with: cargo run -p opss-web --bin opss

use std::net::SocketAddr;

use anyhow::Context;
use opss_data::DataContext;
use opss_web::config::Config;
use opss_web::router::build_router;
use opss_web::state::AppState;
use opss_web::telemetry;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load()?;
    let _telemetry = telemetry::init(&config.logging);

    info!("Starting OPSS dashboard...");
    match &config.source {
        Some(path) => info!("Loaded configuration from {}", path.display()),
        None => warn!("Config file not found, using defaults"),
    }
    if config.security.access_token.is_none() {
        warn!("No access token configured (set security.access_token or OPSS_ACCESS_TOKEN); gated pages will answer 403");
    }

    let data = DataContext::load_or_empty(&config.data.records_path, &config.data.edges_path);
    let addr = config.bind_addr();
    let state = AppState::from_config(config, data)?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;

    Ok(())
}
