//! Axum router: maps all URL paths to handlers.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    services::ServeDir,
    trace::TraceLayer,
};
use std::sync::Arc;

use crate::auth::access_gate;
use crate::handlers::{
    dashboard::dashboard,
    layers::api_layers,
    pages::{about, home, sectors, services, standards, topics},
    records::api_records,
    stats::api_stats,
    sunburst::api_sunburst,
};
use crate::state::{AppState, SharedState};

/// Build and return the full Axum router.
pub fn build_router(state: AppState) -> Router {
    let static_dir = state.static_dir.clone();
    let shared: SharedState = Arc::new(state);

    Router::new()
        // Site pages (gated)
        .route("/",          get(home))
        .route("/standards", get(standards))
        .route("/services",  get(services))
        .route("/sectors",   get(sectors))
        .route("/topics",    get(topics))
        .route("/about",     get(about))

        // Dashboard and its API
        .route("/dash/",              get(dashboard))
        .route("/dash/api/records",   get(api_records))
        .route("/dash/api/layers",    post(api_layers))
        .route("/dash/api/sunburst",  post(api_sunburst))
        .route("/dash/api/stats",     get(api_stats))

        // Static files
        .nest_service("/static", ServeDir::new(static_dir))

        // Middleware
        .layer(middleware::from_fn_with_state(shared.clone(), access_gate))
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(shared)
}
