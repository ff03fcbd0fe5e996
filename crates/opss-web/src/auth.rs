//! Shared-secret access gate and usage logging.

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, Query, Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use opss_common::ApiError;
use serde::Deserialize;
use tracing::{info, warn};

use crate::state::SharedState;
use crate::telemetry::USAGE_TARGET;

pub const TOKEN_HEADER: &str = "x-access-token";

/// Prefixes served without a token and left out of the usage log.
const OPEN_PREFIXES: [&str; 2] = ["/static/", "/dash/"];

#[derive(Debug, Default, Deserialize)]
struct TokenQuery {
    token: Option<String>,
}

pub fn is_open_path(path: &str) -> bool {
    OPEN_PREFIXES.iter().any(|p| path.starts_with(p))
}

/// Token from the `X-Access-Token` header, else the `token` query parameter.
fn presented_token(request: &Request) -> Option<String> {
    if let Some(value) = request.headers().get(TOKEN_HEADER).and_then(|v| v.to_str().ok()) {
        return Some(value.to_string());
    }
    Query::<TokenQuery>::try_from_uri(request.uri())
        .ok()
        .and_then(|Query(q)| q.token)
}

fn client_ip(request: &Request) -> String {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

pub async fn access_gate(State(state): State<SharedState>, request: Request, next: Next) -> Response {
    let path = request.uri().path();
    if is_open_path(path) {
        return next.run(request).await;
    }

    if !state.token_matches(presented_token(&request).as_deref()) {
        warn!(path, ip = %client_ip(&request), "access denied");
        return ApiError::Forbidden.into_response();
    }

    info!(
        target: USAGE_TARGET,
        "IP: {}, URL: {}, Time: {}",
        client_ip(&request),
        request.uri(),
        Utc::now().format("%Y-%m-%d %H:%M:%S"),
    );
    next.run(request).await
}
