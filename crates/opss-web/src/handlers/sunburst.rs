//! Sunburst API. The tree is rebuilt from the shared tables on a blocking
//! thread for every request.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use opss_common::{ApiError, ApiResult};
use serde::Deserialize;

use crate::figure::{self, Figure};
use crate::state::SharedState;

#[derive(Debug, Default, Deserialize)]
pub struct SunburstRequest {
    /// Identifiers selected in the Layer Explorer.
    #[serde(default)]
    pub selected: Vec<String>,
    /// Identifier selected in the primary table, drawn in the highlight colour.
    pub highlight: Option<String>,
    pub show_lowest_layer: Option<bool>,
}

/// POST /dash/api/sunburst
pub async fn api_sunburst(
    State(state): State<SharedState>,
    Json(req): Json<SunburstRequest>,
) -> ApiResult<Json<Figure>> {
    let data = Arc::clone(&state.data);
    let max_depth = state.dashboard.max_depth;
    let show_lowest_layer = req.show_lowest_layer.unwrap_or(state.dashboard.show_lowest_layer);

    let figure = tokio::task::spawn_blocking(move || {
        figure::build(&data, &req.selected, req.highlight.as_deref(), show_lowest_layer, max_depth)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("sunburst computation failed: {e}")))?;

    Ok(Json(figure))
}
