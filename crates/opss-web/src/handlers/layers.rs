//! Layer Explorer API.

use axum::extract::State;
use axum::Json;
use opss_common::ApiResult;
use opss_data::{ExplorerRow, Page};
use serde::Deserialize;

use crate::state::SharedState;

#[derive(Debug, Default, Deserialize)]
pub struct LayersRequest {
    #[serde(default)]
    pub identifiers: Vec<String>,
    #[serde(default)]
    pub page: usize,
    pub page_size: Option<usize>,
}

/// POST /dash/api/layers
pub async fn api_layers(
    State(state): State<SharedState>,
    Json(req): Json<LayersRequest>,
) -> ApiResult<Json<Page<ExplorerRow>>> {
    let page_size = req.page_size.unwrap_or(state.dashboard.page_size);
    Ok(Json(state.data.explorer_page(&req.identifiers, req.page, page_size)))
}
