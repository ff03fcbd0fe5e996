//! Primary table API.

use axum::extract::{Query, State};
use axum::Json;
use opss_common::{ApiResult, StandardRecord};
use opss_data::records::clamp_page_size;
use opss_data::{Page, RecordQuery, SortKey};
use serde::{Deserialize, Serialize};

use crate::state::SharedState;

#[derive(Debug, Default, Deserialize)]
pub struct RecordsParams {
    pub search: Option<String>,
    /// `Column:asc,Column:desc`
    pub sort: Option<String>,
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct RecordsResponse {
    pub columns: Vec<String>,
    #[serde(flatten)]
    pub page: Page<StandardRecord>,
}

/// GET /dash/api/records
pub async fn api_records(
    State(state): State<SharedState>,
    Query(params): Query<RecordsParams>,
) -> ApiResult<Json<RecordsResponse>> {
    let columns = state.data.columns().to_vec();
    let sort = match params.sort.as_deref() {
        Some(raw) => SortKey::parse_list(raw, &columns)?,
        None => Vec::new(),
    };
    let query = RecordQuery {
        search: params.search.unwrap_or_default(),
        sort,
        page: params.page.unwrap_or(0),
        page_size: clamp_page_size(params.page_size.unwrap_or(state.dashboard.page_size)),
    };

    let page = state.data.query_records(&query).map(|r| r.clone());
    Ok(Json(RecordsResponse { columns, page }))
}
