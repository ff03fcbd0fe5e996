use axum::{extract::State, Json};
use serde::Serialize;

use crate::state::SharedState;

#[derive(Debug, Serialize)]
pub struct Stats {
    pub records: usize,
    pub edges: usize,
    pub standards: usize,
}

/// GET /dash/api/stats
pub async fn api_stats(State(state): State<SharedState>) -> Json<Stats> {
    let edges = state.data.edges();
    Json(Stats {
        records: state.data.records().len(),
        edges: edges.len(),
        standards: edges.standard_count(),
    })
}
