//! Dashboard handler for the embedded explorer page under /dash/.

use axum::{extract::State, response::Html};
use minijinja::context;
use opss_common::ApiResult;

use crate::state::{SharedState, DASHBOARD_TEMPLATE};

pub async fn dashboard(State(state): State<SharedState>) -> ApiResult<Html<String>> {
    let html = state.render(
        DASHBOARD_TEMPLATE,
        context! {
            columns => state.data.columns(),
            page_size => state.dashboard.page_size,
            show_lowest_layer => state.dashboard.show_lowest_layer,
        },
    )?;
    Ok(Html(html))
}
