use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State},
    routing::get,
};
use serde::Deserialize;

use crate::{AppState, ResponseResult, ok_or_error_response};

pub fn routes() -> Router<std::sync::Arc<crate::AppState>> {
    Router::new().route("/api/search", get(search))
}

#[derive(Deserialize)]
struct SearchParameters {
    query: Option<String>,
}

/// An absent or blank query returns to the popular view.
async fn search(
    State(state): State<Arc<AppState>>,
    Query(parameters): Query<SearchParameters>,
) -> ResponseResult {
    let query = parameters.query.unwrap_or_default();

    ok_or_error_response(state.discovery.search(&query).await)?;

    Ok(state.render_page())
}
