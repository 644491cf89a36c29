use std::sync::Arc;

use axum::{Router, extract::State, routing::post};

use crate::{AppState, ResponseResult, ok_or_error_response};

pub fn routes() -> Router<std::sync::Arc<crate::AppState>> {
    Router::new().route("/api/popular", post(reload))
}

async fn reload(State(state): State<Arc<AppState>>) -> ResponseResult {
    ok_or_error_response(state.discovery.load_popular().await)?;

    Ok(state.render_page())
}
