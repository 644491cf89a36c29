use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, State},
    response::Response,
    routing::get,
};
use lastfm_discover_controls::discovery::Section;

use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/state", get(state))
        .route("/api/sections/{section}", get(section))
}

async fn state(State(state): State<Arc<AppState>>) -> Response {
    state.render_page()
}

async fn section(State(state): State<Arc<AppState>>, Path(section): Path<Section>) -> Response {
    state.render_section(section)
}
