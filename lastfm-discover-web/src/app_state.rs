use axum::{
    Json,
    response::{IntoResponse, Response},
};
use lastfm_discover_controls::{
    discovery::{Discovery, Section},
    render::{render_named_section, render_page},
};
use std::sync::Arc;
use tokio::sync::broadcast::Sender;

use crate::ServerSentEvent;

pub struct AppState {
    pub discovery: Arc<Discovery>,
    pub tx: Sender<ServerSentEvent>,
}

impl AppState {
    pub fn render_page(&self) -> Response {
        let state = self.discovery.snapshot();
        Json(render_page(&state)).into_response()
    }

    pub fn render_section(&self, section: Section) -> Response {
        let state = self.discovery.snapshot();
        Json(render_named_section(&state, section)).into_response()
    }
}
