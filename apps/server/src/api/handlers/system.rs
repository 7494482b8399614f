//! Informational endpoints: health check and service root.

use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;

use crate::state::AppState;

pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "spawn-server",
        "backend": state.store.backend().as_str()
    }))
}

pub async fn root(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "server": "Spawn Rule Search API",
        "version": env!("CARGO_PKG_VERSION"),
        "backend": state.store.backend().as_str(),
        "ordering": state.store.default_ordering().as_str(),
        "status": "running"
    }))
}

pub async fn favicon() -> impl IntoResponse {
    axum::http::StatusCode::NO_CONTENT
}
