//! Search API Routes
//!
//! Both `/search` and `/search/` are served directly; no redirect.

use crate::api::handlers::search;
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn search_routes() -> Router<AppState> {
    Router::new()
        .route("/search", get(search::search_spawns))
        .route("/search/", get(search::search_spawns))
}
