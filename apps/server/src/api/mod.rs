//! API layer - routes, handlers, and middleware

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod routes;

use crate::state::AppState;
use axum::{extract::DefaultBodyLimit, routing::get, Router};

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    let max_body_size = state.config.server.max_request_body_size;

    Router::new()
        .route("/health", get(handlers::system::health_check))
        .route("/", get(handlers::system::root))
        // Returns 204 so browsers poking the API don't fill the logs with 404s
        .route("/favicon.ico", get(handlers::system::favicon))
        .merge(routes::search::search_routes())
        .merge(routes::metrics::metrics_routes())
        .with_state(state)
        // Applied in reverse order: request_id runs first and owns the root span.
        .layer(middleware::trace())
        .layer(axum::middleware::from_fn(middleware::metrics_middleware))
        .layer(middleware::compression())
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(DefaultBodyLimit::max(max_body_size))
}
