//! Prometheus metrics for the search server.

use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, HistogramVec, IntCounterVec,
};

lazy_static! {
    /// Total HTTP requests by method, path, and status
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "spawn_http_requests_total",
        "Total number of HTTP requests",
        &["method", "path", "status"]
    )
    .expect("Failed to register HTTP_REQUESTS_TOTAL");

    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "spawn_http_request_duration_seconds",
        "HTTP request duration in seconds",
        &["method", "path"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    )
    .expect("Failed to register HTTP_REQUEST_DURATION_SECONDS");

    /// Searches by backend and outcome (`success`, `client_error`, `backend_error`)
    pub static ref SEARCH_TOTAL: IntCounterVec = register_int_counter_vec!(
        "spawn_search_total",
        "Total number of search requests",
        &["backend", "status"]
    )
    .expect("Failed to register SEARCH_TOTAL");

    /// Hits returned per search (batch size, not total matches)
    pub static ref SEARCH_HITS: HistogramVec = register_histogram_vec!(
        "spawn_search_hits",
        "Number of hits returned by a search",
        &["backend"],
        vec![0.0, 1.0, 5.0, 10.0, 20.0, 50.0, 100.0]
    )
    .expect("Failed to register SEARCH_HITS");

    pub static ref BACKEND_QUERY_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "spawn_backend_query_duration_seconds",
        "Backend round-trip duration in seconds",
        &["backend"],
        vec![0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 10.0]
    )
    .expect("Failed to register BACKEND_QUERY_DURATION_SECONDS");
}

/// Collapse unknown paths so scanners can't blow up label cardinality.
pub fn sanitize_path(path: &str) -> String {
    match path.trim_end_matches('/') {
        "" => "/".to_string(),
        "/search" | "/health" | "/metrics" => path.trim_end_matches('/').to_string(),
        _ => "other".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_paths_keep_their_label() {
        assert_eq!(sanitize_path("/search"), "/search");
        assert_eq!(sanitize_path("/search/"), "/search");
        assert_eq!(sanitize_path("/"), "/");
        assert_eq!(sanitize_path("/health"), "/health");
    }

    #[test]
    fn unknown_paths_are_collapsed() {
        assert_eq!(sanitize_path("/wp-admin/setup.php"), "other");
        assert_eq!(sanitize_path("/search/extra"), "other");
    }
}
