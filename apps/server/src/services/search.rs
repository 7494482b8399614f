//! Search service - ties request validation, the store and response shaping together.

use std::sync::Arc;
use std::time::Instant;

use crate::db::SpawnStore;
use crate::metrics::{BACKEND_QUERY_DURATION_SECONDS, SEARCH_HITS, SEARCH_TOTAL};
use crate::search::{Predicate, SearchParams, SearchRequest, SearchResponse};
use crate::Result;

#[derive(Clone)]
pub struct SearchService {
    store: Arc<dyn SpawnStore>,
}

impl SearchService {
    pub fn new(store: Arc<dyn SpawnStore>) -> Self {
        Self { store }
    }

    /// Validate raw query parameters and run the search.
    ///
    /// Invalid parameters fail here, before the store is touched.
    pub async fn search_params(&self, params: SearchParams) -> Result<SearchResponse> {
        let request = match SearchRequest::from_params(params) {
            Ok(request) => request,
            Err(e) => {
                SEARCH_TOTAL
                    .with_label_values(&[self.store.backend().as_str(), "client_error"])
                    .inc();
                return Err(e);
            }
        };
        self.search(request).await
    }

    #[tracing::instrument(
        name = "spawn_search",
        skip_all,
        fields(
            backend = %self.store.backend(),
            limit = request.limit,
            hits = tracing::field::Empty,
        )
    )]
    pub async fn search(&self, request: SearchRequest) -> Result<SearchResponse> {
        let backend = self.store.backend().as_str();
        let predicate = Predicate::from_request(&request);

        tracing::debug!(
            clauses = predicate.clauses().len(),
            ordering = self.store.default_ordering().as_str(),
            "Composed search predicate"
        );

        let start = Instant::now();
        let result = self.store.filtered_search(&predicate, request.limit).await;
        let elapsed = start.elapsed();

        BACKEND_QUERY_DURATION_SECONDS
            .with_label_values(&[backend])
            .observe(elapsed.as_secs_f64());

        match result {
            Ok(result) => {
                let response = SearchResponse::shape(&request, result, elapsed);
                SEARCH_TOTAL.with_label_values(&[backend, "success"]).inc();
                SEARCH_HITS
                    .with_label_values(&[backend])
                    .observe(response.nb_hits as f64);
                tracing::Span::current().record("hits", response.nb_hits);
                Ok(response)
            }
            Err(e) => {
                SEARCH_TOTAL
                    .with_label_values(&[backend, "backend_error"])
                    .inc();
                Err(e)
            }
        }
    }
}
