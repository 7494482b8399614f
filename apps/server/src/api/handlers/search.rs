//! Search handler
//!
//! `GET /search?q=&limit=&type=&bucket=&gen=`
//!
//! - 200 with `{hits, query, processingTimeMs, limit, nbHits}`
//! - 400 when a filter value is malformed or `limit` is outside 1..=100
//! - 500 when the backend fails; the detail carries the backend's message

use axum::{extract::State, Extension, Json};

use crate::{
    api::extractors::SearchQuery, request_context::RequestContext, search::SearchResponse,
    state::AppState, Result,
};

pub async fn search_spawns(
    State(state): State<AppState>,
    context: Option<Extension<RequestContext>>,
    SearchQuery(params): SearchQuery,
) -> Result<Json<SearchResponse>> {
    let request_id = context.map(|Extension(ctx)| ctx.request_id);
    let response = state.search_service.search_params(params).await?;

    tracing::debug!(
        request_id = request_id.as_deref().unwrap_or("-"),
        nb_hits = response.nb_hits,
        "Search served"
    );

    Ok(Json(response))
}
