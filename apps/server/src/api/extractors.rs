//! Custom Axum extractors.

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::request::Parts,
};

use crate::search::SearchParams;

/// Query string of `/search`.
///
/// Wraps `Query` so that undecodable query strings (e.g. a repeated `limit`)
/// come back as our own 400 `{"detail": ...}` body instead of axum's plain-text
/// rejection.
pub struct SearchQuery(pub SearchParams);

#[async_trait]
impl<S> FromRequestParts<S> for SearchQuery
where
    S: Send + Sync,
{
    type Rejection = crate::Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<SearchParams>::from_request_parts(parts, state)
            .await
            .map_err(|e| crate::Error::Validation(e.body_text()))?;
        Ok(SearchQuery(params))
    }
}
