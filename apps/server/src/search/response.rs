//! Uniform response envelope for `/search`, whatever the backend.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::time::Duration;

use super::request::SearchRequest;
use crate::db::StoreResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    /// Matched documents, verbatim.
    pub hits: Vec<JsonValue>,
    /// `q` as the client sent it, `null` when omitted.
    pub query: Option<String>,
    pub processing_time_ms: u64,
    /// Effective limit applied to this request.
    pub limit: u32,
    /// Number of hits in *this* response.
    ///
    /// This is not the number of matching records in the store: when more
    /// records match than `limit`, `nbHits` still equals `hits.len()`. Clients
    /// that need a total have to page until a short batch comes back.
    pub nb_hits: usize,
}

impl SearchResponse {
    /// Build the envelope from a backend result.
    ///
    /// The engine-reported processing time is preferred; `elapsed` (measured
    /// around the store call) is used when the backend reports none.
    pub fn shape(request: &SearchRequest, result: StoreResult, elapsed: Duration) -> Self {
        let mut hits = result.hits;
        hits.truncate(request.limit as usize);

        let processing_time_ms = result
            .processing_time_ms
            .unwrap_or_else(|| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX));

        Self {
            nb_hits: hits.len(),
            hits,
            query: request.query.clone(),
            processing_time_ms,
            limit: request.limit,
        }
    }
}
