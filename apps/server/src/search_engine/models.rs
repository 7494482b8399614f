//! Meilisearch wire types.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

pub const HIGHLIGHT_PRE_TAG: &str = "<strong>";
pub const HIGHLIGHT_POST_TAG: &str = "</strong>";
pub const HIGHLIGHT_ATTRIBUTES: [&str; 2] = ["species.name", "pokemon"];

/// Body of `POST /indexes/{index}/search`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchBody {
    /// Omitted for placeholder (match-all) searches.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    pub limit: u32,
    pub attributes_to_highlight: Vec<String>,
    pub highlight_pre_tag: String,
    pub highlight_post_tag: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub hits: Vec<JsonValue>,
    #[serde(default)]
    pub processing_time_ms: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexStats {
    pub number_of_documents: u64,
    #[serde(default)]
    pub is_indexing: bool,
}

/// Error body returned by Meilisearch on non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    pub message: String,
    #[serde(default)]
    pub code: Option<String>,
}
