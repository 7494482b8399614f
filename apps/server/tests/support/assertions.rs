use anyhow::Context as _;
use axum::http::StatusCode;
use serde_json::Value;

pub fn assert_status(actual: StatusCode, expected: StatusCode, context: &str) {
    assert_eq!(actual, expected, "{context}: unexpected status");
}

/// Hits array of a search response.
pub fn hits(response: &Value) -> anyhow::Result<&Vec<Value>> {
    response
        .get("hits")
        .and_then(|v| v.as_array())
        .context("response.hits is an array")
}

/// `id` of every hit, in response order.
pub fn hit_ids(response: &Value) -> anyhow::Result<Vec<String>> {
    Ok(hits(response)?
        .iter()
        .filter_map(|h| h.get("id").and_then(|v| v.as_str()).map(String::from))
        .collect())
}

/// Check the envelope invariants every search response must satisfy.
pub fn assert_envelope(response: &Value, expected_limit: u64) -> anyhow::Result<()> {
    let hits = hits(response)?;
    let nb_hits = response
        .get("nbHits")
        .and_then(|v| v.as_u64())
        .context("response.nbHits")?;
    let limit = response
        .get("limit")
        .and_then(|v| v.as_u64())
        .context("response.limit")?;

    assert_eq!(nb_hits as usize, hits.len(), "nbHits must equal hits.len()");
    assert_eq!(limit, expected_limit, "effective limit");
    assert!(hits.len() as u64 <= limit, "more hits than limit");
    assert!(
        response.get("processingTimeMs").and_then(|v| v.as_u64()).is_some(),
        "processingTimeMs is a non-negative integer"
    );
    assert!(response.get("query").is_some(), "query is always present");
    Ok(())
}

pub fn detail(response: &Value) -> anyhow::Result<&str> {
    response
        .get("detail")
        .and_then(|v| v.as_str())
        .context("error response has a detail string")
}
