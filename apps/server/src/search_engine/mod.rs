//! Meilisearch-backed spawn rule store.
//!
//! Talks to the engine's REST API directly: one `POST /indexes/{index}/search`
//! per request. Hits come back in the engine's relevance order with
//! `_formatted` highlighting attached.

pub mod filter;
pub mod models;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use std::time::Duration;
use url::Url;

use crate::config::{BackendKind, MeilisearchConfig};
use crate::db::{ResultOrdering, SpawnStore, StoreResult};
use crate::search::Predicate;
use crate::{Error, Result};
use models::{ApiError, IndexStats, SearchResult};

pub struct MeilisearchSpawnStore {
    client: Client,
    base_url: Url,
    api_key: Option<String>,
    index: String,
}

impl MeilisearchSpawnStore {
    pub fn new(config: &MeilisearchConfig) -> Result<Self> {
        let raw_url = config
            .url
            .as_deref()
            .ok_or_else(|| Error::Config("meilisearch.url is not set".to_string()))?;
        let base_url = Url::parse(raw_url)
            .map_err(|e| Error::Config(format!("invalid meilisearch.url '{raw_url}': {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::Config(format!(
                "meilisearch.url '{raw_url}' is not a base URL"
            )));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key.clone().filter(|k| !k.is_empty()),
            index: config.index.clone(),
        })
    }

    /// Index statistics; used as the startup connectivity check.
    pub async fn stats(&self) -> Result<IndexStats> {
        let url = self.endpoint(&["indexes", self.index.as_str(), "stats"])?;
        let response = self.authorized(self.client.get(url)).send().await?;
        let response = check_status(response).await?;
        Ok(response.json().await?)
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::Config("meilisearch.url is not a base URL".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }
}

/// Turn a non-2xx response into `Error::SearchBackend` with the engine's message.
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ApiError>(&body) {
        Ok(err) => match err.code {
            Some(code) => format!("{} ({})", err.message, code),
            None => err.message,
        },
        Err(_) if body.is_empty() => "no response body".to_string(),
        Err(_) => body,
    };

    Err(Error::SearchBackend(format!(
        "Meilisearch returned {}: {}",
        status, message
    )))
}

#[async_trait]
impl SpawnStore for MeilisearchSpawnStore {
    fn backend(&self) -> BackendKind {
        BackendKind::Meilisearch
    }

    fn default_ordering(&self) -> ResultOrdering {
        ResultOrdering::Relevance
    }

    async fn filtered_search(&self, predicate: &Predicate, limit: u32) -> Result<StoreResult> {
        let body = filter::build_search_body(predicate, limit);
        tracing::debug!(
            index = %self.index,
            q = ?body.q,
            filter = ?body.filter,
            "Executing spawn search"
        );

        let url = self.endpoint(&["indexes", self.index.as_str(), "search"])?;
        let response = self
            .authorized(self.client.post(url))
            .json(&body)
            .send()
            .await?;
        let result: SearchResult = check_status(response).await?.json().await?;

        Ok(StoreResult {
            hits: result.hits,
            processing_time_ms: result.processing_time_ms,
        })
    }

    async fn ping(&self) -> Result<()> {
        let stats = self.stats().await?;
        tracing::info!(
            index = %self.index,
            documents = stats.number_of_documents,
            is_indexing = stats.is_indexing,
            "Connected to Meilisearch index"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_store(url: &str) -> Result<MeilisearchSpawnStore> {
        MeilisearchSpawnStore::new(&MeilisearchConfig {
            url: Some(url.to_string()),
            api_key: Some(String::new()),
            index: "spawns".to_string(),
            timeout_seconds: 5,
        })
    }

    #[test]
    fn endpoints_are_built_from_segments() {
        let store = make_store("http://127.0.0.1:7700").unwrap();
        assert_eq!(
            store
                .endpoint(&["indexes", "spawns", "search"])
                .unwrap()
                .as_str(),
            "http://127.0.0.1:7700/indexes/spawns/search"
        );

        let store = make_store("http://search.internal/meili/").unwrap();
        assert_eq!(
            store.endpoint(&["indexes", "spawns", "stats"]).unwrap().as_str(),
            "http://search.internal/meili/indexes/spawns/stats"
        );
    }

    #[test]
    fn empty_api_key_means_no_auth() {
        assert!(make_store("http://127.0.0.1:7700").unwrap().api_key.is_none());
    }

    #[test]
    fn invalid_urls_are_config_errors() {
        assert!(matches!(make_store("not a url"), Err(Error::Config(_))));
        assert!(matches!(make_store("mailto:ops@example.org"), Err(Error::Config(_))));
    }
}
