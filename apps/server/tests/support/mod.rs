#![allow(dead_code, unused_imports)]

pub mod assertions;
pub mod fixtures;
pub mod memory_store;

use anyhow::Context as _;
use axum::{
    body::{Body, Bytes},
    http::{HeaderMap, HeaderName, HeaderValue, Method, Request, StatusCode},
    Router,
};
use std::sync::Arc;
use spawndex::{api::create_router, db::SpawnStore, AppState, Config};
use tower::ServiceExt as _;

pub use assertions::*;
pub use fixtures::*;
pub use memory_store::*;

/// Router wired to an arbitrary store, no network or database involved.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

impl TestApp {
    pub fn new(store: Arc<dyn SpawnStore>) -> Self {
        Self::new_with_config(store, |_| {})
    }

    pub fn new_with_config(store: Arc<dyn SpawnStore>, configure: impl FnOnce(&mut Config)) -> Self {
        init_tracing();

        let mut config = Config::default();
        configure(&mut config);

        let state = AppState::with_store(config, store);
        let router = create_router(state.clone());
        Self { router, state }
    }

    /// App over an in-memory store holding `documents`.
    pub fn with_documents(documents: Vec<serde_json::Value>) -> Self {
        Self::new(Arc::new(MemoryStore::new(documents)))
    }

    pub async fn get(&self, path_and_query: &str) -> anyhow::Result<(StatusCode, HeaderMap, Bytes)> {
        self.request_with_extra_headers(Method::GET, path_and_query, &[])
            .await
    }

    pub async fn request_with_extra_headers(
        &self,
        method: Method,
        path_and_query: &str,
        extra_headers: &[(&str, &str)],
    ) -> anyhow::Result<(StatusCode, HeaderMap, Bytes)> {
        let mut request = Request::builder()
            .method(method)
            .uri(path_and_query)
            .header("host", "example.org")
            .header("accept", "application/json")
            .body(Body::empty())
            .context("build request")?;

        for (name, value) in extra_headers {
            request.headers_mut().insert(
                name.parse::<HeaderName>().context("parse header name")?,
                value.parse::<HeaderValue>().context("parse header value")?,
            );
        }

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .context("dispatch request")?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .context("read response body")?;

        Ok((status, headers, body))
    }

    /// GET and parse the body as JSON.
    pub async fn get_json(&self, path_and_query: &str) -> anyhow::Result<(StatusCode, serde_json::Value)> {
        let (status, _headers, body) = self.get(path_and_query).await?;
        let json = serde_json::from_slice(&body)
            .with_context(|| format!("parse JSON body of {path_and_query}"))?;
        Ok((status, json))
    }
}

fn init_tracing() {
    use std::sync::OnceLock;
    use tracing_subscriber::prelude::*;
    static INIT: OnceLock<()> = OnceLock::new();
    INIT.get_or_init(|| {
        let _ = tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "spawndex=info,sqlx=warn".into()),
            )
            .with(tracing_subscriber::fmt::layer().with_test_writer())
            .try_init();
    });
}
