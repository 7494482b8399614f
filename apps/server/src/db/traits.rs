//! Core trait for spawn rule search backends

use crate::{config::BackendKind, search::Predicate, Result};
use async_trait::async_trait;
use serde_json::Value as JsonValue;

/// How a backend orders its hits when the request doesn't say otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultOrdering {
    /// `level_min` descending, then canonical name ascending.
    LevelThenName,
    /// The engine's own relevance ranking.
    Relevance,
}

impl ResultOrdering {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResultOrdering::LevelThenName => "level_min desc, name asc",
            ResultOrdering::Relevance => "relevance",
        }
    }
}

/// Raw backend output, before it is shaped into a response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreResult {
    pub hits: Vec<JsonValue>,
    /// Processing time reported by the backend itself, if it reports one.
    pub processing_time_ms: Option<u64>,
}

/// A store that can answer filtered spawn rule searches.
///
/// Handlers only see `Arc<dyn SpawnStore>`; which implementation sits behind it
/// is decided once at startup. Implementations must not hold per-request state:
/// every call acquires what it needs and releases it before returning.
#[async_trait]
pub trait SpawnStore: Send + Sync {
    fn backend(&self) -> BackendKind;

    fn default_ordering(&self) -> ResultOrdering;

    /// Run `predicate` and return at most `limit` documents.
    ///
    /// # Errors
    /// Any backend failure (connectivity, malformed query, timeout). No retry
    /// is attempted.
    async fn filtered_search(&self, predicate: &Predicate, limit: u32) -> Result<StoreResult>;

    /// Cheap connectivity check used at startup.
    async fn ping(&self) -> Result<()>;

    /// Release pooled resources. Called once after the server stops.
    async fn close(&self) {}
}
