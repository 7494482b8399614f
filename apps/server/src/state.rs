//! Application state shared by all handlers.

use anyhow::Context;
use std::sync::Arc;

use crate::config::{BackendKind, Config};
use crate::db::{PostgresSpawnStore, SpawnStore};
use crate::search_engine::MeilisearchSpawnStore;
use crate::services::SearchService;

/// Cheap to clone; every handler gets its own copy.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn SpawnStore>,
    pub search_service: SearchService,
}

impl AppState {
    /// Connect the configured backend and verify it answers.
    ///
    /// Fails if the backend can't be reached: the server never starts serving
    /// with a broken store.
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = connect_store(&config).await?;

        store.ping().await.with_context(|| {
            format!("Backend '{}' is not reachable", config.backend.as_str())
        })?;

        Ok(Self::with_store(config, store))
    }

    /// Build state around an already-constructed store.
    pub fn with_store(config: Config, store: Arc<dyn SpawnStore>) -> Self {
        let search_service = SearchService::new(store.clone());
        Self {
            config: Arc::new(config),
            store,
            search_service,
        }
    }

    /// Release backend resources. Call once after the server has stopped.
    pub async fn shutdown(&self) {
        self.store.close().await;
    }
}

pub async fn connect_store(config: &Config) -> anyhow::Result<Arc<dyn SpawnStore>> {
    let store: Arc<dyn SpawnStore> = match config.backend {
        BackendKind::Postgres => Arc::new(
            PostgresSpawnStore::connect(&config.database)
                .await
                .context("Failed to connect to PostgreSQL")?,
        ),
        BackendKind::Meilisearch => Arc::new(
            MeilisearchSpawnStore::new(&config.meilisearch)
                .context("Failed to create Meilisearch client")?,
        ),
    };
    Ok(store)
}
