//! PostgreSQL-backed spawn rule store.
//!
//! Documents come back from the `data JSONB` column. JSONB normalises object
//! key order, so hits equal the loaded documents as JSON values but their keys
//! may be ordered differently.

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;
use std::str::FromStr;
use std::time::Duration;

use super::query_builder::{BindValue, QueryBuilder};
use super::schema::TableName;
use super::traits::{ResultOrdering, SpawnStore, StoreResult};
use crate::config::{BackendKind, DatabaseConfig};
use crate::search::Predicate;
use crate::{Error, Result};

#[derive(Clone)]
pub struct PostgresSpawnStore {
    pool: PgPool,
    table: TableName,
}

impl PostgresSpawnStore {
    pub fn new(pool: PgPool, table: TableName) -> Self {
        Self { pool, table }
    }

    /// Build the connection pool from configuration.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let table = TableName::parse(&config.table)?;
        let pool = create_pool(config).await?;
        Ok(Self::new(pool, table))
    }
}

/// Create a Postgres pool with the configured sizes and statement timeout.
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool> {
    let url = config
        .url
        .as_deref()
        .ok_or_else(|| Error::Config("database.url is not set".to_string()))?;

    let mut options = PgConnectOptions::from_str(url)?;
    if config.statement_timeout_seconds > 0 {
        options = options.options([(
            "statement_timeout",
            format!("{}", config.statement_timeout_seconds * 1000),
        )]);
    }

    let pool = PgPoolOptions::new()
        .min_connections(config.pool_min_size)
        .max_connections(config.pool_max_size)
        .acquire_timeout(Duration::from_secs(config.pool_timeout_seconds))
        .connect_with(options)
        .await?;

    Ok(pool)
}

#[async_trait]
impl SpawnStore for PostgresSpawnStore {
    fn backend(&self) -> BackendKind {
        BackendKind::Postgres
    }

    fn default_ordering(&self) -> ResultOrdering {
        ResultOrdering::LevelThenName
    }

    async fn filtered_search(&self, predicate: &Predicate, limit: u32) -> Result<StoreResult> {
        let (sql, bind_values) = QueryBuilder::new(&self.table, predicate, limit).build_sql();
        tracing::debug!(sql = %sql, binds = bind_values.len(), "Executing spawn search");

        let mut query = sqlx::query_scalar::<_, JsonValue>(&sql);
        for value in bind_values {
            query = match value {
                BindValue::Text(v) => query.bind(v),
                BindValue::Int(v) => query.bind(v),
                BindValue::BigInt(v) => query.bind(v),
            };
        }

        // One pooled connection per request; it goes back to the pool when
        // `conn` drops, on success and on error alike.
        let mut conn = self.pool.acquire().await?;
        let hits = query.fetch_all(&mut *conn).await?;

        Ok(StoreResult {
            hits,
            processing_time_ms: None,
        })
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
