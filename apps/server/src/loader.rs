//! Bulk loader - one-shot ingestion of spawn rule documents into PostgreSQL
//!
//! The load is destructive and all-or-nothing:
//! 1. Read and validate every document before touching the database
//! 2. In one transaction: drop and recreate the table, insert in batches,
//!    build the secondary indexes
//! 3. Commit
//!
//! Any failure aborts the run. There is no resume; rerun the whole load.
//! Never run this against a table that is serving search traffic.

use serde_json::Value as JsonValue;
use spawndex_models::{IndexedFields, ModelError, SpawnDocument};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, Transaction};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::info;

use crate::db::TableName;

pub const DEFAULT_BATCH_SIZE: usize = 500;
pub const DEFAULT_SOURCE_FILE: &str = "all_spawns_processed_ENRICHED.json";
pub const DEFAULT_TABLE: &str = "spawns";

/// Columns per inserted row; Postgres caps a statement at 65535 bind parameters.
const COLUMNS_PER_ROW: usize = 7;
pub const MAX_BATCH_SIZE: usize = u16::MAX as usize / COLUMNS_PER_ROW;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("DATABASE_URL is not set (pass --database-url or set the environment variable)")]
    MissingDatabaseUrl,

    #[error("Invalid load configuration: {0}")]
    InvalidConfig(String),

    #[error("Cannot read source file {path}: {source}")]
    SourceFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Source file {path} is not a JSON array of documents: {source}")]
    MalformedJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Document #{index} is malformed: {source}")]
    MalformedDocument {
        index: usize,
        #[source]
        source: ModelError,
    },

    #[error("Document #{index} repeats id '{id}' (first seen at #{first_index})")]
    DuplicateId {
        index: usize,
        first_index: usize,
        id: String,
    },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl LoadError {
    /// Process exit status for this failure class.
    pub fn exit_code(&self) -> u8 {
        match self {
            LoadError::MissingDatabaseUrl | LoadError::InvalidConfig(_) => 2,
            LoadError::SourceFile { .. } => 3,
            LoadError::MalformedJson { .. }
            | LoadError::MalformedDocument { .. }
            | LoadError::DuplicateId { .. } => 4,
            LoadError::Database(_) => 5,
        }
    }
}

/// One table row: extracted columns plus the untouched document.
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnRow {
    pub fields: IndexedFields,
    pub data: JsonValue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub documents: usize,
    pub batches: usize,
    pub elapsed: Duration,
}

#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub source: PathBuf,
    pub database_url: Option<String>,
    pub table: String,
    pub batch_size: usize,
    /// Parse and extract only; never connect.
    pub dry_run: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            source: PathBuf::from(DEFAULT_SOURCE_FILE),
            database_url: None,
            table: DEFAULT_TABLE.to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            dry_run: false,
        }
    }
}

/// Run a complete load as described by `options`.
pub async fn run(options: &LoadOptions) -> Result<LoadReport, LoadError> {
    let started = Instant::now();

    let table =
        TableName::parse(&options.table).map_err(|e| LoadError::InvalidConfig(e.to_string()))?;
    check_batch_size(options.batch_size)?;

    let database_url = if options.dry_run {
        None
    } else {
        match options.database_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => Some(url.to_string()),
            _ => return Err(LoadError::MissingDatabaseUrl),
        }
    };

    info!(path = %options.source.display(), "Reading spawn documents");
    let documents = read_documents(&options.source)?;
    info!(documents = documents.len(), "Documents parsed");

    let rows = prepare_rows(documents)?;

    let Some(database_url) = database_url else {
        info!(
            documents = rows.len(),
            batches = rows.len().div_ceil(options.batch_size),
            "Dry run complete, database untouched"
        );
        return Ok(LoadReport {
            documents: rows.len(),
            batches: rows.len().div_ceil(options.batch_size),
            elapsed: started.elapsed(),
        });
    };

    info!(table = %table, "Connecting to PostgreSQL");
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&database_url)
        .await?;

    let loader = BulkLoader::new(pool.clone(), table, options.batch_size)?;
    let result = loader.load(&rows).await;
    pool.close().await;

    let mut report = result?;
    report.elapsed = started.elapsed();
    Ok(report)
}

/// Read a JSON array of documents from `path`.
pub fn read_documents(path: &Path) -> Result<Vec<SpawnDocument>, LoadError> {
    let content = std::fs::read_to_string(path).map_err(|source| LoadError::SourceFile {
        path: path.to_path_buf(),
        source,
    })?;

    let values: Vec<JsonValue> =
        serde_json::from_str(&content).map_err(|source| LoadError::MalformedJson {
            path: path.to_path_buf(),
            source,
        })?;

    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            SpawnDocument::from_value(value)
                .map_err(|source| LoadError::MalformedDocument { index, source })
        })
        .collect()
}

/// Extract indexed columns for every document; the first bad document fails the load.
///
/// Ids must be unique across the file, since `id` is the table's primary key.
pub fn prepare_rows(documents: Vec<SpawnDocument>) -> Result<Vec<SpawnRow>, LoadError> {
    let mut seen: HashMap<String, usize> = HashMap::with_capacity(documents.len());
    let mut rows = Vec::with_capacity(documents.len());

    for (index, doc) in documents.into_iter().enumerate() {
        let fields = doc
            .indexed_fields()
            .map_err(|source| LoadError::MalformedDocument { index, source })?;

        if let Some(&first_index) = seen.get(&fields.id) {
            return Err(LoadError::DuplicateId {
                index,
                first_index,
                id: fields.id,
            });
        }
        seen.insert(fields.id.clone(), index);

        rows.push(SpawnRow {
            fields,
            data: doc.into_value(),
        });
    }

    Ok(rows)
}

fn check_batch_size(batch_size: usize) -> Result<(), LoadError> {
    if batch_size == 0 || batch_size > MAX_BATCH_SIZE {
        return Err(LoadError::InvalidConfig(format!(
            "batch size must be between 1 and {MAX_BATCH_SIZE}, got {batch_size}"
        )));
    }
    Ok(())
}

pub struct BulkLoader {
    pool: PgPool,
    table: TableName,
    batch_size: usize,
}

impl BulkLoader {
    pub fn new(pool: PgPool, table: TableName, batch_size: usize) -> Result<Self, LoadError> {
        check_batch_size(batch_size)?;
        Ok(Self {
            pool,
            table,
            batch_size,
        })
    }

    /// Replace the table contents with `rows`.
    ///
    /// Everything runs in one transaction; on error nothing is committed and
    /// the previous table (if any) is left as it was.
    pub async fn load(&self, rows: &[SpawnRow]) -> Result<LoadReport, LoadError> {
        let started = Instant::now();
        let mut tx = self.pool.begin().await?;

        info!(table = %self.table, "Resetting table");
        sqlx::query(&self.table.drop_sql())
            .execute(&mut *tx)
            .await?;
        sqlx::query(&self.table.create_sql())
            .execute(&mut *tx)
            .await?;

        let total = rows.len();
        let mut inserted = 0usize;
        let mut batches = 0usize;
        for batch in rows.chunks(self.batch_size) {
            self.insert_batch(&mut tx, batch).await?;
            inserted += batch.len();
            batches += 1;
            info!(inserted, total, "Inserted batch {}", batches);
        }

        info!("Creating indexes");
        for sql in self.table.index_sql() {
            sqlx::query(&sql).execute(&mut *tx).await?;
        }

        tx.commit().await?;

        info!(
            documents = inserted,
            batches,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Load committed"
        );

        Ok(LoadReport {
            documents: inserted,
            batches,
            elapsed: started.elapsed(),
        })
    }

    async fn insert_batch(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        batch: &[SpawnRow],
    ) -> Result<(), LoadError> {
        let mut builder = sqlx::QueryBuilder::<Postgres>::new(format!(
            "INSERT INTO {} (id, pokemon_name, features, generation, bucket, level_min, data) ",
            self.table
        ));
        builder.push_values(batch, |mut row, spawn| {
            row.push_bind(spawn.fields.id.as_str())
                .push_bind(spawn.fields.canonical_name.as_str())
                .push_bind(spawn.fields.features.as_slice())
                .push_bind(spawn.fields.generation)
                .push_bind(spawn.fields.bucket.as_deref())
                .push_bind(spawn.fields.level_min)
                .push_bind(&spawn.data);
        });

        builder.build().execute(&mut **tx).await?;
        Ok(())
    }
}
