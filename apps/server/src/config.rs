//! Server configuration
//!
//! Configuration is layered, lowest priority first:
//! 1. Built-in defaults
//! 2. An optional `config.{yaml,toml,json}` in the working directory, or the file
//!    named by `SPAWNDEX_CONFIG`
//! 3. `SPAWNDEX__SECTION__KEY` environment variables
//!    (e.g. `SPAWNDEX__DATABASE__POOL_MAX_SIZE=20`)
//! 4. Conventional deployment variables: `DATABASE_URL`, `PORT`, `HOST`,
//!    `MEILI_URL`, `MEILI_MASTER_KEY`, `MEILI_INDEX`, `SEARCH_BACKEND`
//!
//! A `.env` file is read first (if present) so all of the above can live there.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{SocketAddr, ToSocketAddrs};
use std::str::FromStr;

use crate::db::schema::TableName;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub backend: BackendKind,
    pub database: DatabaseConfig,
    pub meilisearch: MeilisearchConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_request_body_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            max_request_body_size: 64 * 1024,
        }
    }
}

/// Which store answers `/search`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Postgres,
    Meilisearch,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Postgres => "postgres",
            BackendKind::Meilisearch => "meilisearch",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(BackendKind::Postgres),
            "meilisearch" | "meili" => Ok(BackendKind::Meilisearch),
            other => Err(format!(
                "unknown backend '{other}' (expected 'postgres' or 'meilisearch')"
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    /// Database used by integration tests; each test gets its own schema.
    pub test_database_url: Option<String>,
    pub table: String,
    pub pool_min_size: u32,
    pub pool_max_size: u32,
    pub pool_timeout_seconds: u64,
    pub statement_timeout_seconds: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            test_database_url: None,
            table: "spawns".to_string(),
            pool_min_size: 0,
            pool_max_size: 10,
            pool_timeout_seconds: 30,
            statement_timeout_seconds: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MeilisearchConfig {
    pub url: Option<String>,
    pub api_key: Option<String>,
    pub index: String,
    pub timeout_seconds: u64,
}

impl Default for MeilisearchConfig {
    fn default() -> Self {
        Self {
            url: None,
            api_key: None,
            index: "spawns".to_string(),
            timeout_seconds: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,

    pub file_enabled: bool,
    pub file_directory: String,
    pub file_prefix: String,
    /// `daily`, `hourly`, `minutely` or `never`
    pub file_rotation: String,

    pub opentelemetry_enabled: bool,
    pub otlp_endpoint: String,
    pub otlp_timeout_seconds: u64,
    pub trace_sample_ratio: f64,

    pub service_name: String,
    pub service_version: Option<String>,
    pub deployment_environment: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file_enabled: false,
            file_directory: "logs".to_string(),
            file_prefix: "spawn-server".to_string(),
            file_rotation: "daily".to_string(),
            opentelemetry_enabled: false,
            otlp_endpoint: "http://localhost:4317".to_string(),
            otlp_timeout_seconds: 10,
            trace_sample_ratio: 1.0,
            service_name: "spawn-server".to_string(),
            service_version: None,
            deployment_environment: "development".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from `.env`, config file and environment.
    pub fn load() -> anyhow::Result<Self> {
        // Missing .env is normal outside local development.
        let _ = dotenvy::dotenv();

        let file_source = match std::env::var("SPAWNDEX_CONFIG") {
            Ok(path) => config::File::with_name(&path).required(true),
            Err(_) => config::File::with_name("config").required(false),
        };

        let mut config: Config = config::Config::builder()
            .add_source(file_source)
            .add_source(
                config::Environment::with_prefix("SPAWNDEX")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to read configuration sources")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply the conventional deployment variables (`DATABASE_URL`, `PORT`, ...).
    ///
    /// `lookup` abstracts the environment so overrides can be tested.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = non_empty("DATABASE_URL") {
            self.database.url = Some(url);
        }
        if let Some(url) = non_empty("TEST_DATABASE_URL") {
            self.database.test_database_url = Some(url);
        }
        if let Some(host) = non_empty("HOST") {
            self.server.host = host;
        }
        if let Some(port) = non_empty("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .with_context(|| format!("PORT must be a valid port number, got '{port}'"))?;
        }
        if let Some(url) = non_empty("MEILI_URL") {
            self.meilisearch.url = Some(url);
        }
        if let Some(key) = non_empty("MEILI_MASTER_KEY") {
            self.meilisearch.api_key = Some(key);
        }
        if let Some(index) = non_empty("MEILI_INDEX") {
            self.meilisearch.index = index;
        }
        if let Some(backend) = non_empty("SEARCH_BACKEND") {
            self.backend = backend.parse().map_err(|e: String| anyhow::anyhow!(e))?;
        }

        Ok(())
    }

    /// Check the configuration is usable before anything connects.
    pub fn validate(&self) -> Result<(), String> {
        match self.backend {
            BackendKind::Postgres => {
                if self.database.url.as_deref().map_or(true, |u| u.trim().is_empty()) {
                    return Err(
                        "database.url is required for the postgres backend (set DATABASE_URL)"
                            .to_string(),
                    );
                }
            }
            BackendKind::Meilisearch => {
                if self
                    .meilisearch
                    .url
                    .as_deref()
                    .map_or(true, |u| u.trim().is_empty())
                {
                    return Err(
                        "meilisearch.url is required for the meilisearch backend (set MEILI_URL)"
                            .to_string(),
                    );
                }
                if self.meilisearch.index.trim().is_empty() {
                    return Err("meilisearch.index must not be empty".to_string());
                }
            }
        }

        TableName::parse(&self.database.table).map_err(|e| e.to_string())?;

        if self.database.pool_max_size == 0 {
            return Err("database.pool_max_size must be at least 1".to_string());
        }
        if self.database.pool_min_size > self.database.pool_max_size {
            return Err(format!(
                "database.pool_min_size ({}) exceeds database.pool_max_size ({})",
                self.database.pool_min_size, self.database.pool_max_size
            ));
        }
        if !(0.0..=1.0).contains(&self.logging.trace_sample_ratio) {
            return Err("logging.trace_sample_ratio must be between 0.0 and 1.0".to_string());
        }

        Ok(())
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        (self.server.host.as_str(), self.server.port)
            .to_socket_addrs()
            .with_context(|| {
                format!(
                    "Failed to resolve listen address {}:{}",
                    self.server.host, self.server.port
                )
            })?
            .next()
            .with_context(|| {
                format!(
                    "No socket address for {}:{}",
                    self.server.host, self.server.port
                )
            })
    }
}
