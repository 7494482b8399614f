//! Spawndex - spawn rule search service
//!
//! - Filter composition from query parameters into one predicate
//! - Result shaping over a PostgreSQL or Meilisearch backend
//! - Bulk loading of spawn documents into PostgreSQL

#![allow(
    clippy::large_enum_variant,      // Error variants wrap backend errors directly
)]

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod loader;
pub mod logging;
pub mod metrics;
pub mod request_context;
pub mod search;
pub mod search_engine;
pub mod services;
pub mod state;

pub use config::Config;
pub use error::{Error, Result};
pub use state::AppState;
