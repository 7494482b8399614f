//! Database layer - relational store, schema and SQL rendering

pub mod query_builder;
pub mod schema;
pub mod store;
pub mod traits;

pub use schema::TableName;
pub use store::{create_pool, PostgresSpawnStore};
pub use traits::{ResultOrdering, SpawnStore, StoreResult};
