//! Spawn rule data model
//!
//! Spawn rules are opaque JSON documents produced by an external generator. This
//! crate wraps them without changing their content and pulls out the handful of
//! scalar fields that the search service filters and sorts on.
//!
//! # Example
//!
//! ```rust
//! use spawndex_models::SpawnDocument;
//! use serde_json::json;
//!
//! let doc = SpawnDocument::from_value(json!({
//!     "id": "bulbasaur-1",
//!     "species": { "name": "Bulbasaur Alolan", "generation": 1 },
//!     "features": ["type_grass", "type_poison"],
//!     "bucket": "common",
//!     "level_min": 5
//! }))
//! .unwrap();
//!
//! let fields = doc.indexed_fields().unwrap();
//! assert_eq!(fields.canonical_name, "bulbasaur");
//! assert_eq!(fields.generation, Some(1));
//! ```

pub mod document;
pub mod error;

pub use document::{canonical_name, IndexedFields, SpawnDocument};
pub use error::{ModelError, Result};
