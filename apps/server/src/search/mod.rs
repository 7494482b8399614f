//! Filter composition and result shaping for `/search`.
//!
//! - `request`: query-string parsing and validation
//! - `predicate`: backend-neutral AND-only predicate
//! - `response`: the response envelope
//!
//! Rendering lives next to each backend (`db::query_builder` for SQL,
//! `search_engine::filter` for Meilisearch).

pub mod predicate;
pub mod request;
pub mod response;

pub use predicate::{Clause, Field, FilterValue, Op, Predicate};
pub use request::{SearchParams, SearchRequest, DEFAULT_LIMIT};
pub use response::SearchResponse;
