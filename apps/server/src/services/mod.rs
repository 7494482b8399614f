//! Service layer - business logic between handlers and stores

pub mod search;

pub use search::SearchService;
