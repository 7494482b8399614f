//! HTTP request handlers

pub mod metrics;
pub mod search;
pub mod system;
