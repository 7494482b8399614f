//! Middleware stack for the API

pub mod layers;
pub mod metrics;
pub mod request_id;

pub use layers::{compression, trace};
pub use metrics::metrics_middleware;
pub use request_id::request_id_middleware;
