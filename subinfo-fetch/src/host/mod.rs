//! Host APIs for the fetch pipeline.
//!
//! - [`http`] - HTTP client with tracing and per-call deadlines

pub mod http;

// Re-export key types
pub use http::{DEFAULT_USER_AGENT, HttpClient, HttpGet, HttpResponse};
