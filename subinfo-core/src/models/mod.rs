//! Domain models for SubInfo.
//!
//! ## Submodules
//!
//! - [`usage`] - Quota counters from the usage header
//! - [`node`] - Node list summaries
//! - [`result`] - Per-URL fetch outcome

mod node;
mod result;
mod usage;

pub use node::NodeSummary;
pub use result::{FetchResult, UNKNOWN_NAME};
pub use usage::{parse_usage_header, UsageInfo, USAGE_HEADER};
