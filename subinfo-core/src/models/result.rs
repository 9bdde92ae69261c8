//! Per-URL fetch outcome.

use serde::{Deserialize, Serialize};

use super::node::NodeSummary;
use super::usage::UsageInfo;

/// Display name used when no mapping entry matches a URL.
pub const UNKNOWN_NAME: &str = "Unknown";

/// The outcome of querying one subscription URL.
///
/// Every requested URL yields exactly one of these. Failures are data:
/// they are rendered next to the successes rather than aborting a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FetchResult {
    /// The endpoint answered with usage data.
    Success {
        /// The subscription URL as supplied.
        url: String,
        /// Name resolved from the mapping table, or [`UNKNOWN_NAME`].
        display_name: String,
        /// Parsed usage counters.
        usage: UsageInfo,
        /// Node list summary, absent when the payload was undecodable.
        node: Option<NodeSummary>,
    },
    /// The endpoint could not be queried or exposed no usage data.
    Failure {
        /// The subscription URL as supplied.
        url: String,
        /// Short human-readable reason.
        reason: String,
    },
}

impl FetchResult {
    /// Creates a failure result.
    pub fn failure(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Failure {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Returns the URL this result belongs to.
    pub fn url(&self) -> &str {
        match self {
            Self::Success { url, .. } | Self::Failure { url, .. } => url,
        }
    }

    /// Returns true for the success variant.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Returns the usage counters of a success.
    pub fn usage(&self) -> Option<&UsageInfo> {
        match self {
            Self::Success { usage, .. } => Some(usage),
            Self::Failure { .. } => None,
        }
    }

    /// Returns the failure reason, if any.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { reason, .. } => Some(reason),
        }
    }
}
