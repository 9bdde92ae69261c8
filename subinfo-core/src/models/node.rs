//! Node list summary types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Summary of the node list found in a subscription payload.
///
/// `classification` is either a region-frequency summary such as
/// `香港:2 | 日本:1` or a fixed label such as `5 generic nodes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSummary {
    /// Number of nodes in the payload.
    pub count: u32,
    /// Region breakdown or protocol label.
    pub classification: String,
}

impl NodeSummary {
    /// Creates a new node summary.
    pub fn new(count: u32, classification: impl Into<String>) -> Self {
        Self {
            count,
            classification: classification.into(),
        }
    }

    /// Creates a summary for an encoded node list, which carries no names
    /// worth classifying.
    pub fn generic(count: u32) -> Self {
        Self::new(count, format!("{count} generic nodes"))
    }
}

impl fmt::Display for NodeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} nodes ({})", self.count, self.classification)
    }
}
