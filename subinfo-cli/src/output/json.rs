//! JSON output formatting.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use subinfo_core::{FetchResult, NodeSummary, UsageInfo};

// ============================================================================
// Output Types
// ============================================================================

/// JSON output for a whole batch.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchOutput {
    pub queried: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub results: Vec<ResultOutput>,
}

/// JSON output for one subscription link.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultOutput {
    pub url: String,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<UsageOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nodes: Option<NodesOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Traffic figures in bytes.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageOutput {
    pub upload: u64,
    pub download: u64,
    pub total: u64,
    pub used: u64,
    pub remaining: u64,
    pub percent_used: f64,
    pub permanent: bool,
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "serialize_datetime_opt")]
    pub expires_at: Option<DateTime<Utc>>,
}

/// Node count and region breakdown.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodesOutput {
    pub count: u32,
    pub classification: String,
}

impl From<&UsageInfo> for UsageOutput {
    fn from(usage: &UsageInfo) -> Self {
        Self {
            upload: usage.upload,
            download: usage.download,
            total: usage.total,
            used: usage.used(),
            remaining: usage.remaining(),
            percent_used: usage.percent_used(),
            permanent: usage.is_permanent(),
            expires_at: usage.expires_at(),
        }
    }
}

impl From<&NodeSummary> for NodesOutput {
    fn from(node: &NodeSummary) -> Self {
        Self {
            count: node.count,
            classification: node.classification.clone(),
        }
    }
}

impl From<&FetchResult> for ResultOutput {
    fn from(result: &FetchResult) -> Self {
        match result {
            FetchResult::Success {
                url,
                display_name,
                usage,
                node,
            } => Self {
                url: url.clone(),
                status: "ok",
                name: Some(display_name.clone()),
                usage: Some(usage.into()),
                nodes: node.as_ref().map(NodesOutput::from),
                error: None,
            },
            FetchResult::Failure { url, reason } => Self {
                url: url.clone(),
                status: "error",
                name: None,
                usage: None,
                nodes: None,
                error: Some(reason.clone()),
            },
        }
    }
}

// ============================================================================
// Serialization helpers
// ============================================================================

#[allow(clippy::ref_option)]
fn serialize_datetime_opt<S>(dt: &Option<DateTime<Utc>>, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match dt {
        Some(dt) => s.serialize_str(&dt.to_rfc3339()),
        None => s.serialize_none(),
    }
}

// ============================================================================
// JSON Formatter
// ============================================================================

/// JSON formatter.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Formats any serializable value.
    pub fn format<T: Serialize>(&self, data: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(data)?
        } else {
            serde_json::to_string(data)?
        };
        Ok(json)
    }

    /// Formats batch results, in input order.
    pub fn format_results(&self, results: &[FetchResult]) -> Result<String> {
        self.format(&Self::batch_output(results))
    }

    /// Builds the batch document.
    pub fn batch_output(results: &[FetchResult]) -> BatchOutput {
        let succeeded = results.iter().filter(|r| r.is_success()).count();
        BatchOutput {
            queried: results.len(),
            succeeded,
            failed: results.len() - succeeded,
            results: results.iter().map(ResultOutput::from).collect(),
        }
    }
}
