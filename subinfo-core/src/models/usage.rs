//! Usage-related types.
//!
//! This module contains the quota data carried by the
//! `subscription-userinfo` response header:
//! - [`UsageInfo`] - Upload/download/total counters and expiry
//! - [`parse_usage_header`] - Raw `key=value; ...` header splitting

use std::collections::HashMap;

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Conventional name of the usage header.
pub const USAGE_HEADER: &str = "subscription-userinfo";

// ============================================================================
// Header Parsing
// ============================================================================

/// Splits a usage header into a lower-cased key to value map.
///
/// Segments are separated by `;` and split on the first `=`. Keys are
/// trimmed and lower-cased, values are trimmed. Segments without `=` are
/// dropped. Numeric coercion is left to [`UsageInfo::from_fields`].
pub fn parse_usage_header(header: &str) -> HashMap<String, String> {
    header
        .split(';')
        .filter_map(|part| part.split_once('='))
        .map(|(key, value)| (key.trim().to_lowercase(), value.trim().to_string()))
        .collect()
}

/// Reads a counter value.
///
/// Plain integers are the common case. Some panels emit decimal or
/// scientific notation, which is accepted when finite and non-negative and
/// then truncated.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn parse_counter(key: &str, value: &str) -> Result<u64, CoreError> {
    if let Ok(n) = value.parse::<u64>() {
        return Ok(n);
    }
    match value.parse::<f64>() {
        Ok(f) if f.is_finite() && f >= 0.0 => Ok(f as u64),
        _ => Err(CoreError::InvalidUsageHeader {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

#[allow(clippy::cast_possible_truncation)]
fn parse_timestamp(key: &str, value: &str) -> Result<i64, CoreError> {
    if let Ok(n) = value.parse::<i64>() {
        return Ok(n);
    }
    match value.parse::<f64>() {
        Ok(f) if f.is_finite() => Ok(f as i64),
        _ => Err(CoreError::InvalidUsageHeader {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

// ============================================================================
// Usage Info
// ============================================================================

/// Quota counters reported by a subscription endpoint.
///
/// All byte counters default to 0 when absent from the header. An `expire`
/// of 0 (or below) means the subscription has no expiry date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UsageInfo {
    /// Uploaded bytes.
    pub upload: u64,
    /// Downloaded bytes.
    pub download: u64,
    /// Quota in bytes.
    pub total: u64,
    /// Expiry as Unix seconds, 0 when permanent or unknown.
    pub expire: i64,
}

impl UsageInfo {
    /// Parses a raw `subscription-userinfo` header value.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidUsageHeader` if a known key carries a value
    /// that is not a number.
    pub fn from_header(header: &str) -> Result<Self, CoreError> {
        Self::from_fields(&parse_usage_header(header))
    }

    /// Builds usage info from an already split header.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidUsageHeader` if a known key carries a value
    /// that is not a number.
    pub fn from_fields(fields: &HashMap<String, String>) -> Result<Self, CoreError> {
        let counter = |key: &str| {
            fields
                .get(key)
                .map_or(Ok(0), |value| parse_counter(key, value))
        };

        Ok(Self {
            upload: counter("upload")?,
            download: counter("download")?,
            total: counter("total")?,
            expire: fields
                .get("expire")
                .map_or(Ok(0), |value| parse_timestamp("expire", value))?,
        })
    }

    /// Returns upload + download.
    pub fn used(&self) -> u64 {
        self.upload.saturating_add(self.download)
    }

    /// Returns the remaining quota, clamped at zero.
    pub fn remaining(&self) -> u64 {
        self.total.saturating_sub(self.used())
    }

    /// Returns the used share of the quota in percent, rounded to 2 decimals.
    ///
    /// This is not clamped: an account that went over its quota reports
    /// more than 100. Returns 0 when the total is unknown.
    #[allow(clippy::cast_precision_loss)]
    pub fn percent_used(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let pct = self.used() as f64 / self.total as f64 * 100.0;
        (pct * 100.0).round() / 100.0
    }

    /// Returns true when the subscription has no expiry date.
    pub fn is_permanent(&self) -> bool {
        self.expire <= 0
    }

    /// Returns the expiry instant, if any.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        if self.is_permanent() {
            return None;
        }
        DateTime::from_timestamp(self.expire, 0)
    }

    /// Returns the expiry as a local `YYYY-MM-DD` date.
    pub fn expiry_date(&self) -> Option<String> {
        self.expires_at()
            .map(|at| at.with_timezone(&Local).format("%Y-%m-%d").to_string())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_header_basic() {
        let fields = parse_usage_header("upload=100; download=200; total=1000; expire=0");
        assert_eq!(fields.get("upload").map(String::as_str), Some("100"));
        assert_eq!(fields.get("download").map(String::as_str), Some("200"));
        assert_eq!(fields.get("total").map(String::as_str), Some("1000"));
        assert_eq!(fields.get("expire").map(String::as_str), Some("0"));
    }

    #[test]
    fn test_parse_header_normalizes_keys() {
        let fields = parse_usage_header("  Upload = 5 ;DOWNLOAD=7");
        assert_eq!(fields.get("upload").map(String::as_str), Some("5"));
        assert_eq!(fields.get("download").map(String::as_str), Some("7"));
    }

    #[test]
    fn test_parse_header_drops_segments_without_equals() {
        let fields = parse_usage_header("garbage; upload=1; ;");
        assert_eq!(fields.len(), 1);
        assert!(fields.contains_key("upload"));
    }

    #[test]
    fn test_parse_header_splits_on_first_equals() {
        let fields = parse_usage_header("note=a=b");
        assert_eq!(fields.get("note").map(String::as_str), Some("a=b"));
    }

    #[test]
    fn test_parse_header_roundtrip() {
        let original = parse_usage_header("upload=1;download=2;total=3;expire=4");
        let mut keys: Vec<_> = original.keys().collect();
        keys.sort();
        let formatted = keys
            .iter()
            .map(|k| format!("{k}={}", original[*k]))
            .collect::<Vec<_>>()
            .join("; ");
        assert_eq!(parse_usage_header(&formatted), original);
    }

    #[test]
    fn test_usage_from_header() {
        let usage = UsageInfo::from_header("upload=100;download=200;total=1000;expire=0").unwrap();
        assert_eq!(usage.used(), 300);
        assert_eq!(usage.remaining(), 700);
        assert_eq!(usage.percent_used(), 30.0);
        assert!(usage.is_permanent());
        assert!(usage.expiry_date().is_none());
    }

    #[test]
    fn test_usage_missing_keys_default_to_zero() {
        let usage = UsageInfo::from_header("download=42").unwrap();
        assert_eq!(usage.upload, 0);
        assert_eq!(usage.download, 42);
        assert_eq!(usage.total, 0);
        assert_eq!(usage.percent_used(), 0.0);
        assert_eq!(usage.remaining(), 0);
    }

    #[test]
    fn test_usage_over_quota_is_not_clamped() {
        let usage = UsageInfo {
            upload: 1500,
            download: 500,
            total: 1000,
            expire: 0,
        };
        assert_eq!(usage.remaining(), 0);
        assert_eq!(usage.percent_used(), 200.0);
    }

    #[test]
    fn test_usage_percent_rounding() {
        let usage = UsageInfo {
            upload: 1,
            download: 0,
            total: 3,
            expire: 0,
        };
        assert_eq!(usage.percent_used(), 33.33);
    }

    #[test]
    fn test_usage_accepts_scientific_notation() {
        let usage = UsageInfo::from_header("total=1.073741824E10; upload=12.0").unwrap();
        assert_eq!(usage.total, 10_737_418_240);
        assert_eq!(usage.upload, 12);
    }

    #[test]
    fn test_usage_rejects_garbage() {
        let err = UsageInfo::from_header("upload=abc; total=10").unwrap_err();
        assert_eq!(err.to_string(), "invalid usage header: upload");

        assert!(UsageInfo::from_header("total=-5").is_err());
    }

    #[test]
    fn test_usage_expiry() {
        let usage = UsageInfo::from_header("expire=1735689600").unwrap();
        assert!(!usage.is_permanent());
        assert_eq!(usage.expires_at().unwrap().timestamp(), 1_735_689_600);
        let expected = usage
            .expires_at()
            .unwrap()
            .with_timezone(&Local)
            .format("%Y-%m-%d")
            .to_string();
        assert_eq!(usage.expiry_date(), Some(expected));

        let negative = UsageInfo::from_header("expire=-1").unwrap();
        assert!(negative.is_permanent());
    }
}
