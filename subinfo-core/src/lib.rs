// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `SubInfo` Core
//!
//! Core types, parsers, and rendering for the `SubInfo` subscription
//! checker.
//!
//! This crate is free of I/O. It provides:
//!
//! - Domain models (usage counters, node summaries, per-URL results)
//! - Error types
//! - The usage header parser and byte-size formatting
//! - Region classification of node names
//! - URL extraction and de-duplication
//! - Report rendering with the inline/file delivery switch
//!
//! ## Key Types
//!
//! - [`UsageInfo`] - Counters from the `subscription-userinfo` header
//! - [`NodeSummary`] - Node count plus region breakdown or protocol label
//! - [`FetchResult`] - Success or failure for one URL
//! - [`RegionClassifier`] - Keyword-table bucketing of node names
//! - [`ReportAssembler`] - Markup/plain rendering and [`DeliveryMode`] choice

pub mod error;
pub mod format;
pub mod models;
pub mod region;
pub mod report;
pub mod urls;

// Re-export error types
pub use error::CoreError;

// Re-export all model types
pub use models::{parse_usage_header, FetchResult, NodeSummary, UsageInfo, UNKNOWN_NAME, USAGE_HEADER};

pub use format::{format_bytes, format_size};
pub use region::{RegionClassifier, RegionRule, NO_NODES, OTHER_REGION, REGION_RULES};
pub use report::{
    escape_markup, progress_bar, DeliveryMode, RenderMode, Report, ReportAssembler,
    DEFAULT_INLINE_LIMIT, PERMANENT_LABEL,
};
pub use urls::{dedupe_urls, extract_urls, validate_url};
