// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `SubInfo` Fetch
//!
//! Network side of the `SubInfo` subscription checker.
//!
//! ## Host APIs
//!
//! - [`host::http`] - The [`HttpGet`] capability and its reqwest client
//!
//! ## Pipeline
//!
//! - [`names::NameMapping`] - URL-substring to display-name rules, loaded once
//! - [`decode::PayloadDecoder`] - Ordered chain of node-list formats
//! - [`fetcher::SubscriptionFetcher`] - One URL to one [`FetchResult`]
//! - [`dispatch::BatchDispatcher`] - Bounded fan-out with input-ordered results
//! - [`context::FetchContext`] - Shared HTTP, names and settings
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use subinfo_fetch::{BatchDispatcher, FetchContext, HttpClient, MappingSource};
//!
//! let http = HttpClient::new()?;
//! let names = MappingSource::default().load(&http, Duration::from_secs(10)).await;
//! let ctx = FetchContext::builder().http(Arc::new(http)).names(names).build()?;
//!
//! let results = BatchDispatcher::from_context(Arc::new(ctx)).dispatch(&urls).await;
//! ```
//!
//! [`FetchResult`]: subinfo_core::FetchResult

pub mod context;
pub mod decode;
pub mod dispatch;
pub mod error;
pub mod fetcher;
pub mod host;
pub mod names;

#[cfg(test)]
mod testing;

// Errors
pub use error::{DecodeError, FetchError, HttpError};

// Host APIs
pub use host::{DEFAULT_USER_AGENT, HttpClient, HttpGet, HttpResponse};

// Pipeline
pub use context::{FetchContext, FetchContextBuilder, FetchSettings};
pub use decode::{DecodeAttempt, DecodeOutcome, FormatKind, PayloadDecoder, PayloadFormat};
pub use dispatch::{BatchDispatcher, dispatch};
pub use fetcher::SubscriptionFetcher;
pub use names::{DEFAULT_MAPPING_URL, MappingSource, NameMapping};
