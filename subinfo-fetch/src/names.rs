//! Display names for subscription URLs.
//!
//! A [`NameMapping`] is a list of `key=value` rules: the first key that
//! occurs anywhere in a URL gives that URL its display name. The mapping is
//! loaded once before a batch starts and only read afterwards, so it is
//! shared behind an `Arc` without locking.

use std::path::PathBuf;
use std::time::Duration;

use subinfo_core::UNKNOWN_NAME;
use tracing::{debug, info, instrument, warn};

use crate::error::FetchError;
use crate::host::HttpGet;

/// Default remote mapping list.
pub const DEFAULT_MAPPING_URL: &str =
    "https://raw.githubusercontent.com/Hyy800/Quantumult-X/refs/heads/Nana/ymys.txt";

// ============================================================================
// Name Mapping
// ============================================================================

/// Ordered substring-to-name rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameMapping {
    entries: Vec<(String, String)>,
}

impl NameMapping {
    /// Creates an empty mapping. Every URL resolves to `"Unknown"`.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parses `key=value` lines.
    ///
    /// Lines without `=`, lines starting with `#`, and lines with an empty
    /// key are skipped. A repeated key keeps its first position and takes
    /// the later value.
    pub fn parse(text: &str) -> Self {
        let mut mapping = Self::empty();
        for line in text.lines() {
            if line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            mapping.insert(key.trim(), value.trim());
        }
        mapping
    }

    /// Adds or updates one rule.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        if key.is_empty() {
            return;
        }
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Returns the display name for `url`, or `"Unknown"`.
    pub fn resolve(&self, url: &str) -> &str {
        self.entries
            .iter()
            .find(|(key, _)| url.contains(key.as_str()))
            .map_or(UNKNOWN_NAME, |(_, name)| name.as_str())
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no rules.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Downloads and parses a remote mapping list.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Http` on transport failure and
    /// `FetchError::Status` on a non-200 answer.
    #[instrument(skip(http))]
    pub async fn fetch(http: &dyn HttpGet, url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let response = http.get(url, timeout).await?;
        if !response.is_ok() {
            return Err(FetchError::Status(response.status));
        }
        Ok(Self::parse(&response.body))
    }

    /// Reads and parses a local mapping file. Invalid UTF-8 is replaced.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Io` if the file cannot be read.
    pub async fn load_file(path: &std::path::Path) -> Result<Self, FetchError> {
        let bytes = tokio::fs::read(path).await?;
        Ok(Self::parse(&String::from_utf8_lossy(&bytes)))
    }
}

// ============================================================================
// Mapping Source
// ============================================================================

/// Where the mapping comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappingSource {
    /// Remote `key=value` list.
    Remote(String),
    /// Local `key=value` file.
    File(PathBuf),
    /// No mapping; every name is `"Unknown"`.
    Disabled,
}

impl Default for MappingSource {
    fn default() -> Self {
        Self::Remote(DEFAULT_MAPPING_URL.to_string())
    }
}

impl MappingSource {
    /// Loads the mapping once.
    ///
    /// A load failure is logged and yields an empty mapping; it never
    /// aborts the caller.
    pub async fn load(&self, http: &dyn HttpGet, timeout: Duration) -> NameMapping {
        let result = match self {
            Self::Remote(url) => NameMapping::fetch(http, url, timeout).await,
            Self::File(path) => NameMapping::load_file(path).await,
            Self::Disabled => {
                debug!("Name mapping disabled");
                return NameMapping::empty();
            }
        };

        match result {
            Ok(mapping) => {
                info!(entries = mapping.len(), "Loaded name mapping");
                mapping
            }
            Err(e) => {
                warn!(source = ?self, error = %e, "Failed to load name mapping, names will be Unknown");
                NameMapping::empty()
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
