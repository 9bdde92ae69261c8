//! Configuration management.
//!
//! Settings live in a single JSON file. Every field has a default, so a
//! partial file only overrides what it names and a missing file means
//! "all defaults".

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use subinfo_core::DEFAULT_INLINE_LIMIT;
use subinfo_fetch::{DEFAULT_MAPPING_URL, DEFAULT_USER_AGENT, FetchSettings, MappingSource};
use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::persistence::{default_settings_path, load_json, save_json};

/// Application settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Maximum simultaneous subscription fetches.
    pub max_concurrent: usize,
    /// Deadline for the usage request, in seconds.
    pub request_timeout_secs: u64,
    /// Deadline for the node-list request, in seconds.
    pub node_timeout_secs: u64,
    /// Deadline for loading the name mapping, in seconds.
    pub mapping_timeout_secs: u64,
    /// Identifying client header.
    pub user_agent: String,
    /// Remote name mapping list. `null` disables the remote source.
    pub mapping_url: Option<String>,
    /// Local name mapping file, used instead of `mapping_url` when set.
    pub mapping_file: Option<PathBuf>,
    /// Reports at or above this many characters are written to a file.
    pub inline_limit: usize,
    /// Directory for file reports.
    pub output_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_concurrent: 5,
            request_timeout_secs: 15,
            node_timeout_secs: 10,
            mapping_timeout_secs: 10,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            mapping_url: Some(DEFAULT_MAPPING_URL.to_string()),
            mapping_file: None,
            inline_limit: DEFAULT_INLINE_LIMIT,
            output_dir: PathBuf::from("."),
        }
    }
}

impl Settings {
    /// Returns the default settings file path.
    pub fn default_path() -> PathBuf {
        default_settings_path()
    }

    /// Loads settings from a specific path.
    ///
    /// A missing file yields defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed, or
    /// holds unusable values.
    pub async fn load_from(path: &Path) -> Result<Self, StoreError> {
        let settings: Self = match load_json(path).await {
            Ok(settings) => settings,
            Err(e) if e.is_not_found() => {
                debug!(path = %path.display(), "Settings file not found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(e),
        };

        settings.validate()?;
        info!(path = %path.display(), "Loaded settings");
        Ok(settings)
    }

    /// Loads settings, falling back to defaults on any error.
    pub async fn load_or_default(path: &Path) -> Self {
        match Self::load_from(path).await {
            Ok(settings) => settings,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Invalid settings file, using defaults");
                Self::default()
            }
        }
    }

    /// Saves settings to a specific path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub async fn save_to(&self, path: &Path) -> Result<(), StoreError> {
        save_json(path, self).await?;
        info!(path = %path.display(), "Saved settings");
        Ok(())
    }

    /// Checks that the values can drive a run.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Config` naming the first bad field.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.max_concurrent == 0 {
            return Err(StoreError::Config("max_concurrent must be at least 1".into()));
        }
        if self.request_timeout_secs == 0 || self.node_timeout_secs == 0 {
            return Err(StoreError::Config("timeouts must be at least 1 second".into()));
        }
        if self.inline_limit == 0 {
            return Err(StoreError::Config("inline_limit must be at least 1".into()));
        }
        Ok(())
    }

    /// Runtime settings for the fetch pipeline.
    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            user_agent: self.user_agent.clone(),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            node_timeout: Duration::from_secs(self.node_timeout_secs),
            mapping_timeout: Duration::from_secs(self.mapping_timeout_secs),
            max_concurrent: self.max_concurrent.max(1),
        }
    }

    /// Where to load the name mapping from. A local file wins over a URL.
    pub fn mapping_source(&self) -> MappingSource {
        match (&self.mapping_file, &self.mapping_url) {
            (Some(path), _) => MappingSource::File(path.clone()),
            (None, Some(url)) if !url.trim().is_empty() => MappingSource::Remote(url.clone()),
            _ => MappingSource::Disabled,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
