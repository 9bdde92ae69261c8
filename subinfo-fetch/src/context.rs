//! Fetch context providing access to host APIs.
//!
//! The fetch context is shared by every fetch in a batch. It bundles the
//! HTTP capability, the loaded name mapping, and the runtime settings. All
//! three are read-only once the context is built.

use std::sync::Arc;
use std::time::Duration;

use crate::error::HttpError;
use crate::host::{DEFAULT_USER_AGENT, HttpClient, HttpGet};
use crate::names::NameMapping;

// ============================================================================
// Fetch Settings
// ============================================================================

/// Settings for fetch operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchSettings {
    /// Identifying client header.
    pub user_agent: String,
    /// Deadline for the usage request.
    pub request_timeout: Duration,
    /// Deadline for the node-list request.
    pub node_timeout: Duration,
    /// Deadline for loading the name mapping.
    pub mapping_timeout: Duration,
    /// Maximum simultaneous fetches.
    pub max_concurrent: usize,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout: Duration::from_secs(15),
            node_timeout: Duration::from_secs(10),
            mapping_timeout: Duration::from_secs(10),
            max_concurrent: 5,
        }
    }
}

impl FetchSettings {
    /// Sets both request deadlines.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self.node_timeout = timeout;
        self
    }

    /// Sets the concurrency ceiling. Zero is raised to one.
    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent.max(1);
        self
    }
}

// ============================================================================
// Fetch Context
// ============================================================================

/// Context shared by all fetches in a batch.
pub struct FetchContext {
    /// HTTP capability.
    pub http: Arc<dyn HttpGet>,
    /// URL-to-name rules.
    pub names: Arc<NameMapping>,
    /// Fetch settings.
    pub settings: FetchSettings,
}

impl FetchContext {
    /// Creates a context with the default HTTP client and no name mapping.
    ///
    /// # Errors
    ///
    /// Returns `HttpError::Build` if the HTTP client cannot be created.
    pub fn new() -> Result<Self, HttpError> {
        Self::builder().build()
    }

    /// Creates a builder for customizing the context.
    pub fn builder() -> FetchContextBuilder {
        FetchContextBuilder::new()
    }

    /// Returns the display name for a URL.
    pub fn display_name(&self, url: &str) -> String {
        self.names.resolve(url).to_string()
    }
}

impl std::fmt::Debug for FetchContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchContext")
            .field("names", &self.names.len())
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Fetch Context Builder
// ============================================================================

/// Builder for constructing a `FetchContext`.
#[derive(Default)]
pub struct FetchContextBuilder {
    http: Option<Arc<dyn HttpGet>>,
    names: Option<Arc<NameMapping>>,
    settings: FetchSettings,
}

impl FetchContextBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the HTTP implementation.
    pub fn http(mut self, http: Arc<dyn HttpGet>) -> Self {
        self.http = Some(http);
        self
    }

    /// Sets the name mapping.
    pub fn names(mut self, names: NameMapping) -> Self {
        self.names = Some(Arc::new(names));
        self
    }

    /// Sets the fetch settings.
    pub fn settings(mut self, settings: FetchSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Sets both request deadlines.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.settings = self.settings.with_timeout(timeout);
        self
    }

    /// Sets the concurrency ceiling.
    pub fn max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.settings = self.settings.with_max_concurrent(max_concurrent);
        self
    }

    /// Builds the fetch context, creating an [`HttpClient`] if none was set.
    ///
    /// # Errors
    ///
    /// Returns `HttpError::Build` if the default client cannot be created.
    pub fn build(self) -> Result<FetchContext, HttpError> {
        let http: Arc<dyn HttpGet> = match self.http {
            Some(http) => http,
            None => Arc::new(HttpClient::with_user_agent(&self.settings.user_agent)?),
        };

        Ok(FetchContext {
            http,
            names: self.names.unwrap_or_default(),
            settings: self.settings,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
