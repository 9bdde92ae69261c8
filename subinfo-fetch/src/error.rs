//! Fetch error types.
//!
//! None of these escape a batch: the fetcher turns every [`FetchError`]
//! into a `FetchResult::Failure` carrying [`FetchError::reason`].

use std::time::Duration;

use subinfo_core::CoreError;
use thiserror::Error;

// ============================================================================
// Main Fetch Error
// ============================================================================

/// Error type for fetch operations.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport-level failure.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// Endpoint answered with a non-200 status.
    #[error("HTTP {0}")]
    Status(u16),

    /// Endpoint answered but exposes no usage header.
    #[error("no usage header")]
    MissingUsageHeader,

    /// Usage header or URL could not be interpreted.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Local file error (mapping file).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FetchError {
    /// Short description used as a per-URL failure reason.
    pub fn reason(&self) -> String {
        self.to_string()
    }
}

// ============================================================================
// HTTP Error
// ============================================================================

/// HTTP-specific error type.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Request error not covered by a more specific variant.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The call exceeded its deadline.
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// Could not connect to the host.
    #[error("connection failed: {0}")]
    Connect(String),

    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Build(String),
}

// ============================================================================
// Decode Error
// ============================================================================

/// Why a payload format did not match.
///
/// These never reach the caller; the decoder chain logs them and moves on.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Body is not a YAML document.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Document has no `proxies` sequence.
    #[error("no proxies list")]
    NoProxies,

    /// Body is not base64.
    #[error("base64 error: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Decoded bytes are not UTF-8.
    #[error("payload is not UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// Decoded text holds no `scheme://` lines.
    #[error("no node links")]
    NoLinks,

    /// Body is empty.
    #[error("empty payload")]
    Empty,
}
