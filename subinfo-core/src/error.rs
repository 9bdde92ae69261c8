//! Core error types for `SubInfo`.

use thiserror::Error;

/// Core error type for `SubInfo` operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A usage header field could not be read as a number.
    #[error("invalid usage header: {key}")]
    InvalidUsageHeader {
        /// The offending key, lower-cased.
        key: String,
        /// The raw value that failed to parse.
        value: String,
    },

    /// The subscription URL is not an absolute URL with a host.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}
