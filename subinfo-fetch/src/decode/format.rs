//! Payload formats understood by the decoder chain.
//!
//! A format represents one way a subscription body can describe its node
//! list. The [`PayloadDecoder`](super::PayloadDecoder) tries formats in
//! order until one matches.

use std::fmt;

use base64::engine::general_purpose::{STANDARD, URL_SAFE};
use base64::Engine;
use serde_yaml::Value;
use subinfo_core::{NodeSummary, RegionClassifier};

use crate::error::DecodeError;

/// Substring that marks a line as a node link.
const LINK_DELIMITER: &str = "://";

// ============================================================================
// Format Kind
// ============================================================================

/// The shape of payload a format decodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatKind {
    /// YAML proxy-client config with a `proxies` sequence.
    Structured,
    /// Base64 blob of newline-separated node links.
    EncodedList,
}

impl FormatKind {
    /// Returns the display name for this kind.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Structured => "Structured config",
            Self::EncodedList => "Encoded list",
        }
    }
}

impl fmt::Display for FormatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ============================================================================
// Payload Format Trait
// ============================================================================

/// One way of reading a node list out of a subscription body.
///
/// A format returns `Err` when the body is not in its shape. The error is
/// only logged; it never fails the fetch.
pub trait PayloadFormat: Send + Sync {
    /// Unique identifier, e.g. `"yaml.proxies"`.
    fn id(&self) -> &str;

    /// The kind of payload this format reads.
    fn kind(&self) -> FormatKind;

    /// Attempts to summarize the node list in `body`.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] when the body does not match this format.
    fn try_decode(&self, body: &str) -> Result<NodeSummary, DecodeError>;
}

fn saturating_count(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}

// ============================================================================
// Structured config
// ============================================================================

/// YAML config exposing a top-level `proxies` sequence.
///
/// Node names are bucketed with a [`RegionClassifier`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuredConfig {
    classifier: RegionClassifier,
}

impl StructuredConfig {
    /// Creates the format with a custom classifier.
    pub fn new(classifier: RegionClassifier) -> Self {
        Self { classifier }
    }
}

impl PayloadFormat for StructuredConfig {
    fn id(&self) -> &str {
        "yaml.proxies"
    }

    fn kind(&self) -> FormatKind {
        FormatKind::Structured
    }

    fn try_decode(&self, body: &str) -> Result<NodeSummary, DecodeError> {
        if body.trim().is_empty() {
            return Err(DecodeError::Empty);
        }

        let doc: Value = serde_yaml::from_str(body)?;
        let proxies = doc
            .get("proxies")
            .and_then(Value::as_sequence)
            .ok_or(DecodeError::NoProxies)?;

        // Entries without a string name still count, they land in Other.
        let names = proxies
            .iter()
            .map(|proxy| proxy.get("name").and_then(Value::as_str).unwrap_or_default());

        Ok(NodeSummary::new(
            saturating_count(proxies.len()),
            self.classifier.summarize(names),
        ))
    }
}

// ============================================================================
// Encoded list
// ============================================================================

/// Base64 blob whose decoded lines are `scheme://` node links.
#[derive(Debug, Clone, Copy, Default)]
pub struct EncodedList;

impl EncodedList {
    /// Strips whitespace and pads with `=` to a multiple of four.
    fn normalize(body: &str) -> String {
        let mut blob: String = body.chars().filter(|c| !c.is_whitespace()).collect();
        while blob.len() % 4 != 0 {
            blob.push('=');
        }
        blob
    }

    /// Decodes with the standard alphabet, then the URL-safe one.
    fn decode_blob(blob: &str) -> Result<Vec<u8>, DecodeError> {
        match STANDARD.decode(blob) {
            Ok(bytes) => Ok(bytes),
            Err(standard_err) => URL_SAFE.decode(blob).map_err(|_| standard_err.into()),
        }
    }
}

impl PayloadFormat for EncodedList {
    fn id(&self) -> &str {
        "base64.links"
    }

    fn kind(&self) -> FormatKind {
        FormatKind::EncodedList
    }

    fn try_decode(&self, body: &str) -> Result<NodeSummary, DecodeError> {
        let blob = Self::normalize(body);
        if blob.is_empty() {
            return Err(DecodeError::Empty);
        }

        let text = String::from_utf8(Self::decode_blob(&blob)?)?;
        let links = text
            .lines()
            .filter(|line| line.contains(LINK_DELIMITER))
            .count();

        if links == 0 {
            return Err(DecodeError::NoLinks);
        }
        Ok(NodeSummary::generic(saturating_count(links)))
    }
}

// ============================================================================
// Tests
// ============================================================================
