//! Decoder chain for subscription payloads.
//!
//! The chain takes an ordered list of payload formats and tries them until
//! one matches. A body no format understands yields `None`, which is a
//! normal outcome rather than an error.

use std::time::{Duration, Instant};

use subinfo_core::NodeSummary;
use tracing::{debug, instrument};

use super::format::{EncodedList, FormatKind, PayloadFormat, StructuredConfig};

// ============================================================================
// Decode Attempt
// ============================================================================

/// Record of a single format attempt.
#[derive(Debug, Clone)]
pub struct DecodeAttempt {
    /// The format ID that was attempted.
    pub format_id: String,
    /// The kind of payload the format reads.
    pub kind: FormatKind,
    /// Why the format did not match, if it didn't.
    pub error: Option<String>,
    /// How long the attempt took.
    pub duration: Duration,
}

impl DecodeAttempt {
    /// Returns true if the format matched.
    pub fn matched(&self) -> bool {
        self.error.is_none()
    }
}

// ============================================================================
// Decode Outcome
// ============================================================================

/// The outcome of running the chain over one body.
#[derive(Debug)]
pub struct DecodeOutcome {
    /// Summary from the first matching format.
    pub summary: Option<NodeSummary>,
    /// All attempts made, in order.
    pub attempts: Vec<DecodeAttempt>,
}

impl DecodeOutcome {
    /// Returns the ID of the format that matched, if any.
    pub fn matched_format(&self) -> Option<&str> {
        self.attempts
            .iter()
            .find(|a| a.matched())
            .map(|a| a.format_id.as_str())
    }

    /// Returns all format errors.
    pub fn errors(&self) -> Vec<&str> {
        self.attempts
            .iter()
            .filter_map(|a| a.error.as_deref())
            .collect()
    }
}

// ============================================================================
// Payload Decoder
// ============================================================================

/// An ordered chain of payload formats, first match wins.
pub struct PayloadDecoder {
    formats: Vec<Box<dyn PayloadFormat>>,
}

impl PayloadDecoder {
    /// Creates a chain with the given formats, tried in the given order.
    pub fn with_formats(formats: Vec<Box<dyn PayloadFormat>>) -> Self {
        Self { formats }
    }

    /// Structured config first, then the encoded link list.
    pub fn standard() -> Self {
        Self::with_formats(vec![
            Box::new(StructuredConfig::default()),
            Box::new(EncodedList),
        ])
    }

    /// Returns the number of formats in the chain.
    pub fn len(&self) -> usize {
        self.formats.len()
    }

    /// Returns true if the chain is empty.
    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }

    /// Runs the chain and keeps a record of every attempt.
    #[instrument(skip(self, body), fields(formats = self.formats.len(), bytes = body.len()))]
    pub fn run(&self, body: &str) -> DecodeOutcome {
        let mut attempts = Vec::with_capacity(self.formats.len());

        for format in &self.formats {
            let start = Instant::now();
            let result = format.try_decode(body);
            let attempt = DecodeAttempt {
                format_id: format.id().to_string(),
                kind: format.kind(),
                error: result.as_ref().err().map(ToString::to_string),
                duration: start.elapsed(),
            };

            match result {
                Ok(summary) => {
                    debug!(format = %attempt.format_id, count = summary.count, "Payload decoded");
                    attempts.push(attempt);
                    return DecodeOutcome {
                        summary: Some(summary),
                        attempts,
                    };
                }
                Err(error) => {
                    debug!(format = %attempt.format_id, error = %error, "Format did not match");
                    attempts.push(attempt);
                }
            }
        }

        debug!("No format matched payload");
        DecodeOutcome {
            summary: None,
            attempts,
        }
    }

    /// Returns the node summary from the first matching format.
    pub fn decode(&self, body: &str) -> Option<NodeSummary> {
        self.run(body).summary
    }
}

impl Default for PayloadDecoder {
    fn default() -> Self {
        Self::standard()
    }
}

impl std::fmt::Debug for PayloadDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ids: Vec<&str> = self.formats.iter().map(|f| f.id()).collect();
        f.debug_struct("PayloadDecoder")
            .field("formats", &ids)
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
