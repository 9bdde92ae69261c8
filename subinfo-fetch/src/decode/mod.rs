//! Node-list decoding for subscription bodies.
//!
//! - [`format`] - The [`PayloadFormat`] trait and the built-in formats
//! - [`pipeline`] - The [`PayloadDecoder`] chain

pub mod format;
pub mod pipeline;

pub use format::{EncodedList, FormatKind, PayloadFormat, StructuredConfig};
pub use pipeline::{DecodeAttempt, DecodeOutcome, PayloadDecoder};
