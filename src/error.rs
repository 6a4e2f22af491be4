//! Error types for the Atelier core.
//!
//! Validation failures are NOT errors; they are ordered result values
//! (see `types::TypeDescriptor::validate`). The types here cover the two
//! remaining categories: contract violations detected by the generator and
//! model integrity checks, plus the per-property failure carried by the
//! evaluator's errors map.

use thiserror::Error;

/// Fatal contract violations raised by `codegen::generate`.
///
/// Structural paths and output identifiers cannot be formed without a node
/// name and id, so generation fails fast instead of emitting malformed
/// output. A structurally valid tree never produces one of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerateError {
    #[error("node {id:?} has an empty name; structural paths cannot be formed")]
    MissingName { id: String },

    #[error("node named {name:?} has an empty id")]
    MissingId { name: String },
}

/// Integrity violations reported by explicit model checks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("duplicate node id {id:?} in tree")]
    DuplicateId { id: String },
}

/// The failure raised by a property producer during evaluation.
///
/// Recorded per property in `eval::EvaluatedProperties::errors`; it never
/// propagates out of the evaluator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct PropertyError {
    pub message: String,
}

impl PropertyError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<&str> for PropertyError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<String> for PropertyError {
    fn from(message: String) -> Self {
        Self { message }
    }
}
