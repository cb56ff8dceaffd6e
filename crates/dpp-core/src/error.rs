//! # Error Types — Operational Errors
//!
//! Operational errors are real faults returned through `Err`. They are
//! distinct from [`ConsensusError`](crate::ConsensusError), which is data
//! collected into a `ValidationResult`.

use thiserror::Error;

use crate::identity::IdentifierError;

/// Top-level operational error for the validation core.
#[derive(Error, Debug)]
pub enum DppError {
    /// Canonicalization failed.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] CanonicalizationError),

    /// An identifier did not satisfy its format rules.
    #[error("identifier error: {0}")]
    Identifier(#[from] IdentifierError),

    /// A raw entity could not be turned into its value model.
    #[error("malformed {entity}: {reason}")]
    Malformed {
        /// Entity kind ("data contract", "document").
        entity: &'static str,
        /// What was wrong with the raw input.
        reason: String,
    },
}

impl DppError {
    /// Shorthand for a `Malformed` error.
    pub fn malformed(entity: &'static str, reason: impl Into<String>) -> Self {
        Self::Malformed {
            entity,
            reason: reason.into(),
        }
    }
}

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// A non-integer number was found at `path` (a JSON pointer).
    #[error("non-integer number {value} at '{path}' has no canonical form")]
    NonIntegerNumber { path: String, value: f64 },

    /// The value could not be turned into JSON.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}
