//! # Identifier Newtypes
//!
//! Newtype wrappers for the identifiers carried by contracts and documents.
//! A `UserId` cannot be passed where a `ContractId` is expected.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::canonical::CanonicalBytes;
use crate::digest::sha256_hex;
use crate::error::CanonicalizationError;

/// Fixed length, in characters, of contract, user and document identifiers.
pub const IDENTIFIER_LENGTH: usize = 64;

/// Identifier format violation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentifierError {
    /// Identifier has the wrong length.
    #[error("{kind} must be exactly {expected} characters, got {actual}")]
    InvalidLength {
        /// Identifier kind.
        kind: &'static str,
        /// Required length.
        expected: usize,
        /// Length received.
        actual: usize,
    },

    /// Identifier is empty.
    #[error("{0} must not be empty")]
    Empty(&'static str),
}

/// Identifier of a data contract. Exactly [`IDENTIFIER_LENGTH`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContractId(String);

impl ContractId {
    /// Validate and wrap a contract identifier.
    pub fn new(id: impl Into<String>) -> Result<Self, IdentifierError> {
        let id = id.into();
        let actual = id.chars().count();
        if actual != IDENTIFIER_LENGTH {
            return Err(IdentifierError::InvalidLength {
                kind: "contract id",
                expected: IDENTIFIER_LENGTH,
                actual,
            });
        }
        Ok(Self(id))
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identifier of the user owning a document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Wrap a user identifier. Must be non-empty.
    pub fn new(id: impl Into<String>) -> Result<Self, IdentifierError> {
        let id = id.into();
        if id.is_empty() {
            return Err(IdentifierError::Empty("user id"));
        }
        Ok(Self(id))
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Content-derived identifier of a document.
///
/// Lowercase hex SHA-256 over the canonical bytes of
/// `{"$contractId", "$userId", "$entropy"}`. Two documents submitted by the
/// same user under the same contract with the same entropy share an id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    /// Derive a document id from its identity fields.
    pub fn derive(
        contract_id: &ContractId,
        user_id: &UserId,
        entropy: &str,
    ) -> Result<Self, CanonicalizationError> {
        let identity = serde_json::json!({
            "$contractId": contract_id.as_str(),
            "$userId": user_id.as_str(),
            "$entropy": entropy,
        });
        let bytes = CanonicalBytes::new(&identity)?;
        Ok(Self(sha256_hex(&bytes)))
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ContractId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
