//! # dpp-core — Foundational Types for Document Validation
//!
//! This crate is the leaf of the validation workspace. It defines the
//! value types every validating node must agree on byte-for-byte:
//!
//! 1. **`CanonicalBytes` newtype.** All identity and digest computation
//!    flows through `CanonicalBytes::new()`, which produces JCS
//!    (RFC 8785) output. Two nodes hashing the same logical document
//!    always hash the same bytes.
//!
//! 2. **Identifier newtypes.** `ContractId`, `UserId` and `DocumentId` are
//!    distinct types with validated constructors. No bare strings for
//!    identifiers once an entity has been parsed.
//!
//! 3. **`ConsensusError`.** One enum holding every typed validation failure.
//!    Consensus errors are data: they are accumulated in a
//!    [`ValidationResult`], never returned through `Err`.
//!
//! 4. **`ValidationResult`.** The ordered error accumulator threaded through
//!    every validation layer, with an optional payload and a defined merge.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `dpp-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod consensus;
pub mod digest;
pub mod error;
pub mod identity;
pub mod validation;

// Re-export primary types for ergonomic imports.
pub use canonical::CanonicalBytes;
pub use consensus::{ConsensusError, DataTriggerError, JsonSchemaError};
pub use digest::{sha256_digest, sha256_hex, sha256_hex_str, Sha256Digest};
pub use error::{CanonicalizationError, DppError};
pub use identity::{ContractId, DocumentId, IdentifierError, UserId, IDENTIFIER_LENGTH};
pub use validation::ValidationResult;
