//! # dpp-contract — Data Contracts
//!
//! A data contract declares one or more document types (each a JSON schema
//! with optional indices) plus shared sub-schema `definitions`.
//!
//! - [`model`] — the immutable [`DataContract`] value and [`IndexDefinition`].
//! - [`validate`] — [`DataContractValidator`]: meta-schema conformance, then
//!   index integrity.
//! - [`index`] — index property resolution and duplicate-index detection.
//!
//! ## Crate Policy
//!
//! - Depends on `dpp-core` and `dpp-schema` only.
//! - Validation is a pure function of the raw contract; no caching.

pub mod index;
pub mod model;
pub mod validate;

pub use index::{resolve_property_path, validate_indices, SYSTEM_INDEX_PROPERTIES};
pub use model::{DataContract, IndexDefinition, IndexDirection, IndexProperty};
pub use validate::DataContractValidator;
