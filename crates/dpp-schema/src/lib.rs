//! # dpp-schema — Structural Schema Validation
//!
//! Provides the JSON-Schema capability consumed by the validation core:
//! `validate(schemaName, rawObject) → errors[]`.
//!
//! The [`validate`] module embeds two schemas:
//!
//! - `data-contract.schema.json` — the data contract meta-schema (`$schema`
//!   constant, 64-character `contractId`, integer `version ≥ 1`, bounded
//!   `definitions`/`documents` maps with name patterns, document schemas with
//!   non-empty `properties`, `additionalProperties: false` and optional
//!   `indices`).
//! - `document-base.schema.json` — the system fields every raw document
//!   carries (`$type`, `$contractId`, `$userId`, `$entropy`, `$rev`).
//!
//! ## Crate Policy
//!
//! - Depends only on `dpp-core` internally.
//! - Violations are returned as data (`Vec<JsonSchemaError>`); `Err` means the
//!   registry itself is unusable.
//! - No network access during `$ref` resolution.

pub mod validate;

pub use validate::{
    SchemaValidationError, SchemaValidator, DATA_CONTRACT_META_SCHEMA_URI, DATA_CONTRACT_SCHEMA,
    DOCUMENT_BASE_SCHEMA,
};
