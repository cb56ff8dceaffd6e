//! # Data Contract Validator
//!
//! Two layers:
//!
//! 1. Structural: the raw contract is validated against the data contract
//!    meta-schema. Any violation short-circuits, because the semantic layer
//!    assumes a schema-valid shape.
//! 2. Semantic: index integrity (see [`crate::index`]), collecting every
//!    violation.

use std::sync::Arc;

use dpp_core::{ConsensusError, ValidationResult};
use dpp_schema::{SchemaValidationError, SchemaValidator, DATA_CONTRACT_SCHEMA};
use serde_json::Value;

use crate::index::validate_indices;

/// Validates raw data contracts.
#[derive(Debug, Clone)]
pub struct DataContractValidator {
    schemas: Arc<SchemaValidator>,
}

impl DataContractValidator {
    /// Create a validator over a schema registry holding the data contract
    /// meta-schema.
    pub fn new(schemas: Arc<SchemaValidator>) -> Self {
        Self { schemas }
    }

    /// The schema registry this validator uses.
    pub fn schemas(&self) -> &Arc<SchemaValidator> {
        &self.schemas
    }

    /// Validate a raw contract.
    ///
    /// # Errors
    ///
    /// Returns `SchemaValidationError::UnknownSchema` if the registry lacks the
    /// meta-schema. Contract defects are reported in the result, never as `Err`.
    pub fn validate(&self, raw_contract: &Value) -> Result<ValidationResult, SchemaValidationError> {
        let structural = self.schemas.validate(DATA_CONTRACT_SCHEMA, raw_contract)?;
        if !structural.is_empty() {
            tracing::debug!(
                errors = structural.len(),
                "data contract rejected by meta-schema"
            );
            return Ok(ValidationResult::with_errors(
                structural.into_iter().map(ConsensusError::from).collect(),
            ));
        }

        let semantic = validate_indices(raw_contract);
        if !semantic.is_empty() {
            tracing::debug!(errors = semantic.len(), "data contract has invalid indices");
        }
        Ok(ValidationResult::with_errors(semantic))
    }
}
