//! # Per-Document Structural Validation
//!
//! [`DocumentValidator`] is the seam the state transition validator calls
//! once per `(document, action)` pair. [`SchemaDocumentValidator`] is the
//! default implementation:
//!
//! 1. the raw document must satisfy the document base schema (system fields);
//! 2. its `$type` must be defined by the contract;
//! 3. for CREATE and REPLACE, its data must satisfy the contract's schema
//!    for that type. DELETE carries no data, so only step 1 and 2 apply.

use std::sync::Arc;

use dpp_contract::DataContract;
use dpp_core::{ConsensusError, ValidationResult};
use dpp_schema::{SchemaValidationError, SchemaValidator, DOCUMENT_BASE_SCHEMA};
use serde_json::{Map, Value};

use crate::document::DocumentAction;

/// Structural validation of one raw document against a resolved contract.
pub trait DocumentValidator: Send + Sync {
    /// Validate `raw_document` as submitted with `action`.
    ///
    /// # Errors
    ///
    /// `Err` only for schema registry failures; document defects are
    /// reported in the result.
    fn validate(
        &self,
        raw_document: &Value,
        contract: &DataContract,
        action: DocumentAction,
    ) -> Result<ValidationResult, SchemaValidationError>;
}

/// Schema-driven [`DocumentValidator`].
#[derive(Debug, Clone)]
pub struct SchemaDocumentValidator {
    schemas: Arc<SchemaValidator>,
}

impl SchemaDocumentValidator {
    pub fn new(schemas: Arc<SchemaValidator>) -> Self {
        Self { schemas }
    }
}

impl DocumentValidator for SchemaDocumentValidator {
    fn validate(
        &self,
        raw_document: &Value,
        contract: &DataContract,
        action: DocumentAction,
    ) -> Result<ValidationResult, SchemaValidationError> {
        let base = self.schemas.validate(DOCUMENT_BASE_SCHEMA, raw_document)?;
        if !base.is_empty() {
            return Ok(ValidationResult::with_errors(
                base.into_iter().map(ConsensusError::from).collect(),
            ));
        }

        let document_type = raw_document
            .get("$type")
            .and_then(Value::as_str)
            .unwrap_or_default();
        let Some(document_schema) = contract.document_schema_with_definitions(document_type) else {
            return Ok(ValidationResult::from_error(
                ConsensusError::InvalidDocumentType {
                    document_type: document_type.to_string(),
                    contract_id: contract.id().to_string(),
                },
            ));
        };

        if !action.carries_data() {
            return Ok(ValidationResult::new());
        }

        let data = strip_system_fields(raw_document);
        let errors = self.schemas.validate_with(&document_schema, &data)?;
        Ok(ValidationResult::with_errors(
            errors.into_iter().map(ConsensusError::from).collect(),
        ))
    }
}

fn strip_system_fields(raw_document: &Value) -> Value {
    let data: Map<String, Value> = raw_document
        .as_object()
        .map(|obj| {
            obj.iter()
                .filter(|(key, _)| !key.starts_with('$'))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect()
        })
        .unwrap_or_default();
    Value::Object(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const CONTRACT: &str = "6b74011f5d2ad1a8d45b71b9702f54205ce75253593c3cfbba3fdadeca278288";

    fn contract() -> DataContract {
        DataContract::from_raw(&json!({
            "$schema": "https://schema.dpp.network/meta/data-contract",
            "contractId": CONTRACT,
            "version": 1,
            "definitions": { "lastName": { "type": "string", "maxLength": 5 } },
            "documents": {
                "prettyDocument": {
                    "properties": { "lastName": { "$ref": "#/definitions/lastName" } },
                    "required": ["lastName"],
                    "additionalProperties": false
                }
            }
        }))
        .unwrap()
    }

    fn raw_document(last_name: Value) -> Value {
        json!({
            "$type": "prettyDocument",
            "$contractId": CONTRACT,
            "$userId": "alice",
            "$entropy": "entropy",
            "$rev": 1,
            "lastName": last_name
        })
    }

    fn validator() -> SchemaDocumentValidator {
        SchemaDocumentValidator::new(Arc::new(SchemaValidator::builtin().unwrap()))
    }

    #[test]
    fn valid_document_passes() {
        let result = validator()
            .validate(&raw_document(json!("Smith")), &contract(), DocumentAction::Create)
            .unwrap();
        assert!(result.is_valid(), "{:?}", result.errors());
    }

    #[test]
    fn data_is_checked_against_referenced_definition() {
        let result = validator()
            .validate(&raw_document(json!("Longer")), &contract(), DocumentAction::Replace)
            .unwrap();
        assert_eq!(result.errors().len(), 1);
        match &result.errors()[0] {
            ConsensusError::JsonSchema(e) => {
                assert_eq!(e.instance_path, "/lastName");
                assert_eq!(e.keyword, "maxLength");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_system_field_fails_base_schema() {
        let mut raw = raw_document(json!("Smith"));
        raw.as_object_mut().unwrap().remove("$userId");
        let result = validator()
            .validate(&raw, &contract(), DocumentAction::Create)
            .unwrap();
        assert!(matches!(
            &result.errors()[0],
            ConsensusError::JsonSchema(e) if e.keyword == "required"
        ));
    }

    #[test]
    fn undefined_type_is_reported() {
        let mut raw = raw_document(json!("Smith"));
        raw["$type"] = json!("undefinedDocument");
        let result = validator()
            .validate(&raw, &contract(), DocumentAction::Create)
            .unwrap();
        assert_eq!(result.errors().len(), 1);
        assert_eq!(result.errors()[0].name(), "InvalidDocumentTypeError");
    }

    #[test]
    fn delete_skips_document_schema() {
        let mut raw = raw_document(json!("Smith"));
        raw.as_object_mut().unwrap().remove("lastName");
        let result = validator()
            .validate(&raw, &contract(), DocumentAction::Delete)
            .unwrap();
        assert!(result.is_valid());

        let result = validator()
            .validate(&raw, &contract(), DocumentAction::Create)
            .unwrap();
        assert!(!result.is_valid());
    }
}
