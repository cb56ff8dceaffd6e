//! # Schema Validation
//!
//! Named-schema registry backed by the `jsonschema` crate (Draft 7).
//!
//! ## Consensus Invariant
//!
//! Structural violations are data, not faults: [`SchemaValidator::validate`]
//! returns every violation as a [`JsonSchemaError`] carrying the instance
//! path, the failing keyword and its parameters. `Err` is reserved for
//! registry problems (unknown schema name, uncompilable schema).
//!
//! ## Schema Resolution
//!
//! Built-in schemas use `$id` URIs of the form
//! `https://schema.dpp.network/meta/<filename>`. Cross-schema `$ref`s are
//! resolved from the registry only; the retriever never touches the network,
//! so every node resolves references identically.

use std::collections::HashMap;
use std::fmt;

use dpp_core::JsonSchemaError;
use jsonschema::error::ValidationErrorKind;
use jsonschema::{Draft, Retrieve, Uri, ValidationError, ValidationOptions, Validator};
use serde_json::{json, Map, Value};
use thiserror::Error;

/// URI prefix of the built-in schemas.
pub const SCHEMA_URI_PREFIX: &str = "https://schema.dpp.network/meta/";

/// Registry name of the data contract meta-schema.
pub const DATA_CONTRACT_SCHEMA: &str = "data-contract.schema.json";

/// Registry name of the raw document base schema.
pub const DOCUMENT_BASE_SCHEMA: &str = "document-base.schema.json";

/// Required value of a data contract's `$schema` field.
pub const DATA_CONTRACT_META_SCHEMA_URI: &str = "https://schema.dpp.network/meta/data-contract";

const BUILTIN_SCHEMAS: [(&str, &str); 2] = [
    (
        DATA_CONTRACT_SCHEMA,
        include_str!("schemas/data-contract.schema.json"),
    ),
    (
        DOCUMENT_BASE_SCHEMA,
        include_str!("schemas/document-base.schema.json"),
    ),
];

/// Resolves `$ref` URIs against registered schemas only.
struct LocalSchemaRetriever {
    schemas_by_uri: HashMap<String, Value>,
}

impl Retrieve for LocalSchemaRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        let uri_str = uri.as_str();
        if let Some(value) = self.schemas_by_uri.get(uri_str) {
            return Ok(value.clone());
        }
        let filename = uri_str.rsplit('/').next().unwrap_or(uri_str);
        if let Some(value) = self.schemas_by_uri.get(filename) {
            return Ok(value.clone());
        }
        Err(format!("unresolvable schema reference: {uri_str}").into())
    }
}

/// Registry-level schema failure.
#[derive(Error, Debug)]
pub enum SchemaValidationError {
    /// No schema is registered under the given name.
    #[error("schema '{0}' is not registered")]
    UnknownSchema(String),

    /// A schema source could not be parsed as JSON.
    #[error("schema load error for '{schema_name}': {reason}")]
    SchemaLoadError {
        /// Schema filename or identifier.
        schema_name: String,
        /// Reason the schema could not be loaded.
        reason: String,
    },

    /// The compiled validator could not be built (e.g. invalid schema).
    #[error("validator build error for schema '{schema_name}': {reason}")]
    ValidatorBuildError {
        /// Schema filename or identifier.
        schema_name: String,
        /// Reason the validator could not be built.
        reason: String,
    },
}

/// A registry of compiled JSON-Schema validators.
///
/// Schemas are compiled once at registration. `SchemaValidator` is
/// `Send + Sync` and is meant to be shared behind an `Arc` by every
/// validator in the process.
pub struct SchemaValidator {
    schemas: HashMap<String, Value>,
    validators: HashMap<String, Validator>,
}

impl fmt::Debug for SchemaValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaValidator")
            .field("schemas", &self.schema_names())
            .finish()
    }
}

impl SchemaValidator {
    /// Create a registry holding the built-in schemas.
    ///
    /// # Errors
    ///
    /// Returns `SchemaLoadError`/`ValidatorBuildError` if an embedded schema is
    /// broken.
    pub fn builtin() -> Result<Self, SchemaValidationError> {
        let mut schemas = HashMap::new();
        for (name, source) in BUILTIN_SCHEMAS {
            let value: Value =
                serde_json::from_str(source).map_err(|e| SchemaValidationError::SchemaLoadError {
                    schema_name: name.to_string(),
                    reason: format!("invalid JSON: {e}"),
                })?;
            schemas.insert(name.to_string(), value);
        }
        Self::from_schemas(schemas)
    }

    /// Create a registry from already parsed schemas, keyed by name.
    pub fn from_schemas(schemas: HashMap<String, Value>) -> Result<Self, SchemaValidationError> {
        let mut registry = Self {
            schemas,
            validators: HashMap::new(),
        };
        let options = registry.build_options();
        let mut validators = HashMap::new();
        for (name, value) in &registry.schemas {
            let validator = options.build(value).map_err(|e| {
                SchemaValidationError::ValidatorBuildError {
                    schema_name: name.clone(),
                    reason: e.to_string(),
                }
            })?;
            validators.insert(name.clone(), validator);
        }
        registry.validators = validators;
        tracing::debug!(schemas = registry.schemas.len(), "schema registry compiled");
        Ok(registry)
    }

    /// Returns the names of all registered schemas, sorted alphabetically.
    pub fn schema_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.schemas.keys().map(|s| s.as_str()).collect();
        names.sort();
        names
    }

    /// Look up a registered schema by name.
    pub fn get_schema(&self, name: &str) -> Option<&Value> {
        self.schemas.get(name)
    }

    fn build_options(&self) -> ValidationOptions {
        let mut opts = jsonschema::options();
        opts.with_draft(Draft::Draft7);

        let mut schemas_by_uri: HashMap<String, Value> = HashMap::new();
        for (filename, value) in &self.schemas {
            schemas_by_uri.insert(format!("{SCHEMA_URI_PREFIX}{filename}"), value.clone());
            if let Some(id_str) = value.get("$id").and_then(|v| v.as_str()) {
                schemas_by_uri.insert(id_str.to_string(), value.clone());
            }
            schemas_by_uri.insert(filename.clone(), value.clone());
        }
        opts.with_retriever(LocalSchemaRetriever { schemas_by_uri });
        opts
    }

    /// Validate `instance` against the registered schema `schema_name`.
    ///
    /// Returns every violation in the engine's deterministic order; an empty
    /// vector means the instance is valid.
    ///
    /// # Errors
    ///
    /// Returns `UnknownSchema` if nothing is registered under `schema_name`.
    pub fn validate(
        &self,
        schema_name: &str,
        instance: &Value,
    ) -> Result<Vec<JsonSchemaError>, SchemaValidationError> {
        let validator = self
            .validators
            .get(schema_name)
            .ok_or_else(|| SchemaValidationError::UnknownSchema(schema_name.to_string()))?;
        Ok(collect_errors(validator, instance))
    }

    /// Validate `instance` against an ad-hoc schema, such as a document
    /// schema taken from a data contract.
    ///
    /// # Errors
    ///
    /// Returns `ValidatorBuildError` if `schema` does not compile.
    pub fn validate_with(
        &self,
        schema: &Value,
        instance: &Value,
    ) -> Result<Vec<JsonSchemaError>, SchemaValidationError> {
        let validator = self.build_options().build(schema).map_err(|e| {
            SchemaValidationError::ValidatorBuildError {
                schema_name: schema
                    .get("$id")
                    .and_then(Value::as_str)
                    .unwrap_or("(inline)")
                    .to_string(),
                reason: e.to_string(),
            }
        })?;
        Ok(collect_errors(&validator, instance))
    }
}

fn collect_errors(validator: &Validator, instance: &Value) -> Vec<JsonSchemaError> {
    validator.iter_errors(instance).map(|e| to_json_schema_error(&e)).collect()
}

/// Convert an engine error into the consensus representation.
fn to_json_schema_error(e: &ValidationError<'_>) -> JsonSchemaError {
    let schema_path = e.schema_path.to_string();
    let params = match &e.kind {
        ValidationErrorKind::Required { property } => json!({ "missingProperty": property }),
        ValidationErrorKind::AdditionalProperties { unexpected } => {
            json!({ "additionalProperties": unexpected })
        }
        _ => Value::Object(Map::new()),
    };
    JsonSchemaError {
        instance_path: e.instance_path.to_string(),
        keyword: keyword_from_schema_path(&schema_path),
        schema_path,
        params,
        message: e.to_string(),
    }
}

/// The failing keyword is the last non-index segment of the schema path.
fn keyword_from_schema_path(schema_path: &str) -> String {
    schema_path
        .rsplit('/')
        .find(|segment| !segment.is_empty() && !segment.chars().all(|c| c.is_ascii_digit()))
        .unwrap_or("")
        .to_string()
}
