//! # Consensus Errors
//!
//! Typed validation failures that every validating node must derive
//! identically from identical input. Each variant carries enough context
//! (offending documents, index definitions) to be reported without
//! re-deriving it.
//!
//! Consensus errors are never thrown. They are appended to a
//! [`ValidationResult`](crate::ValidationResult) by the layer that detects
//! them.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

/// A single JSON-Schema constraint violation.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonSchemaError {
    /// JSON Pointer to the violating location in the instance (`""` for root).
    pub instance_path: String,
    /// JSON Pointer to the schema keyword that failed.
    pub schema_path: String,
    /// The failing keyword (`required`, `type`, `maxProperties`, ...).
    pub keyword: String,
    /// Keyword-specific parameters, e.g. `{"missingProperty": "version"}`.
    pub params: Value,
    /// Human-readable description from the schema engine.
    pub message: String,
}

impl fmt::Display for JsonSchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.instance_path.is_empty() {
            "(root)"
        } else {
            self.instance_path.as_str()
        };
        write!(f, "{path}: [{}] {}", self.keyword, self.message)
    }
}

/// Errors originating from data trigger execution.
///
/// A `DataTriggerExecutionResult` may only contain these.
#[derive(Error, Debug, Clone)]
pub enum DataTriggerError {
    /// A trigger rule rejected the document on business grounds.
    #[error("data trigger condition failed for document {document_id}: {message}")]
    Condition {
        /// Id of the rejected document.
        document_id: String,
        /// Rule-specific reason.
        message: String,
    },

    /// The trigger rule failed (returned an error or panicked).
    #[error("data trigger {trigger} failed: {cause}")]
    Execution {
        /// `contractId/documentType/action` of the failing trigger.
        trigger: String,
        /// The original fault.
        #[source]
        cause: Arc<dyn std::error::Error + Send + Sync>,
    },

    /// The trigger rule completed without producing a result.
    #[error("{message}")]
    InvalidResult {
        /// `contractId/documentType/action` of the offending trigger.
        trigger: String,
        /// Fixed diagnostic message.
        message: String,
    },
}

impl DataTriggerError {
    /// Diagnostic used when a trigger returns no result.
    pub const NO_RESULT_MESSAGE: &'static str = "Data trigger have not returned any result";

    /// The error message without trigger metadata.
    pub fn message(&self) -> String {
        match self {
            Self::Condition { message, .. } => message.clone(),
            Self::Execution { cause, .. } => cause.to_string(),
            Self::InvalidResult { message, .. } => message.clone(),
        }
    }
}

/// Every consensus-level validation failure.
#[derive(Error, Debug, Clone)]
pub enum ConsensusError {
    /// Structural schema violation.
    #[error("json schema error: {0}")]
    JsonSchema(JsonSchemaError),

    /// Two index definitions on one document type are identical.
    #[error("duplicate index definition on document type '{document_type}'")]
    DuplicateIndex {
        /// Document type declaring the repeated index.
        document_type: String,
        /// The repeated raw index definition.
        index_definition: Value,
    },

    /// An index references a property the document type does not declare.
    #[error("index property '{property_name}' is not defined on document type '{document_type}'")]
    UndefinedIndexProperty {
        /// The unresolved property path.
        property_name: String,
        /// Document type declaring the index.
        document_type: String,
        /// The raw index definition.
        index_definition: Value,
    },

    /// Documents in one batch collide on identity or on a unique index.
    #[error("state transition contains {} duplicate documents", duplicates.len())]
    DuplicateDocuments {
        /// The colliding raw documents, in batch order.
        duplicates: Vec<Value>,
    },

    /// `documents` and `actions` have different lengths.
    #[error("state transition has {documents_count} documents but {actions_count} actions")]
    MismatchDocumentsAndActions {
        /// Length of `documents`.
        documents_count: usize,
        /// Length of `actions`.
        actions_count: usize,
    },

    /// Documents reference more than one contract (or none).
    #[error("state transition contains documents for different data contracts")]
    DocumentsForDifferentContracts {
        /// Every raw document of the batch.
        documents: Vec<Value>,
    },

    /// Documents are owned by more than one user.
    #[error("state transition contains documents from different users")]
    DocumentsFromDifferentUsers {
        /// The first document and the first document owned by another user.
        documents: Vec<Value>,
    },

    /// The referenced data contract does not exist.
    #[error("data contract {contract_id} is not present")]
    DataContractNotPresent {
        /// The id that was looked up.
        contract_id: String,
    },

    /// A document's `$type` is not defined by its contract.
    #[error("document type '{document_type}' is not defined in data contract {contract_id}")]
    InvalidDocumentType {
        /// The undefined type.
        document_type: String,
        /// The contract consulted.
        contract_id: String,
    },

    /// An action code is not one of the known actions.
    #[error("invalid document action {action}")]
    InvalidDocumentAction {
        /// The raw action value.
        action: Value,
        /// The raw document paired with the action.
        document: Value,
    },

    /// A data trigger rejected or failed on a document.
    #[error(transparent)]
    DataTrigger(#[from] DataTriggerError),
}

impl ConsensusError {
    /// Stable name of the error kind.
    pub fn name(&self) -> &'static str {
        match self {
            Self::JsonSchema(_) => "JsonSchemaError",
            Self::DuplicateIndex { .. } => "DuplicateIndexError",
            Self::UndefinedIndexProperty { .. } => "UndefinedIndexPropertyError",
            Self::DuplicateDocuments { .. } => "DuplicateDocumentsError",
            Self::MismatchDocumentsAndActions { .. } => "MismatchDocumentsAndActionsError",
            Self::DocumentsForDifferentContracts { .. } => "DocumentsForDifferentContractsError",
            Self::DocumentsFromDifferentUsers { .. } => "DocumentsFromDifferentUsersError",
            Self::DataContractNotPresent { .. } => "DataContractNotPresentError",
            Self::InvalidDocumentType { .. } => "InvalidDocumentTypeError",
            Self::InvalidDocumentAction { .. } => "InvalidDocumentActionError",
            Self::DataTrigger(DataTriggerError::Condition { .. }) => "DataTriggerConditionError",
            Self::DataTrigger(DataTriggerError::Execution { .. }) => "DataTriggerExecutionError",
            Self::DataTrigger(DataTriggerError::InvalidResult { .. }) => {
                "DataTriggerInvalidResultError"
            }
        }
    }
}

impl From<JsonSchemaError> for ConsensusError {
    fn from(err: JsonSchemaError) -> Self {
        Self::JsonSchema(err)
    }
}
