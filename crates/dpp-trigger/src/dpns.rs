//! # Naming Service Triggers
//!
//! Rules for the `domain` document type of the naming-service contract.
//!
//! A domain document carries:
//!
//! | Field | Meaning |
//! |-------|---------|
//! | `label` | name as registered, any case |
//! | `normalizedLabel` | lowercase `label` |
//! | `normalizedParentDomainName` | parent name, empty for a top-level domain |
//! | `nameHash` | hex SHA-256 of the full normalized name |
//! | `preorderSalt` | salt committed by the `preorder` document |
//! | `records.dashIdentity` | identity the name resolves to |
//!
//! Domains are immutable once registered: REPLACE and DELETE always fail.

use dpp_core::{sha256_hex_str, DataTriggerError};
use dpp_document::{Document, DocumentQuery};

use crate::context::DataTriggerExecutionContext;
use crate::result::DataTriggerExecutionResult;
use crate::trigger::TriggerRule;

/// Document type the rules apply to.
pub const DOMAIN_DOCUMENT_TYPE: &str = "domain";

/// Document type holding salted domain hash commitments.
pub const PREORDER_DOCUMENT_TYPE: &str = "preorder";

pub const UPDATE_NOT_ALLOWED: &str = "Update action is not allowed";
pub const DELETE_NOT_ALLOWED: &str = "Delete action is not allowed";

fn condition(document: &Document, message: impl Into<String>) -> DataTriggerError {
    DataTriggerError::Condition {
        document_id: document.id().to_string(),
        message: message.into(),
    }
}

fn string_field(document: &Document, path: &str) -> anyhow::Result<String> {
    document
        .get(path)
        .and_then(|v| v.as_str().map(str::to_string))
        .ok_or_else(|| anyhow::anyhow!("domain document has no string field '{path}'"))
}

/// Full normalized name: `label` or `label.parent`.
pub fn full_domain_name(normalized_label: &str, normalized_parent: &str) -> String {
    if normalized_parent.is_empty() {
        normalized_label.to_string()
    } else {
        format!("{normalized_label}.{normalized_parent}")
    }
}

/// Hash committed to by domain and preorder documents.
pub fn name_hash(full_name: &str) -> String {
    sha256_hex_str(full_name)
}

/// CREATE: the document must be internally consistent, owned by the acting
/// identity, have an existing parent and a matching preorder.
#[derive(Debug, Default)]
pub struct CreateDomainTrigger;

impl TriggerRule for CreateDomainTrigger {
    fn name(&self) -> &str {
        "createDomain"
    }

    fn execute(
        &self,
        document: &Document,
        context: &DataTriggerExecutionContext<'_>,
    ) -> anyhow::Result<Option<DataTriggerExecutionResult>> {
        let label = string_field(document, "label")?;
        let normalized_label = string_field(document, "normalizedLabel")?;
        let parent = string_field(document, "normalizedParentDomainName")?;
        let hash = string_field(document, "nameHash")?;
        let salt = string_field(document, "preorderSalt")?;
        let dash_identity = string_field(document, "records.dashIdentity")?;

        let mut result = DataTriggerExecutionResult::new();

        if hash != name_hash(&full_domain_name(&normalized_label, &parent)) {
            result.add_error(condition(document, "Document nameHash doesn't match actual hash"));
        }

        if normalized_label != label.to_lowercase() {
            result.add_error(condition(document, "Normalized label doesn't match label"));
        }

        if dash_identity != context.user_id().as_str() {
            result.add_error(condition(
                document,
                format!(
                    "dashIdentity doesn't match ownerId ({dash_identity} != {})",
                    context.user_id()
                ),
            ));
        }

        let contract_id = context.data_contract().id();
        let provider = context.data_provider();

        if !parent.is_empty() {
            let query = DocumentQuery::new().where_eq("nameHash", name_hash(&parent));
            let parents = provider.fetch_documents(contract_id, DOMAIN_DOCUMENT_TYPE, &query)?;
            if parents.is_empty() {
                result.add_error(condition(document, "Can't find parent domain matching parent hash"));
            }
        }

        let salted_domain_hash = sha256_hex_str(&format!("{salt}{hash}"));
        let query = DocumentQuery::new().where_eq("saltedDomainHash", salted_domain_hash);
        let preorders = provider.fetch_documents(contract_id, PREORDER_DOCUMENT_TYPE, &query)?;
        if preorders.is_empty() {
            result.add_error(condition(document, "preorderDocument was not found"));
        }

        Ok(Some(result))
    }
}

/// REPLACE: always rejected.
#[derive(Debug, Default)]
pub struct ReplaceDomainTrigger;

impl TriggerRule for ReplaceDomainTrigger {
    fn name(&self) -> &str {
        "replaceDomain"
    }

    fn execute(
        &self,
        document: &Document,
        _context: &DataTriggerExecutionContext<'_>,
    ) -> anyhow::Result<Option<DataTriggerExecutionResult>> {
        Ok(Some(DataTriggerExecutionResult::from_error(condition(
            document,
            UPDATE_NOT_ALLOWED,
        ))))
    }
}

/// DELETE: always rejected.
#[derive(Debug, Default)]
pub struct DeleteDomainTrigger;

impl TriggerRule for DeleteDomainTrigger {
    fn name(&self) -> &str {
        "deleteDomain"
    }

    fn execute(
        &self,
        document: &Document,
        _context: &DataTriggerExecutionContext<'_>,
    ) -> anyhow::Result<Option<DataTriggerExecutionResult>> {
        Ok(Some(DataTriggerExecutionResult::from_error(condition(
            document,
            DELETE_NOT_ALLOWED,
        ))))
    }
}
