//! # Documents State Transition Validator
//!
//! Structural validation of a whole batch. Stages run in a fixed order and
//! each stage that fails short-circuits the rest:
//!
//! | # | Stage | Error |
//! |---|-------|-------|
//! | 1 | `len(documents) == len(actions)` | `MismatchDocumentsAndActionsError` |
//! | 2 | one `$contractId`, present on every document | `DocumentsForDifferentContractsError` |
//! | 3 | fetch and validate that contract | contract errors, verbatim |
//! | 4 | every `(document, action)` pair | per-document errors, in batch order |
//! | 5 | one `$userId` | `DocumentsFromDifferentUsersError` |
//! | 6 | no two documents with one identity | `DuplicateDocumentsError` |
//! | 7 | no two documents with one unique-index tuple | `DuplicateDocumentsError` |
//!
//! Stage 4 evaluates every pair before deciding, so all per-document errors
//! of a batch are reported together. On success the resolved contract is
//! attached to the result.
//!
//! The contract fetch in stage 3 is the only external call and is issued at
//! most once per batch. Everything else is a pure function of the input and
//! the fetched contract, so re-validating an unchanged batch yields the same
//! errors in the same order.

use std::sync::Arc;

use dpp_contract::{DataContract, DataContractValidator};
use dpp_core::{ConsensusError, ValidationResult};
use serde_json::Value;

use crate::contract_fetch::fetch_and_validate_data_contract;
use crate::document::{Document, DocumentAction};
use crate::document_validator::DocumentValidator;
use crate::duplicates::{find_duplicate_documents_by_id, find_duplicate_documents_by_indices};
use crate::error::StateTransitionError;
use crate::provider::DataProvider;
use crate::transition::DocumentsStateTransition;

/// Validates documents state transitions against their data contract.
#[derive(Clone)]
pub struct DocumentsStateTransitionValidator {
    data_provider: Arc<dyn DataProvider>,
    contract_validator: DataContractValidator,
    document_validator: Arc<dyn DocumentValidator>,
}

impl std::fmt::Debug for DocumentsStateTransitionValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentsStateTransitionValidator")
            .field("contract_validator", &self.contract_validator)
            .finish_non_exhaustive()
    }
}

impl DocumentsStateTransitionValidator {
    pub fn new(
        data_provider: Arc<dyn DataProvider>,
        contract_validator: DataContractValidator,
        document_validator: Arc<dyn DocumentValidator>,
    ) -> Self {
        Self {
            data_provider,
            contract_validator,
            document_validator,
        }
    }

    /// Validate a raw `{documents, actions}` object.
    ///
    /// # Errors
    ///
    /// Returns `StateTransitionError::Malformed` if the envelope lacks the two
    /// arrays; otherwise as [`validate`](Self::validate).
    pub fn validate_raw(
        &self,
        raw_state_transition: &Value,
    ) -> Result<ValidationResult<DataContract>, StateTransitionError> {
        let state_transition = DocumentsStateTransition::from_raw(raw_state_transition)?;
        self.validate(&state_transition)
    }

    /// Validate a state transition.
    ///
    /// # Errors
    ///
    /// Only collaborator faults are returned as `Err`: an unreachable data
    /// provider or an unusable schema registry.
    pub fn validate(
        &self,
        state_transition: &DocumentsStateTransition,
    ) -> Result<ValidationResult<DataContract>, StateTransitionError> {
        let raw_documents = &state_transition.documents;
        let raw_actions = &state_transition.actions;
        tracing::debug!(
            documents = raw_documents.len(),
            actions = raw_actions.len(),
            "validating documents state transition"
        );

        if raw_documents.len() != raw_actions.len() {
            return Ok(rejected(
                "cardinality",
                ConsensusError::MismatchDocumentsAndActions {
                    documents_count: raw_documents.len(),
                    actions_count: raw_actions.len(),
                },
            ));
        }

        if !single_contract(raw_documents) {
            return Ok(rejected(
                "single contract",
                ConsensusError::DocumentsForDifferentContracts {
                    documents: raw_documents.clone(),
                },
            ));
        }

        // Non-empty: an empty batch fails the single-contract stage.
        let contract_result = fetch_and_validate_data_contract(
            self.data_provider.as_ref(),
            &self.contract_validator,
            &raw_documents[0],
        )?;
        let (contract_errors, contract) = contract_result.into_parts();
        let Some(contract) = contract.filter(|_| contract_errors.is_empty()) else {
            tracing::debug!(
                stage = "contract",
                errors = contract_errors.len(),
                "documents state transition rejected"
            );
            return Ok(ValidationResult::with_errors(contract_errors));
        };

        let mut result = ValidationResult::new();
        let mut actions = Vec::with_capacity(raw_actions.len());
        for (raw_document, raw_action) in raw_documents.iter().zip(raw_actions) {
            match DocumentAction::from_raw(raw_action) {
                Some(action) => {
                    actions.push(action);
                    result.merge_errors(
                        self.document_validator
                            .validate(raw_document, &contract, action)?,
                    );
                }
                None => result.add_error(ConsensusError::InvalidDocumentAction {
                    action: raw_action.clone(),
                    document: raw_document.clone(),
                }),
            }
        }
        if !result.is_valid() {
            tracing::debug!(
                stage = "documents",
                errors = result.errors().len(),
                "documents state transition rejected"
            );
            return Ok(result);
        }

        let documents = raw_documents
            .iter()
            .zip(actions)
            .map(|(raw, action)| Document::from_raw(raw, action))
            .collect::<Result<Vec<_>, _>>()?;

        let different_users = find_documents_from_different_users(&documents);
        if !different_users.is_empty() {
            return Ok(rejected(
                "single user",
                ConsensusError::DocumentsFromDifferentUsers {
                    documents: different_users,
                },
            ));
        }

        let duplicates = find_duplicate_documents_by_id(&documents);
        if !duplicates.is_empty() {
            return Ok(rejected(
                "duplicate identity",
                ConsensusError::DuplicateDocuments { duplicates },
            ));
        }

        let duplicates = find_duplicate_documents_by_indices(&documents, &contract);
        if !duplicates.is_empty() {
            return Ok(rejected(
                "duplicate unique index",
                ConsensusError::DuplicateDocuments { duplicates },
            ));
        }

        result.set_data(contract);
        Ok(result)
    }
}

fn rejected(stage: &'static str, error: ConsensusError) -> ValidationResult<DataContract> {
    tracing::debug!(stage, error = error.name(), "documents state transition rejected");
    ValidationResult::from_error(error)
}

/// True iff there is at least one document and every document carries the
/// same string `$contractId`.
fn single_contract(raw_documents: &[Value]) -> bool {
    let mut ids = raw_documents
        .iter()
        .map(|d| d.get("$contractId").and_then(Value::as_str));
    match ids.next() {
        Some(Some(first)) => ids.all(|id| id == Some(first)),
        _ => false,
    }
}

/// The first document and the first document owned by someone else, or
/// empty when every document has the same owner.
fn find_documents_from_different_users(documents: &[Document]) -> Vec<Value> {
    let Some(first) = documents.first() else {
        return Vec::new();
    };
    documents
        .iter()
        .find(|d| d.user_id() != first.user_id())
        .map(|other| vec![first.raw().clone(), other.raw().clone()])
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use super::*;
    use crate::provider::{DataProviderError, DocumentQuery, MemoryDataProvider};
    use dpp_core::{ContractId, JsonSchemaError};
    use dpp_schema::{SchemaValidationError, SchemaValidator};
    use serde_json::json;

    const CONTRACT: &str = "6b74011f5d2ad1a8d45b71b9702f54205ce75253593c3cfbba3fdadeca278288";

    /// Records calls; rejects documents whose type is in `fail_types`.
    struct RecordingDocumentValidator {
        calls: Mutex<Vec<(Value, DocumentAction)>>,
        fail_types: Vec<&'static str>,
    }

    impl DocumentValidator for RecordingDocumentValidator {
        fn validate(
            &self,
            raw_document: &Value,
            _contract: &DataContract,
            action: DocumentAction,
        ) -> Result<ValidationResult, SchemaValidationError> {
            self.calls
                .lock()
                .unwrap()
                .push((raw_document.clone(), action));
            let document_type = raw_document["$type"].as_str().unwrap_or_default();
            if self.fail_types.contains(&document_type) {
                return Ok(ValidationResult::from_error(JsonSchemaError {
                    instance_path: String::new(),
                    schema_path: "/required".to_string(),
                    keyword: "required".to_string(),
                    params: json!({ "missingProperty": document_type }),
                    message: "test".to_string(),
                }));
            }
            Ok(ValidationResult::new())
        }
    }

    /// Counts contract fetches.
    struct CountingProvider {
        inner: MemoryDataProvider,
        fetches: AtomicUsize,
    }

    impl DataProvider for CountingProvider {
        fn fetch_data_contract(
            &self,
            contract_id: &ContractId,
        ) -> Result<Option<DataContract>, DataProviderError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            self.inner.fetch_data_contract(contract_id)
        }

        fn fetch_documents(
            &self,
            contract_id: &ContractId,
            document_type: &str,
            query: &DocumentQuery,
        ) -> Result<Vec<Document>, DataProviderError> {
            self.inner.fetch_documents(contract_id, document_type, query)
        }
    }

    fn contract() -> DataContract {
        DataContract::from_raw(&json!({
            "$schema": "https://schema.dpp.network/meta/data-contract",
            "contractId": CONTRACT,
            "version": 1,
            "documents": {
                "niceDocument": {
                    "properties": { "name": { "type": "string" } },
                    "additionalProperties": false
                },
                "indexedDocument": {
                    "indices": [
                        { "properties": [{ "$userId": "asc" }, { "firstName": "desc" }], "unique": true }
                    ],
                    "properties": { "firstName": { "type": "string" } },
                    "additionalProperties": false
                }
            }
        }))
        .unwrap()
    }

    fn raw(document_type: &str, entropy: &str, extra: Value) -> Value {
        let mut raw = json!({
            "$type": document_type,
            "$contractId": CONTRACT,
            "$userId": "alice",
            "$entropy": entropy,
        });
        if let (Some(obj), Some(extra)) = (raw.as_object_mut(), extra.as_object()) {
            obj.extend(extra.clone());
        }
        raw
    }

    fn batch() -> DocumentsStateTransition {
        DocumentsStateTransition::new(
            vec![
                raw("niceDocument", "e1", json!({ "name": "a" })),
                raw("indexedDocument", "e2", json!({ "firstName": "Leon" })),
                raw("indexedDocument", "e3", json!({ "firstName": "William" })),
            ],
            vec![json!(1), json!(1), json!(2)],
        )
    }

    struct Harness {
        provider: Arc<CountingProvider>,
        documents: Arc<RecordingDocumentValidator>,
        validator: DocumentsStateTransitionValidator,
    }

    fn harness(fail_types: Vec<&'static str>) -> Harness {
        let provider = Arc::new(CountingProvider {
            inner: MemoryDataProvider::new().with_contract(contract()),
            fetches: AtomicUsize::new(0),
        });
        let documents = Arc::new(RecordingDocumentValidator {
            calls: Mutex::new(Vec::new()),
            fail_types,
        });
        let validator = DocumentsStateTransitionValidator::new(
            provider.clone(),
            DataContractValidator::new(Arc::new(SchemaValidator::builtin().unwrap())),
            documents.clone(),
        );
        Harness {
            provider,
            documents,
            validator,
        }
    }

    impl Harness {
        fn fetches(&self) -> usize {
            self.provider.fetches.load(Ordering::SeqCst)
        }

        fn document_calls(&self) -> usize {
            self.documents.calls.lock().unwrap().len()
        }
    }

    #[test]
    fn valid_batch_attaches_contract() {
        let h = harness(vec![]);
        let result = h.validator.validate(&batch()).unwrap();
        assert!(result.is_valid(), "{:?}", result.errors());
        assert_eq!(result.data(), Some(&contract()));
        assert_eq!(h.fetches(), 1);

        let calls = h.documents.calls.lock().unwrap();
        let actions: Vec<DocumentAction> = calls.iter().map(|(_, a)| *a).collect();
        assert_eq!(
            actions,
            vec![DocumentAction::Create, DocumentAction::Create, DocumentAction::Replace]
        );
        assert_eq!(calls[0].0, batch().documents[0]);
    }

    #[test]
    fn mismatched_lengths_short_circuit() {
        let h = harness(vec![]);
        let mut st = batch();
        st.actions.push(json!(3));
        let result = h.validator.validate(&st).unwrap();
        assert_eq!(result.errors().len(), 1);
        assert!(matches!(
            result.errors()[0],
            ConsensusError::MismatchDocumentsAndActions {
                documents_count: 3,
                actions_count: 4
            }
        ));
        assert_eq!(h.fetches(), 0);
        assert_eq!(h.document_calls(), 0);
    }

    #[test]
    fn different_contracts_list_every_document() {
        let h = harness(vec![]);
        let mut st = batch();
        st.documents[1]["$contractId"] = json!("86b273ff".repeat(8));
        st.documents[2].as_object_mut().unwrap().remove("$contractId");
        let result = h.validator.validate(&st).unwrap();
        assert_eq!(result.errors().len(), 1);
        match &result.errors()[0] {
            ConsensusError::DocumentsForDifferentContracts { documents } => {
                assert_eq!(documents, &st.documents);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(h.fetches(), 0);
        assert_eq!(h.document_calls(), 0);
    }

    #[test]
    fn empty_batch_has_no_contract() {
        let h = harness(vec![]);
        let result = h
            .validator
            .validate(&DocumentsStateTransition::new(vec![], vec![]))
            .unwrap();
        assert_eq!(result.errors()[0].name(), "DocumentsForDifferentContractsError");
    }

    #[test]
    fn missing_contract_short_circuits() {
        let h = harness(vec![]);
        let mut st = batch();
        for document in &mut st.documents {
            document["$contractId"] = json!("86b273ff".repeat(8));
        }
        let result = h.validator.validate(&st).unwrap();
        assert_eq!(result.errors().len(), 1);
        assert_eq!(result.errors()[0].name(), "DataContractNotPresentError");
        assert_eq!(h.fetches(), 1);
        assert_eq!(h.document_calls(), 0);
    }

    #[test]
    fn every_document_is_checked_before_rejecting() {
        let h = harness(vec!["indexedDocument"]);
        let result = h.validator.validate(&batch()).unwrap();
        assert_eq!(h.document_calls(), 3);
        assert_eq!(result.errors().len(), 2);
        assert!(result.data().is_none());
    }

    #[test]
    fn unknown_action_code_is_reported_per_document() {
        let h = harness(vec![]);
        let mut st = batch();
        st.actions[1] = json!(3);
        let result = h.validator.validate(&st).unwrap();
        assert_eq!(result.errors().len(), 1);
        match &result.errors()[0] {
            ConsensusError::InvalidDocumentAction { action, document } => {
                assert_eq!(action, &json!(3));
                assert_eq!(document, &st.documents[1]);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(h.document_calls(), 2);
    }

    #[test]
    fn different_users_name_first_mismatching_pair() {
        let h = harness(vec![]);
        let mut st = batch();
        st.documents[0]["$userId"] = json!("bob");
        let result = h.validator.validate(&st).unwrap();
        assert_eq!(result.errors().len(), 1);
        match &result.errors()[0] {
            ConsensusError::DocumentsFromDifferentUsers { documents } => {
                assert_eq!(documents, &vec![st.documents[0].clone(), st.documents[1].clone()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn duplicate_identity_is_reported() {
        let h = harness(vec![]);
        let mut st = batch();
        st.documents[2]["$entropy"] = json!("e2");
        let result = h.validator.validate(&st).unwrap();
        assert_eq!(result.errors().len(), 1);
        match &result.errors()[0] {
            ConsensusError::DuplicateDocuments { duplicates } => {
                assert_eq!(duplicates, &vec![st.documents[1].clone(), st.documents[2].clone()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn duplicate_unique_index_is_reported() {
        let h = harness(vec![]);
        let mut st = batch();
        st.documents[2]["firstName"] = json!("Leon");
        let result = h.validator.validate(&st).unwrap();
        assert_eq!(result.errors().len(), 1);
        match &result.errors()[0] {
            ConsensusError::DuplicateDocuments { duplicates } => {
                assert_eq!(duplicates, &vec![st.documents[1].clone(), st.documents[2].clone()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn validate_raw_requires_envelope() {
        let h = harness(vec![]);
        assert!(matches!(
            h.validator.validate_raw(&json!({ "documents": [] })),
            Err(StateTransitionError::Malformed(_))
        ));
        let result = h.validator.validate_raw(&batch().to_json()).unwrap();
        assert!(result.is_valid());
    }

    #[test]
    fn revalidation_is_idempotent() {
        let h = harness(vec!["niceDocument"]);
        let render = |r: &ValidationResult<DataContract>| -> Vec<String> {
            r.errors().iter().map(ToString::to_string).collect()
        };
        let first = h.validator.validate(&batch()).unwrap();
        let second = h.validator.validate(&batch()).unwrap();
        assert_eq!(render(&first), render(&second));
    }
}
