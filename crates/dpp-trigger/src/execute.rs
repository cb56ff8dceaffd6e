//! Batch trigger execution.

use dpp_contract::DataContract;
use dpp_core::{DppError, ValidationResult};
use dpp_document::{DataProvider, Document, DocumentAction, DocumentsStateTransition};

use crate::context::DataTriggerExecutionContext;
use crate::registry::DataTriggerRegistry;
use crate::result::DataTriggerExecutionResult;

/// Run every applicable trigger for every document, in document order and
/// then registration order. Never fails: each trigger contains its own
/// faults.
pub fn execute_data_triggers(
    registry: &DataTriggerRegistry,
    documents: &[Document],
    context: &DataTriggerExecutionContext<'_>,
) -> Vec<DataTriggerExecutionResult> {
    let mut results = Vec::new();
    for document in documents {
        for trigger in registry.lookup(
            document.contract_id(),
            document.document_type(),
            document.action(),
        ) {
            results.push(trigger.execute(document, context));
        }
    }
    tracing::debug!(
        documents = documents.len(),
        executed = results.len(),
        "data triggers executed"
    );
    results
}

/// Flatten trigger results into one validation result, preserving order.
pub fn merge_trigger_results(results: Vec<DataTriggerExecutionResult>) -> ValidationResult {
    let mut merged = ValidationResult::new();
    for result in results {
        merged.merge(result.into());
    }
    merged
}

/// Second phase of batch validation: given the outcome of structural
/// validation, run the data triggers of an accepted batch.
///
/// A rejected `structural` result is returned unchanged and no trigger runs.
/// Otherwise the trigger errors are merged and the contract stays attached
/// only when no trigger objected.
///
/// # Errors
///
/// `DppError` if a document of the accepted batch cannot be parsed, which
/// structural acceptance rules out.
pub fn validate_data_triggers(
    registry: &DataTriggerRegistry,
    data_provider: &dyn DataProvider,
    state_transition: &DocumentsStateTransition,
    structural: ValidationResult<DataContract>,
) -> Result<ValidationResult<DataContract>, DppError> {
    let (errors, contract) = structural.into_parts();
    let Some(contract) = contract.filter(|_| errors.is_empty()) else {
        return Ok(ValidationResult::with_errors(errors));
    };

    let documents = state_transition
        .documents
        .iter()
        .zip(&state_transition.actions)
        .map(|(raw, raw_action)| {
            let action = DocumentAction::from_raw(raw_action)
                .ok_or_else(|| DppError::malformed("document action", raw_action.to_string()))?;
            Document::from_raw(raw, action)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut result = ValidationResult::new();
    if let Some(first) = documents.first() {
        let context = DataTriggerExecutionContext::new(data_provider, first.user_id(), &contract);
        result.merge_errors(merge_trigger_results(execute_data_triggers(
            registry, &documents, &context,
        )));
    }
    if result.is_valid() {
        result.set_data(contract);
    }
    Ok(result)
}

