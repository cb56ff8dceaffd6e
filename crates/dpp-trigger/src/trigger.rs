//! # Data Triggers
//!
//! A [`DataTrigger`] binds a [`TriggerRule`] to one
//! `(contract id, document type, action)` key.
//!
//! ## Fault Containment
//!
//! [`DataTrigger::execute`] never fails and never unwinds. Whatever the rule
//! does, the caller receives exactly one of:
//!
//! - the rule's own result, unchanged (with or without errors);
//! - a result holding one `DataTriggerError::Execution` wrapping the rule's
//!   error or panic message;
//! - a result holding one `DataTriggerError::InvalidResult` when the rule
//!   returned no result.

use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use dpp_core::{ContractId, DataTriggerError};
use dpp_document::{Document, DocumentAction};
use thiserror::Error;

use crate::context::DataTriggerExecutionContext;
use crate::result::DataTriggerExecutionResult;

/// Business rule run for a document after structural validation.
///
/// Returning `Ok(None)` is a rule defect and is reported as
/// `DataTriggerError::InvalidResult`.
pub trait TriggerRule: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    fn execute(
        &self,
        document: &Document,
        context: &DataTriggerExecutionContext<'_>,
    ) -> anyhow::Result<Option<DataTriggerExecutionResult>>;
}

/// A rule panicked.
#[derive(Error, Debug)]
#[error("data trigger panicked: {0}")]
pub struct TriggerPanic(pub String);

/// A trigger rule bound to its registry key.
#[derive(Clone)]
pub struct DataTrigger {
    contract_id: ContractId,
    document_type: String,
    action: DocumentAction,
    rule: Arc<dyn TriggerRule>,
}

impl fmt::Debug for DataTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataTrigger")
            .field("contract_id", &self.contract_id)
            .field("document_type", &self.document_type)
            .field("action", &self.action)
            .field("rule", &self.rule.name())
            .finish()
    }
}

impl DataTrigger {
    pub fn new(
        contract_id: ContractId,
        document_type: impl Into<String>,
        action: DocumentAction,
        rule: Arc<dyn TriggerRule>,
    ) -> Self {
        Self {
            contract_id,
            document_type: document_type.into(),
            action,
            rule,
        }
    }

    pub fn contract_id(&self) -> &ContractId {
        &self.contract_id
    }

    pub fn document_type(&self) -> &str {
        &self.document_type
    }

    pub fn action(&self) -> DocumentAction {
        self.action
    }

    pub fn rule(&self) -> &Arc<dyn TriggerRule> {
        &self.rule
    }

    /// Whether this trigger is registered for the given key.
    pub fn matches(&self, contract_id: &ContractId, document_type: &str, action: DocumentAction) -> bool {
        &self.contract_id == contract_id && self.document_type == document_type && self.action == action
    }

    /// `contractId/documentType/ACTION`.
    pub fn key(&self) -> String {
        format!("{}/{}/{}", self.contract_id, self.document_type, self.action)
    }

    /// Run the rule for `document`, containing every failure.
    pub fn execute(
        &self,
        document: &Document,
        context: &DataTriggerExecutionContext<'_>,
    ) -> DataTriggerExecutionResult {
        let outcome = catch_unwind(AssertUnwindSafe(|| self.rule.execute(document, context)));

        let cause: Box<dyn std::error::Error + Send + Sync> = match outcome {
            Ok(Ok(Some(result))) => return result,
            Ok(Ok(None)) => {
                tracing::warn!(trigger = %self.key(), rule = self.rule.name(), "data trigger returned no result");
                return DataTriggerExecutionResult::from_error(DataTriggerError::InvalidResult {
                    trigger: self.key(),
                    message: DataTriggerError::NO_RESULT_MESSAGE.to_string(),
                });
            }
            Ok(Err(err)) => err.into(),
            Err(payload) => Box::new(TriggerPanic(panic_message(payload.as_ref()))),
        };

        tracing::warn!(trigger = %self.key(), rule = self.rule.name(), error = %cause, "data trigger failed");
        DataTriggerExecutionResult::from_error(DataTriggerError::Execution {
            trigger: self.key(),
            cause: Arc::from(cause),
        })
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
