//! # Trigger Execution Result
//!
//! A validation result that can only hold trigger-origin errors. It converts
//! into a plain [`ValidationResult`] for merging with the rest of a batch's
//! outcome.

use dpp_core::{DataTriggerError, ValidationResult};

/// Outcome of one trigger execution.
#[derive(Debug, Clone, Default)]
pub struct DataTriggerExecutionResult {
    errors: Vec<DataTriggerError>,
}

impl DataTriggerExecutionResult {
    /// A passing result.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_error(error: DataTriggerError) -> Self {
        Self {
            errors: vec![error],
        }
    }

    pub fn add_error(&mut self, error: DataTriggerError) {
        self.errors.push(error);
    }

    pub fn errors(&self) -> &[DataTriggerError] {
        &self.errors
    }

    /// True iff the trigger reported nothing.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

impl From<DataTriggerExecutionResult> for ValidationResult {
    fn from(result: DataTriggerExecutionResult) -> Self {
        ValidationResult::with_errors(result.errors.into_iter().map(Into::into).collect())
    }
}
