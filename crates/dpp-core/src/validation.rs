//! # Validation Result
//!
//! The accumulator threaded through every validation layer. A result is
//! valid iff it holds no errors. Errors keep insertion order, which is the
//! order the checks ran in, so re-running a validation on unchanged input
//! yields the same errors in the same order.

use crate::consensus::ConsensusError;

/// Ordered consensus errors plus an optional payload.
///
/// The payload carries a by-product of a successful validation (for
/// example the resolved data contract) so callers do not have to recompute
/// it.
#[derive(Debug, Clone)]
pub struct ValidationResult<T = ()> {
    errors: Vec<ConsensusError>,
    data: Option<T>,
}

impl<T> Default for ValidationResult<T> {
    fn default() -> Self {
        Self {
            errors: Vec::new(),
            data: None,
        }
    }
}

impl<T> ValidationResult<T> {
    /// An empty, valid result.
    pub fn new() -> Self {
        Self::default()
    }

    /// A result holding the given errors.
    pub fn with_errors(errors: Vec<ConsensusError>) -> Self {
        Self { errors, data: None }
    }

    /// A result holding a single error.
    pub fn from_error(error: impl Into<ConsensusError>) -> Self {
        Self::with_errors(vec![error.into()])
    }

    /// Append one error.
    pub fn add_error(&mut self, error: impl Into<ConsensusError>) {
        self.errors.push(error.into());
    }

    /// Append several errors, preserving their order.
    pub fn add_errors(&mut self, errors: impl IntoIterator<Item = ConsensusError>) {
        self.errors.extend(errors);
    }

    /// Concatenate another result's errors and adopt its payload if it has one.
    pub fn merge(&mut self, other: ValidationResult<T>) {
        self.errors.extend(other.errors);
        if other.data.is_some() {
            self.data = other.data;
        }
    }

    /// Concatenate another result's errors, discarding its payload.
    pub fn merge_errors<U>(&mut self, other: ValidationResult<U>) {
        self.errors.extend(other.errors);
    }

    /// True iff no errors have been recorded.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Recorded errors in insertion order.
    pub fn errors(&self) -> &[ConsensusError] {
        &self.errors
    }

    /// Consume the result, returning its errors.
    pub fn into_errors(self) -> Vec<ConsensusError> {
        self.errors
    }

    /// Attach a payload.
    pub fn set_data(&mut self, data: T) {
        self.data = Some(data);
    }

    /// The attached payload, if any.
    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    /// Consume the result, returning its payload.
    pub fn into_data(self) -> Option<T> {
        self.data
    }

    /// Consume the result, returning errors and payload.
    pub fn into_parts(self) -> (Vec<ConsensusError>, Option<T>) {
        (self.errors, self.data)
    }

    /// Re-type the payload, keeping errors.
    pub fn map_data<U>(self, f: impl FnOnce(T) -> U) -> ValidationResult<U> {
        ValidationResult {
            errors: self.errors,
            data: self.data.map(f),
        }
    }
}
