//! Operational errors of state transition validation.

use dpp_core::DppError;
use dpp_schema::SchemaValidationError;
use thiserror::Error;

use crate::provider::DataProviderError;

/// A fault that aborts validation of a state transition.
///
/// Invalid input never produces one of these; it is reported as consensus
/// errors in the returned `ValidationResult`.
#[derive(Error, Debug)]
pub enum StateTransitionError {
    /// The data provider could not serve the contract.
    #[error(transparent)]
    DataProvider(#[from] DataProviderError),

    /// The schema registry is unusable.
    #[error(transparent)]
    Schema(#[from] SchemaValidationError),

    /// An entity passed structural validation but could not be modelled.
    #[error(transparent)]
    Malformed(#[from] DppError),
}
