//! # Contract Resolution
//!
//! Resolves the contract a batch refers to and re-validates it before any
//! document is checked against it.

use dpp_contract::{DataContract, DataContractValidator};
use dpp_core::{ConsensusError, ContractId, ValidationResult};
use serde_json::Value;

use crate::error::StateTransitionError;
use crate::provider::DataProvider;

/// Fetch the contract named by `raw_document["$contractId"]` and validate it.
///
/// The returned result carries the contract as payload iff it exists and is
/// valid. A missing or malformed contract id, or an unknown contract, yields
/// `DataContractNotPresentError`.
///
/// # Errors
///
/// Propagates provider failures and schema registry failures.
pub fn fetch_and_validate_data_contract(
    data_provider: &dyn DataProvider,
    contract_validator: &DataContractValidator,
    raw_document: &Value,
) -> Result<ValidationResult<DataContract>, StateTransitionError> {
    let raw_id = raw_document
        .get("$contractId")
        .and_then(Value::as_str)
        .unwrap_or_default();
    let not_present = || {
        ValidationResult::from_error(ConsensusError::DataContractNotPresent {
            contract_id: raw_id.to_string(),
        })
    };

    let Ok(contract_id) = ContractId::new(raw_id) else {
        return Ok(not_present());
    };

    let contract = match data_provider.fetch_data_contract(&contract_id) {
        Ok(Some(contract)) => contract,
        Ok(None) => {
            tracing::debug!(contract_id = %contract_id, "data contract not found");
            return Ok(not_present());
        }
        Err(e) => {
            tracing::warn!(contract_id = %contract_id, error = %e, "data provider failed to fetch contract");
            return Err(e.into());
        }
    };

    let validation = contract_validator.validate(contract.raw())?;
    let mut result = ValidationResult::with_errors(validation.into_errors());
    if result.is_valid() {
        result.set_data(contract);
    }
    Ok(result)
}
