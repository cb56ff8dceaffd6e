//! Trigger registry configuration.
//!
//! The built-in triggers are bound to the naming-service contract, whose id
//! differs per network and is supplied by the environment.

use dpp_core::ContractId;

/// Environment variable holding the naming-service contract id.
pub const DPNS_CONTRACT_ID_VAR: &str = "DPNS_CONTRACT_ID";

/// Configuration for [`DataTriggerRegistry::from_config`](crate::DataTriggerRegistry::from_config).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerConfig {
    /// Contract whose `domain` documents carry the built-in triggers.
    pub dpns_contract_id: ContractId,
}

impl TriggerConfig {
    pub fn new(dpns_contract_id: ContractId) -> Self {
        Self { dpns_contract_id }
    }

    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `DPNS_CONTRACT_ID` (required, 64 characters)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let raw = lookup(DPNS_CONTRACT_ID_VAR).ok_or(ConfigError::MissingContractId)?;
        let dpns_contract_id =
            ContractId::new(raw.as_str()).map_err(|e| ConfigError::InvalidContractId(raw, e.to_string()))?;
        Ok(Self { dpns_contract_id })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("DPNS_CONTRACT_ID environment variable is required")]
    MissingContractId,
    #[error("invalid DPNS_CONTRACT_ID '{0}': {1}")]
    InvalidContractId(String, String),
}
