//! # Trigger Registry
//!
//! Fixed table of triggers built once at startup. Lookup is by exact
//! `(contract id, document type, action)` match and returns triggers in
//! registration order.

use std::sync::Arc;

use dpp_core::ContractId;
use dpp_document::DocumentAction;

use crate::config::TriggerConfig;
use crate::dpns::{CreateDomainTrigger, DeleteDomainTrigger, ReplaceDomainTrigger, DOMAIN_DOCUMENT_TYPE};
use crate::trigger::DataTrigger;

/// Startup-built trigger table.
#[derive(Debug, Clone, Default)]
pub struct DataTriggerRegistry {
    triggers: Vec<DataTrigger>,
}

impl DataTriggerRegistry {
    pub fn new(triggers: Vec<DataTrigger>) -> Self {
        Self { triggers }
    }

    /// The built-in table: one naming-service trigger per mutating action
    /// on `domain` documents.
    pub fn from_config(config: &TriggerConfig) -> Self {
        let contract_id = &config.dpns_contract_id;
        let triggers = vec![
            DataTrigger::new(
                contract_id.clone(),
                DOMAIN_DOCUMENT_TYPE,
                DocumentAction::Create,
                Arc::new(CreateDomainTrigger),
            ),
            DataTrigger::new(
                contract_id.clone(),
                DOMAIN_DOCUMENT_TYPE,
                DocumentAction::Replace,
                Arc::new(ReplaceDomainTrigger),
            ),
            DataTrigger::new(
                contract_id.clone(),
                DOMAIN_DOCUMENT_TYPE,
                DocumentAction::Delete,
                Arc::new(DeleteDomainTrigger),
            ),
        ];
        tracing::debug!(contract_id = %contract_id, triggers = triggers.len(), "data trigger registry built");
        Self { triggers }
    }

    /// Triggers registered for the key, possibly none.
    pub fn lookup(
        &self,
        contract_id: &ContractId,
        document_type: &str,
        action: DocumentAction,
    ) -> Vec<&DataTrigger> {
        self.triggers
            .iter()
            .filter(|t| t.matches(contract_id, document_type, action))
            .collect()
    }

    pub fn triggers(&self) -> &[DataTrigger] {
        &self.triggers
    }

    pub fn len(&self) -> usize {
        self.triggers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triggers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTRACT: &str = "6b74011f5d2ad1a8d45b71b9702f54205ce75253593c3cfbba3fdadeca278288";

    fn registry() -> DataTriggerRegistry {
        DataTriggerRegistry::from_config(&TriggerConfig::new(ContractId::new(CONTRACT).unwrap()))
    }

    #[test]
    fn each_action_has_its_domain_trigger() {
        let registry = registry();
        let id = ContractId::new(CONTRACT).unwrap();
        for (action, rule) in [
            (DocumentAction::Create, "createDomain"),
            (DocumentAction::Replace, "replaceDomain"),
            (DocumentAction::Delete, "deleteDomain"),
        ] {
            let found = registry.lookup(&id, "domain", action);
            assert_eq!(found.len(), 1);
            assert_eq!(found[0].action(), action);
            assert_eq!(found[0].rule().name(), rule);
        }
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn other_types_and_contracts_have_no_triggers() {
        let registry = registry();
        let id = ContractId::new(CONTRACT).unwrap();
        assert!(registry.lookup(&id, "otherType", DocumentAction::Create).is_empty());
        let other = ContractId::new("86b273ff".repeat(8)).unwrap();
        assert!(registry.lookup(&other, "domain", DocumentAction::Create).is_empty());
        assert!(DataTriggerRegistry::default().is_empty());
    }
}
