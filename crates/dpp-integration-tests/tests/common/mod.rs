//! Shared fixtures: a naming-service contract, domain/preorder documents and
//! a validating node wired the way a host process wires it.

#![allow(dead_code)]

use std::sync::Arc;

use dpp_contract::{DataContract, DataContractValidator};
use dpp_core::{ContractId, ValidationResult};
use dpp_document::{
    Document, DocumentAction, DocumentsStateTransition, DocumentsStateTransitionValidator,
    MemoryDataProvider, SchemaDocumentValidator,
};
use dpp_schema::{SchemaValidator, DATA_CONTRACT_META_SCHEMA_URI};
use dpp_trigger::{
    dpns::{full_domain_name, name_hash},
    validate_data_triggers, DataTriggerRegistry, TriggerConfig,
};
use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;

pub const DPNS_CONTRACT: &str = "6b74011f5d2ad1a8d45b71b9702f54205ce75253593c3cfbba3fdadeca278288";
pub const OTHER_CONTRACT: &str = "86b273ff86b273ff86b273ff86b273ff86b273ff86b273ff86b273ff86b273ff";
pub const OWNER: &str = "4a1f0b93e3a0c5c2b3b3a4c59a6b1c3d2e0f8a7b6c5d4e3f2a1b0c9d8e7f6a5b";
pub const OTHER_USER: &str = "e2c6f1a7b9d3c8e4f0a2b6d1c5e9f3a7b1d5c9e3f7a1b5d9c3e7f1a5b9d3c7e1";
pub const SALT: &str = "yU4uYZz2gCU6cmHN1AqWEtPEXQuvT6jZcE";

/// Install a test subscriber once; honours `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn dpns_raw_contract() -> Value {
    json!({
        "$schema": DATA_CONTRACT_META_SCHEMA_URI,
        "contractId": DPNS_CONTRACT,
        "version": 1,
        "definitions": {
            "records": {
                "type": "object",
                "properties": { "dashIdentity": { "type": "string" } },
                "required": ["dashIdentity"],
                "additionalProperties": false
            }
        },
        "documents": {
            "domain": {
                "indices": [
                    { "properties": [{ "normalizedLabel": "asc" }], "unique": true },
                    { "properties": [{ "records.dashIdentity": "asc" }] }
                ],
                "properties": {
                    "label": { "type": "string", "maxLength": 63 },
                    "normalizedLabel": { "type": "string", "maxLength": 63 },
                    "normalizedParentDomainName": { "type": "string", "maxLength": 190 },
                    "nameHash": { "type": "string", "minLength": 64, "maxLength": 64 },
                    "preorderSalt": { "type": "string" },
                    "records": { "$ref": "#/definitions/records" }
                },
                "required": [
                    "label", "normalizedLabel", "normalizedParentDomainName",
                    "nameHash", "preorderSalt", "records"
                ],
                "additionalProperties": false
            },
            "preorder": {
                "indices": [
                    { "properties": [{ "saltedDomainHash": "asc" }], "unique": true }
                ],
                "properties": {
                    "saltedDomainHash": { "type": "string", "minLength": 64, "maxLength": 64 }
                },
                "required": ["saltedDomainHash"],
                "additionalProperties": false
            }
        }
    })
}

pub fn dpns_contract() -> DataContract {
    DataContract::from_raw(&dpns_raw_contract()).unwrap()
}

pub fn raw_domain(label: &str, parent: &str, entropy: &str) -> Value {
    let normalized = label.to_lowercase();
    json!({
        "$type": "domain",
        "$contractId": DPNS_CONTRACT,
        "$userId": OWNER,
        "$entropy": entropy,
        "$rev": 1,
        "label": label,
        "normalizedLabel": normalized,
        "normalizedParentDomainName": parent,
        "nameHash": name_hash(&full_domain_name(&normalized, parent)),
        "preorderSalt": SALT,
        "records": { "dashIdentity": OWNER }
    })
}

pub fn raw_preorder(raw_domain: &Value) -> Value {
    let hash = raw_domain["nameHash"].as_str().unwrap();
    json!({
        "$type": "preorder",
        "$contractId": DPNS_CONTRACT,
        "$userId": OWNER,
        "$entropy": format!("preorder-{}", &hash[..16]),
        "$rev": 1,
        "saltedDomainHash": dpp_core::sha256_hex_str(&format!("{SALT}{hash}"))
    })
}

pub fn persisted(raw: &Value) -> Document {
    Document::from_raw(raw, DocumentAction::Create).unwrap()
}

pub fn state_transition(documents: Vec<Value>, action: DocumentAction) -> DocumentsStateTransition {
    let actions = documents.iter().map(|_| json!(action.code())).collect();
    DocumentsStateTransition::new(documents, actions)
}

/// A validating node: structural validation, then data triggers.
pub struct Node {
    validator: DocumentsStateTransitionValidator,
    provider: Arc<MemoryDataProvider>,
    registry: DataTriggerRegistry,
}

impl Node {
    /// A node whose store holds the naming-service contract plus `documents`.
    pub fn with_documents(documents: Vec<Document>) -> Self {
        init_tracing();
        let provider = documents
            .into_iter()
            .fold(MemoryDataProvider::new().with_contract(dpns_contract()), |p, d| {
                p.with_document(d)
            });
        let provider = Arc::new(provider);
        let schemas = Arc::new(SchemaValidator::builtin().unwrap());
        let validator = DocumentsStateTransitionValidator::new(
            provider.clone(),
            DataContractValidator::new(schemas.clone()),
            Arc::new(SchemaDocumentValidator::new(schemas)),
        );
        let config = TriggerConfig::new(ContractId::new(DPNS_CONTRACT).unwrap());
        Self {
            validator,
            provider,
            registry: DataTriggerRegistry::from_config(&config),
        }
    }

    pub fn new() -> Self {
        Self::with_documents(Vec::new())
    }

    /// Structural validation only.
    pub fn validate_structure(&self, st: &DocumentsStateTransition) -> ValidationResult<DataContract> {
        self.validator.validate(st).unwrap()
    }

    /// Structural validation and, if it passes, trigger execution.
    pub fn validate(&self, st: &DocumentsStateTransition) -> ValidationResult<DataContract> {
        validate_data_triggers(
            &self.registry,
            self.provider.as_ref(),
            st,
            self.validate_structure(st),
        )
        .unwrap()
    }
}
