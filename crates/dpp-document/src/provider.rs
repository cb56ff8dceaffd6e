//! # Data Provider
//!
//! Read-only access to persisted contracts and documents. The validation
//! core never writes through a provider and never caches or retries its
//! calls: an unreachable provider surfaces as `Err(DataProviderError)` to
//! the caller, which owns retry and timeout policy.
//!
//! [`MemoryDataProvider`] is an in-process implementation for tests and
//! tooling.

use dpp_contract::DataContract;
use dpp_core::ContractId;
use serde_json::Value;
use thiserror::Error;

use crate::document::Document;

/// Collaborator failure. The only error allowed to escape validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DataProviderError {
    /// The backing store could not be reached.
    #[error("data provider unavailable: {reason}")]
    Unavailable {
        /// Transport or store diagnostic.
        reason: String,
    },

    /// The store rejected the query.
    #[error("data provider query failed: {reason}")]
    Query {
        /// Store diagnostic.
        reason: String,
    },
}

/// One equality condition: the value at `path` must equal `value`.
#[derive(Debug, Clone, PartialEq)]
pub struct WhereClause {
    /// Dotted property path, or `$id` / `$userId`.
    pub path: String,
    pub value: Value,
}

/// Conjunction of equality conditions over a document type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentQuery {
    clauses: Vec<WhereClause>,
}

impl DocumentQuery {
    /// A query matching every document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an equality condition.
    pub fn where_eq(mut self, path: impl Into<String>, value: impl Into<Value>) -> Self {
        self.clauses.push(WhereClause {
            path: path.into(),
            value: value.into(),
        });
        self
    }

    pub fn clauses(&self) -> &[WhereClause] {
        &self.clauses
    }

    /// Whether `document` satisfies every condition.
    pub fn matches(&self, document: &Document) -> bool {
        self.clauses
            .iter()
            .all(|clause| document.get(&clause.path).as_ref() == Some(&clause.value))
    }
}

/// Read-only lookup of persisted contracts and documents.
///
/// Implementations must be `Send + Sync` so one provider can be shared by
/// every validator behind an `Arc`.
pub trait DataProvider: Send + Sync {
    /// Fetch a contract by id. `Ok(None)` when it does not exist.
    fn fetch_data_contract(
        &self,
        contract_id: &ContractId,
    ) -> Result<Option<DataContract>, DataProviderError>;

    /// Fetch persisted documents of one type matching `query`, in storage
    /// order.
    fn fetch_documents(
        &self,
        contract_id: &ContractId,
        document_type: &str,
        query: &DocumentQuery,
    ) -> Result<Vec<Document>, DataProviderError>;
}

/// In-memory provider over a fixed set of contracts and documents.
#[derive(Debug, Clone, Default)]
pub struct MemoryDataProvider {
    contracts: Vec<DataContract>,
    documents: Vec<Document>,
}

impl MemoryDataProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a contract. A later contract with the same id shadows earlier ones.
    pub fn with_contract(mut self, contract: DataContract) -> Self {
        self.contracts.push(contract);
        self
    }

    /// Add a persisted document.
    pub fn with_document(mut self, document: Document) -> Self {
        self.documents.push(document);
        self
    }
}

impl DataProvider for MemoryDataProvider {
    fn fetch_data_contract(
        &self,
        contract_id: &ContractId,
    ) -> Result<Option<DataContract>, DataProviderError> {
        Ok(self
            .contracts
            .iter()
            .rev()
            .find(|contract| contract.id() == contract_id)
            .cloned())
    }

    fn fetch_documents(
        &self,
        contract_id: &ContractId,
        document_type: &str,
        query: &DocumentQuery,
    ) -> Result<Vec<Document>, DataProviderError> {
        Ok(self
            .documents
            .iter()
            .filter(|d| d.contract_id() == contract_id && d.document_type() == document_type)
            .filter(|d| query.matches(d))
            .cloned()
            .collect())
    }
}
