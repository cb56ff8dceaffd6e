//! # dpp-document — Documents State Transitions
//!
//! Structural validation of a batch of document mutations against the data
//! contract it targets.
//!
//! - [`document`] — [`Document`] and [`DocumentAction`].
//! - [`transition`] — the raw [`DocumentsStateTransition`] envelope.
//! - [`provider`] — the [`DataProvider`] seam and [`MemoryDataProvider`].
//! - [`document_validator`] — per-document checks ([`SchemaDocumentValidator`]).
//! - [`duplicates`] — in-batch identity and unique-index collisions.
//! - [`contract_fetch`] — resolve and re-validate the referenced contract.
//! - [`validate`] — [`DocumentsStateTransitionValidator`], the staged
//!   batch validator.
//!
//! ## Crate Policy
//!
//! - Consensus failures are returned in a `ValidationResult`; only
//!   [`StateTransitionError`] is returned through `Err`.
//! - The data provider is called at most once per batch and never retried.

pub mod contract_fetch;
pub mod document;
pub mod document_validator;
pub mod duplicates;
pub mod error;
pub mod provider;
pub mod transition;
pub mod validate;

pub use contract_fetch::fetch_and_validate_data_contract;
pub use document::{Document, DocumentAction};
pub use document_validator::{DocumentValidator, SchemaDocumentValidator};
pub use duplicates::{find_duplicate_documents_by_id, find_duplicate_documents_by_indices};
pub use error::StateTransitionError;
pub use provider::{DataProvider, DataProviderError, DocumentQuery, MemoryDataProvider, WhereClause};
pub use transition::DocumentsStateTransition;
pub use validate::DocumentsStateTransitionValidator;
