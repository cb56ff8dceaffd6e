//! # dpp-trigger — Data Triggers
//!
//! Business-rule hooks bound to `(contract id, document type, action)` and
//! run after a batch has passed structural validation.
//!
//! - [`trigger`] — [`TriggerRule`] and the fault-containing [`DataTrigger`].
//! - [`context`] / [`result`] — what a rule sees and what it returns.
//! - [`registry`] — the startup-built [`DataTriggerRegistry`].
//! - [`dpns`] — built-in naming-service `domain` rules.
//! - [`execute`] — run every applicable trigger over a batch.
//! - [`config`] — [`TriggerConfig`], loaded from the environment.
//!
//! ## Crate Policy
//!
//! - A trigger never aborts validation: rule errors and panics become
//!   `DataTriggerError`s in the returned result.
//! - Rules are read-only; they consult persisted state only through the
//!   context's data provider.

pub mod config;
pub mod context;
pub mod dpns;
pub mod execute;
pub mod registry;
pub mod result;
pub mod trigger;

pub use config::{ConfigError, TriggerConfig, DPNS_CONTRACT_ID_VAR};
pub use context::DataTriggerExecutionContext;
pub use dpns::{
    CreateDomainTrigger, DeleteDomainTrigger, ReplaceDomainTrigger, DOMAIN_DOCUMENT_TYPE,
    PREORDER_DOCUMENT_TYPE,
};
pub use execute::{execute_data_triggers, merge_trigger_results, validate_data_triggers};
pub use registry::DataTriggerRegistry;
pub use result::DataTriggerExecutionResult;
pub use trigger::{DataTrigger, TriggerPanic, TriggerRule};
