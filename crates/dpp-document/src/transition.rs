//! # Documents State Transition
//!
//! An atomic batch of document mutations: `documents[i]` is submitted with
//! `actions[i]`. Entries stay raw until the batch has passed structural
//! validation.

use dpp_core::DppError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Raw `{documents, actions}` pair as submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentsStateTransition {
    pub documents: Vec<Value>,
    pub actions: Vec<Value>,
}

impl DocumentsStateTransition {
    pub fn new(documents: Vec<Value>, actions: Vec<Value>) -> Self {
        Self { documents, actions }
    }

    /// Parse the raw envelope. Only the two arrays are required here;
    /// their contents are checked by the validator.
    ///
    /// # Errors
    ///
    /// Returns `DppError::Malformed` if `documents` or `actions` is missing
    /// or not an array.
    pub fn from_raw(raw: &Value) -> Result<Self, DppError> {
        const ENTITY: &str = "documents state transition";

        let array = |name: &str| {
            raw.get(name)
                .and_then(Value::as_array)
                .cloned()
                .ok_or_else(|| DppError::malformed(ENTITY, format!("{name} must be an array")))
        };
        Ok(Self {
            documents: array("documents")?,
            actions: array("actions")?,
        })
    }

    pub fn to_json(&self) -> Value {
        serde_json::json!({
            "documents": self.documents,
            "actions": self.actions,
        })
    }
}
