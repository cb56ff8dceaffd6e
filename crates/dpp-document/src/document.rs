//! # Document Model
//!
//! A document is a typed record owned by one user and governed by one data
//! contract. Raw documents carry their system fields with a `$` prefix
//! (`$type`, `$contractId`, `$userId`, `$entropy`, `$rev`); every other
//! top-level field is document data.
//!
//! The document id is not transmitted. It is derived from the identity
//! fields (see [`DocumentId::derive`]), so two submissions of the same
//! logical document always carry the same id.

use std::fmt;

use dpp_core::{ContractId, DocumentId, DppError, UserId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Mutation requested for a document.
///
/// Wire codes: `CREATE = 1`, `REPLACE = 2`, `DELETE = 4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DocumentAction {
    Create,
    Replace,
    Delete,
}

impl DocumentAction {
    /// All actions, in code order.
    pub const ALL: [DocumentAction; 3] = [Self::Create, Self::Replace, Self::Delete];

    /// Wire code of the action.
    pub fn code(self) -> u64 {
        match self {
            Self::Create => 1,
            Self::Replace => 2,
            Self::Delete => 4,
        }
    }

    /// Parse a wire code.
    pub fn from_code(code: u64) -> Option<Self> {
        match code {
            1 => Some(Self::Create),
            2 => Some(Self::Replace),
            4 => Some(Self::Delete),
            _ => None,
        }
    }

    /// Parse a raw `actions[i]` entry.
    pub fn from_raw(raw: &Value) -> Option<Self> {
        raw.as_u64().and_then(Self::from_code)
    }

    /// Whether the action carries document data that the contract's
    /// document schema governs.
    pub fn carries_data(self) -> bool {
        !matches!(self, Self::Delete)
    }
}

impl fmt::Display for DocumentAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => f.write_str("CREATE"),
            Self::Replace => f.write_str("REPLACE"),
            Self::Delete => f.write_str("DELETE"),
        }
    }
}

/// Largest `$rev` the base schema admits (2^53 - 1).
pub const MAX_REVISION: u64 = 9_007_199_254_740_991;

/// `$rev` as the schema sees it: any integral number, including `1.0`.
fn integral_rev(value: &Value) -> Option<u64> {
    value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0 && (0.0..=MAX_REVISION as f64).contains(f))
            .map(|f| f as u64)
    })
}

/// A parsed document paired with its action.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    id: DocumentId,
    document_type: String,
    contract_id: ContractId,
    user_id: UserId,
    entropy: String,
    rev: Option<u64>,
    action: DocumentAction,
    data: Map<String, Value>,
    raw: Value,
}

impl Document {
    /// Build a document from its raw form.
    ///
    /// # Errors
    ///
    /// Returns `DppError::Malformed` if a system field is missing or has
    /// the wrong type, `DppError::Identifier` if `$contractId`/`$userId`
    /// are not valid identifiers.
    pub fn from_raw(raw: &Value, action: DocumentAction) -> Result<Self, DppError> {
        const ENTITY: &str = "document";

        let obj = raw
            .as_object()
            .ok_or_else(|| DppError::malformed(ENTITY, "expected an object"))?;
        let field = |name: &str| {
            obj.get(name)
                .and_then(Value::as_str)
                .ok_or_else(|| DppError::malformed(ENTITY, format!("missing {name}")))
        };

        let document_type = field("$type")?.to_string();
        let contract_id = ContractId::new(field("$contractId")?)?;
        let user_id = UserId::new(field("$userId")?)?;
        let entropy = field("$entropy")?.to_string();
        let rev = match obj.get("$rev") {
            None => None,
            Some(v) => Some(
                integral_rev(v)
                    .ok_or_else(|| DppError::malformed(ENTITY, "$rev must be an integer"))?,
            ),
        };
        let data = obj
            .iter()
            .filter(|(key, _)| !key.starts_with('$'))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        let id = DocumentId::derive(&contract_id, &user_id, &entropy)?;

        Ok(Self {
            id,
            document_type,
            contract_id,
            user_id,
            entropy,
            rev,
            action,
            data,
            raw: raw.clone(),
        })
    }

    pub fn id(&self) -> &DocumentId {
        &self.id
    }

    pub fn document_type(&self) -> &str {
        &self.document_type
    }

    pub fn contract_id(&self) -> &ContractId {
        &self.contract_id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn entropy(&self) -> &str {
        &self.entropy
    }

    pub fn rev(&self) -> Option<u64> {
        self.rev
    }

    pub fn action(&self) -> DocumentAction {
        self.action
    }

    /// Document data: every top-level field without a `$` prefix.
    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    /// The raw document as submitted.
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// Value at a property path.
    ///
    /// `$id` yields the derived id and `$userId` the owner. Any other path
    /// is dotted (`records.dashIdentity`) and walks nested objects of the
    /// document data.
    pub fn get(&self, path: &str) -> Option<Value> {
        match path {
            "$id" => return Some(Value::String(self.id.as_str().to_string())),
            "$userId" => return Some(Value::String(self.user_id.as_str().to_string())),
            _ => {}
        }
        let mut segments = path.split('.');
        let mut current = self.data.get(segments.next()?)?;
        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }
        Some(current.clone())
    }
}
