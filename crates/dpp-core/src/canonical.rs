//! # Canonical Serialization — Document Identity Bytes
//!
//! Every node must derive the same document id from the same identity
//! fields, whatever key order or whitespace the submitter used. Identity
//! values are therefore hashed only after RFC 8785 (JCS) canonicalization,
//! and [`CanonicalBytes`] is the one type the digest functions accept.
//!
//! Non-integer numbers are refused: their JCS rendering depends on float
//! formatting, and identity fields never carry them.

use serde::Serialize;
use serde_json::Value;

use crate::error::CanonicalizationError;

/// JCS-canonical JSON bytes. Constructed only through [`CanonicalBytes::new`]
/// or [`CanonicalBytes::from_value`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Canonicalize anything that serializes to JSON.
    ///
    /// # Errors
    ///
    /// `SerializationFailed` if `obj` does not serialize, `NonIntegerNumber`
    /// if it contains a float.
    pub fn new(obj: &impl Serialize) -> Result<Self, CanonicalizationError> {
        Self::from_value(&serde_json::to_value(obj)?)
    }

    /// Canonicalize a JSON value.
    ///
    /// # Errors
    ///
    /// `NonIntegerNumber` naming the first float found, depth first.
    pub fn from_value(value: &Value) -> Result<Self, CanonicalizationError> {
        if let Some((path, number)) = first_non_integer(value, String::new()) {
            return Err(CanonicalizationError::NonIntegerNumber {
                path,
                value: number,
            });
        }
        Ok(Self(serde_jcs::to_vec(value)?))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

fn first_non_integer(value: &Value, path: String) -> Option<(String, f64)> {
    match value {
        Value::Number(n) if n.is_f64() => n.as_f64().map(|f| (path, f)),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .find_map(|(i, item)| first_non_integer(item, format!("{path}/{i}"))),
        Value::Object(fields) => fields
            .iter()
            .find_map(|(key, field)| first_non_integer(field, format!("{path}/{key}"))),
        _ => None,
    }
}
