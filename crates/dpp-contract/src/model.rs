//! # Data Contract Model
//!
//! Immutable value model of a data contract, built once from raw JSON at
//! validation entry. Construction checks only what the model itself needs
//! (identifier, version, `documents` map); full conformance is the job of
//! [`DataContractValidator`](crate::DataContractValidator).

use std::fmt;

use dpp_core::{ContractId, DppError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Sort direction of one index property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexDirection {
    /// Ascending.
    Asc,
    /// Descending.
    Desc,
}

impl IndexDirection {
    /// Parse the wire form (`"asc"` / `"desc"`).
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }
}

impl fmt::Display for IndexDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asc => f.write_str("asc"),
            Self::Desc => f.write_str("desc"),
        }
    }
}

/// One `{name: direction}` entry of an index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IndexProperty {
    /// Property path, possibly dotted (`records.dashIdentity`) or a system
    /// field (`$userId`).
    pub name: String,
    /// Sort direction.
    pub direction: IndexDirection,
}

/// An index declared on a document type.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexDefinition {
    /// Ordered index properties.
    pub properties: Vec<IndexProperty>,
    /// Whether the property value tuple must be unique per document type.
    pub unique: bool,
    /// The raw definition as declared in the contract.
    pub raw: Value,
}

impl IndexDefinition {
    /// Parse a raw index definition. Returns `None` if the shape does not
    /// match the meta-schema.
    pub fn from_raw(raw: &Value) -> Option<Self> {
        let obj = raw.as_object()?;
        let properties = obj
            .get("properties")?
            .as_array()?
            .iter()
            .map(|entry| {
                let entry = entry.as_object()?;
                if entry.len() != 1 {
                    return None;
                }
                let (name, direction) = entry.iter().next()?;
                Some(IndexProperty {
                    name: name.clone(),
                    direction: IndexDirection::parse(direction.as_str()?)?,
                })
            })
            .collect::<Option<Vec<_>>>()?;
        let unique = match obj.get("unique") {
            None => false,
            Some(v) => v.as_bool()?,
        };
        Some(Self {
            properties,
            unique,
            raw: raw.clone(),
        })
    }

    /// Structural identity of the index: its ordered properties and
    /// directions. The `unique` flag does not take part.
    pub fn definition_key(&self) -> &[IndexProperty] {
        &self.properties
    }

    /// Names of the indexed properties, in order.
    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.properties.iter().map(|p| p.name.as_str())
    }
}

/// A parsed data contract. The JSON it was built from is kept verbatim;
/// the typed fields are views over it.
#[derive(Debug, Clone, PartialEq)]
pub struct DataContract {
    id: ContractId,
    schema: String,
    version: u64,
    definitions: Map<String, Value>,
    documents: Map<String, Value>,
    raw: Value,
}

impl DataContract {
    /// Build the model from raw contract JSON.
    ///
    /// # Errors
    ///
    /// Returns `DppError::Malformed` when the fields the model relies on are
    /// missing or of the wrong type, and `DppError::Identifier` when
    /// `contractId` is not a valid contract id.
    pub fn from_raw(raw: &Value) -> Result<Self, DppError> {
        const ENTITY: &str = "data contract";

        let obj = raw
            .as_object()
            .ok_or_else(|| DppError::malformed(ENTITY, "expected an object"))?;
        let id = obj
            .get("contractId")
            .and_then(Value::as_str)
            .ok_or_else(|| DppError::malformed(ENTITY, "missing contractId"))?;
        let schema = obj
            .get("$schema")
            .and_then(Value::as_str)
            .ok_or_else(|| DppError::malformed(ENTITY, "missing $schema"))?;
        let version = obj
            .get("version")
            .and_then(Value::as_u64)
            .filter(|v| *v >= 1)
            .ok_or_else(|| DppError::malformed(ENTITY, "version must be an integer >= 1"))?;
        let documents = obj
            .get("documents")
            .and_then(Value::as_object)
            .cloned()
            .ok_or_else(|| DppError::malformed(ENTITY, "missing documents"))?;
        let definitions = match obj.get("definitions") {
            None => Map::new(),
            Some(v) => v
                .as_object()
                .cloned()
                .ok_or_else(|| DppError::malformed(ENTITY, "definitions must be an object"))?,
        };

        Ok(Self {
            id: ContractId::new(id)?,
            schema: schema.to_string(),
            version,
            definitions,
            documents,
            raw: raw.clone(),
        })
    }

    /// The contract JSON exactly as it was parsed.
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub fn to_json(&self) -> Value {
        self.raw.clone()
    }

    pub fn id(&self) -> &ContractId {
        &self.id
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn definitions(&self) -> &Map<String, Value> {
        &self.definitions
    }

    pub fn documents(&self) -> &Map<String, Value> {
        &self.documents
    }

    /// Document type names in declaration order.
    pub fn document_types(&self) -> impl Iterator<Item = &str> {
        self.documents.keys().map(String::as_str)
    }

    pub fn is_document_defined(&self, document_type: &str) -> bool {
        self.documents.contains_key(document_type)
    }

    pub fn document_schema(&self, document_type: &str) -> Option<&Value> {
        self.documents.get(document_type)
    }

    /// Document schema with the contract's `definitions` attached, so that
    /// `$ref: "#/definitions/<name>"` resolves when the schema is compiled
    /// on its own.
    pub fn document_schema_with_definitions(&self, document_type: &str) -> Option<Value> {
        let mut schema = self.document_schema(document_type)?.clone();
        if let Some(obj) = schema.as_object_mut() {
            if !self.definitions.is_empty() {
                obj.insert(
                    "definitions".to_string(),
                    Value::Object(self.definitions.clone()),
                );
            }
        }
        Some(schema)
    }

    /// Indices declared on a document type, in declaration order.
    /// Definitions that do not parse are skipped.
    pub fn indices(&self, document_type: &str) -> Vec<IndexDefinition> {
        self.document_schema(document_type)
            .and_then(|schema| schema.get("indices"))
            .and_then(Value::as_array)
            .map(|raw| raw.iter().filter_map(IndexDefinition::from_raw).collect())
            .unwrap_or_default()
    }

    /// Unique indices declared on a document type, in declaration order.
    pub fn unique_indices(&self, document_type: &str) -> Vec<IndexDefinition> {
        self.indices(document_type)
            .into_iter()
            .filter(|index| index.unique)
            .collect()
    }
}
