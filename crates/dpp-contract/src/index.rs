//! # Index Integrity
//!
//! Semantic checks over a schema-valid contract's `indices`:
//!
//! - every index property path resolves to a declared property
//!   (→ `UndefinedIndexPropertyError`, one per unresolved property);
//! - no index repeats an earlier index of the same type
//!   (→ `DuplicateIndexError`, one per repetition beyond the first).
//!
//! Document types are visited in declaration order, then indices in
//! declaration order. All violations are collected; none short-circuits.

use dpp_core::ConsensusError;
use serde_json::{Map, Value};

use crate::model::{IndexDefinition, IndexProperty};

/// System fields that may be indexed without being declared.
pub const SYSTEM_INDEX_PROPERTIES: [&str; 2] = ["$id", "$userId"];

/// Bound on `$ref` hops while resolving one path segment.
const MAX_REF_DEPTH: usize = 32;

/// Run both index checks over a raw, schema-valid contract.
pub fn validate_indices(raw_contract: &Value) -> Vec<ConsensusError> {
    let empty = Map::new();
    let definitions = raw_contract
        .get("definitions")
        .and_then(Value::as_object)
        .unwrap_or(&empty);
    let Some(documents) = raw_contract.get("documents").and_then(Value::as_object) else {
        return Vec::new();
    };

    let mut errors = Vec::new();
    for (document_type, document_schema) in documents {
        let Some(raw_indices) = document_schema.get("indices").and_then(Value::as_array) else {
            continue;
        };

        let mut seen: Vec<Vec<IndexProperty>> = Vec::with_capacity(raw_indices.len());
        for raw_index in raw_indices {
            let Some(index) = IndexDefinition::from_raw(raw_index) else {
                continue;
            };

            for name in index.property_names() {
                if !resolve_property_path(document_schema, definitions, name) {
                    errors.push(ConsensusError::UndefinedIndexProperty {
                        property_name: name.to_string(),
                        document_type: document_type.clone(),
                        index_definition: raw_index.clone(),
                    });
                }
            }

            let key = index.definition_key().to_vec();
            if seen.contains(&key) {
                errors.push(ConsensusError::DuplicateIndex {
                    document_type: document_type.clone(),
                    index_definition: raw_index.clone(),
                });
            } else {
                seen.push(key);
            }
        }
    }
    errors
}

/// Whether `path` names a property declared by `document_schema`.
///
/// `$`-prefixed names resolve only if they are system fields. Dotted paths
/// walk nested `properties`, following `#/definitions/<name>` references.
pub fn resolve_property_path(
    document_schema: &Value,
    definitions: &Map<String, Value>,
    path: &str,
) -> bool {
    if path.starts_with('$') {
        return SYSTEM_INDEX_PROPERTIES.contains(&path);
    }

    let mut current = document_schema;
    for segment in path.split('.') {
        let Some(schema) = follow_refs(current, definitions) else {
            return false;
        };
        match schema
            .get("properties")
            .and_then(Value::as_object)
            .and_then(|props| props.get(segment))
        {
            Some(next) => current = next,
            None => return false,
        }
    }
    true
}

fn follow_refs<'a>(schema: &'a Value, definitions: &'a Map<String, Value>) -> Option<&'a Value> {
    let mut current = schema;
    for _ in 0..MAX_REF_DEPTH {
        match current.get("$ref").and_then(Value::as_str) {
            None => return Some(current),
            Some(reference) => {
                let name = reference.strip_prefix("#/definitions/")?;
                current = definitions.get(name)?;
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn contract_with_indices(indices: Value) -> Value {
        json!({
            "definitions": {
                "records": {
                    "type": "object",
                    "properties": { "dashIdentity": { "type": "string" } }
                }
            },
            "documents": {
                "domain": {
                    "indices": indices,
                    "properties": {
                        "nameHash": { "type": "string" },
                        "records": { "$ref": "#/definitions/records" }
                    },
                    "additionalProperties": false
                }
            }
        })
    }

    #[test]
    fn resolvable_indices_pass() {
        let raw = contract_with_indices(json!([
            { "properties": [{ "nameHash": "asc" }], "unique": true },
            { "properties": [{ "records.dashIdentity": "asc" }] },
            { "properties": [{ "$userId": "asc" }] }
        ]));
        assert!(validate_indices(&raw).is_empty());
    }

    #[test]
    fn undefined_property_is_named() {
        let raw = contract_with_indices(json!([
            { "properties": [{ "nameHash": "asc" }, { "missingProperty": "asc" }] }
        ]));
        let errors = validate_indices(&raw);
        assert_eq!(errors.len(), 1);
        match &errors[0] {
            ConsensusError::UndefinedIndexProperty {
                property_name,
                document_type,
                index_definition,
            } => {
                assert_eq!(property_name, "missingProperty");
                assert_eq!(document_type, "domain");
                assert_eq!(index_definition, &raw["documents"]["domain"]["indices"][0]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unknown_system_property_is_undefined() {
        let raw = contract_with_indices(json!([{ "properties": [{ "$rev": "asc" }] }]));
        assert_eq!(validate_indices(&raw).len(), 1);
    }

    #[test]
    fn one_error_per_repetition_beyond_first() {
        let index = json!({ "properties": [{ "nameHash": "asc" }] });
        let unique = json!({ "properties": [{ "nameHash": "asc" }], "unique": true });
        let raw = contract_with_indices(json!([index.clone(), unique, index]));
        let errors = validate_indices(&raw);
        assert_eq!(errors.len(), 2);
        assert!(errors
            .iter()
            .all(|e| matches!(e, ConsensusError::DuplicateIndex { .. })));
    }

    #[test]
    fn different_direction_is_not_a_duplicate() {
        let raw = contract_with_indices(json!([
            { "properties": [{ "nameHash": "asc" }] },
            { "properties": [{ "nameHash": "desc" }] }
        ]));
        assert!(validate_indices(&raw).is_empty());
    }

    #[test]
    fn cyclic_refs_do_not_resolve() {
        let mut definitions = Map::new();
        definitions.insert("a".to_string(), json!({ "$ref": "#/definitions/b" }));
        definitions.insert("b".to_string(), json!({ "$ref": "#/definitions/a" }));
        let schema = json!({ "properties": { "x": { "$ref": "#/definitions/a" } } });
        assert!(resolve_property_path(&schema, &definitions, "x"));
        assert!(!resolve_property_path(&schema, &definitions, "x.y"));
    }
}
