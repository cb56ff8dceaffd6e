//! # Duplicate Detection
//!
//! Two in-batch collision checks, each returning the colliding raw
//! documents in batch order (empty when there is no collision):
//!
//! - by identity: same `$type` and same derived document id;
//! - by unique index: same `$type` and equal values at every property of
//!   one of the type's unique indices.
//!
//! Index tuples with a missing property value do not take part in the
//! unique check, and DELETE documents carry no indexed data.

use std::collections::HashMap;

use dpp_contract::DataContract;
use serde_json::Value;

use crate::document::{Document, DocumentAction};

/// Documents sharing a `($type, id)` identity with another batch member.
pub fn find_duplicate_documents_by_id(documents: &[Document]) -> Vec<Value> {
    let mut counts: HashMap<(&str, &str), usize> = HashMap::new();
    for document in documents {
        *counts
            .entry((document.document_type(), document.id().as_str()))
            .or_default() += 1;
    }
    documents
        .iter()
        .filter(|d| counts[&(d.document_type(), d.id().as_str())] > 1)
        .map(|d| d.raw().clone())
        .collect()
}

/// Documents whose unique-index value tuple equals another same-type
/// document's.
pub fn find_duplicate_documents_by_indices(
    documents: &[Document],
    contract: &DataContract,
) -> Vec<Value> {
    let mut duplicated = vec![false; documents.len()];

    for document_type in contract.document_types() {
        let unique_indices = contract.unique_indices(document_type);
        if unique_indices.is_empty() {
            continue;
        }
        let members: Vec<usize> = documents
            .iter()
            .enumerate()
            .filter(|(_, d)| d.document_type() == document_type && d.action() != DocumentAction::Delete)
            .map(|(i, _)| i)
            .collect();

        for index in &unique_indices {
            let tuples: Vec<Option<Vec<Value>>> = members
                .iter()
                .map(|&i| {
                    index
                        .property_names()
                        .map(|name| documents[i].get(name))
                        .collect::<Option<Vec<_>>>()
                })
                .collect();

            for (a, tuple_a) in tuples.iter().enumerate() {
                let Some(tuple_a) = tuple_a else { continue };
                for (b, tuple_b) in tuples.iter().enumerate().skip(a + 1) {
                    if tuple_b.as_ref() == Some(tuple_a) {
                        duplicated[members[a]] = true;
                        duplicated[members[b]] = true;
                    }
                }
            }
        }
    }

    documents
        .iter()
        .zip(duplicated)
        .filter(|(_, dup)| *dup)
        .map(|(d, _)| d.raw().clone())
        .collect()
}
