//! Assembly of primary rows with their child collections

use crate::core::normalize::join_key;
use crate::domain::{RawIncident, RawRow};
use serde_json::Value;
use std::collections::HashMap;

/// Child values of one relation, keyed by parent id
pub struct ChildSet {
    /// Collection name on the incident
    pub output: &'static str,
    /// Values per parent key
    pub values: HashMap<String, Vec<Value>>,
}

/// Attach every child set to its parent rows
///
/// Each incident gets every collection, empty when it has no children.
pub fn assemble(parents: Vec<RawRow>, mut child_sets: Vec<ChildSet>) -> Vec<RawIncident> {
    parents
        .into_iter()
        .map(|row| {
            let key = row.get("id").and_then(join_key);
            let mut incident = RawIncident::new(row);
            for set in child_sets.iter_mut() {
                let values = key
                    .as_ref()
                    .and_then(|k| set.values.remove(k))
                    .unwrap_or_default();
                incident = incident.with_collection(set.output, values);
            }
            incident
        })
        .collect()
}
