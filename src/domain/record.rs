//! Record shapes flowing through a sync run
//!
//! Rows come out of the relational store as JSON objects keyed by column name
//! (or alias). Extraction wraps the primary rows into [`RawIncident`]s, and
//! normalization turns those into [`IncidentRecord`]s. Nothing here is ever
//! persisted locally: records are built per run and dropped after upload.

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// A row as returned by the relational store
pub type RawRow = Map<String, Value>;

/// A primary row with its one-to-many child collections, before normalization
///
/// Child collections may contain `null` placeholders. A parent with no
/// children can surface as a collection holding a single `null`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawIncident {
    /// Scalar columns of the primary row
    pub row: RawRow,

    /// Child id collections keyed by output name (e.g. `nature_of_violences`)
    pub collections: BTreeMap<String, Vec<Value>>,
}

impl RawIncident {
    /// Create a raw incident without child collections
    pub fn new(row: RawRow) -> Self {
        Self {
            row,
            collections: BTreeMap::new(),
        }
    }

    /// Attach a child collection
    pub fn with_collection(mut self, name: impl Into<String>, values: Vec<Value>) -> Self {
        self.collections.insert(name.into(), values);
        self
    }

    /// Primary key of the row, if present
    pub fn id(&self) -> Option<&Value> {
        self.row.get("id")
    }
}

/// A normalized incident, ready for the `data` channel
///
/// Serializes as one flat JSON object: the scalar fields, each child
/// collection as an array, and the attached `survivors`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IncidentRecord {
    /// Scalar fields, with boolean flags already coerced
    #[serde(flatten)]
    pub fields: RawRow,

    /// Child id collections with null placeholders removed
    #[serde(flatten)]
    pub collections: BTreeMap<String, Vec<Value>>,

    /// Survivor sub-records sharing this incident's `case_id`
    pub survivors: Vec<RawRow>,
}

impl IncidentRecord {
    /// Child collection by name, empty if absent
    pub fn collection(&self, name: &str) -> &[Value] {
        self.collections
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Boolean flag by name
    pub fn flag(&self, name: &str) -> Option<bool> {
        self.fields.get(name).and_then(Value::as_bool)
    }
}

/// Accumulated reference tables for the `meta` channel
///
/// Keys are entity names (plus the derived `counties` hierarchy); values are
/// the rows read for that entity in this run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MetaPayload(BTreeMap<String, Vec<RawRow>>);

impl MetaPayload {
    /// Create an empty payload
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert the rows for one entity, replacing any previous rows
    pub fn insert(&mut self, entity: impl Into<String>, rows: Vec<RawRow>) {
        self.0.insert(entity.into(), rows);
    }

    /// Rows for an entity
    pub fn get(&self, entity: &str) -> Option<&[RawRow]> {
        self.0.get(entity).map(Vec::as_slice)
    }

    /// Number of entities in the payload
    pub fn entity_count(&self) -> usize {
        self.0.len()
    }

    /// Total number of top-level rows across all entities
    pub fn row_count(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    /// Entity names in sorted order
    pub fn entities(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}
