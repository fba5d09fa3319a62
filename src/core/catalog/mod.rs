//! Projection catalog
//!
//! The catalog maps each reference entity to its resolved [`ProjectionSpec`]
//! and holds the fixed projections for the primary entity, its survivor
//! sub-records and the two geographic tables. It is built once at startup and
//! is read-only afterwards.
//!
//! # Example
//!
//! ```rust
//! use incident_sync::core::catalog::ProjectionCatalog;
//!
//! let catalog = ProjectionCatalog::standard().unwrap();
//! let brackets = catalog.get("age_brackets").unwrap();
//! assert_eq!(
//!     brackets.field_names(),
//!     vec!["id", "created_at", "updated_at", "min", "max"]
//! );
//! ```

pub mod projection;
pub mod tables;

pub use projection::{Column, FieldRule, ProjectionSpec, BASE_FIELDS};
pub use tables::ChildRelation;

use crate::domain::{Result, SyncError};
use std::collections::BTreeMap;

/// Read-only registry of every projection the extractor runs
#[derive(Debug, Clone)]
pub struct ProjectionCatalog {
    entities: BTreeMap<String, ProjectionSpec>,
    incident: ProjectionSpec,
    survivor: ProjectionSpec,
    county: ProjectionSpec,
    sub_county: ProjectionSpec,
}

impl ProjectionCatalog {
    /// Build the catalog for the case-management schema
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Configuration`] if any static definition fails
    /// identifier validation.
    pub fn standard() -> Result<Self> {
        Self::from_rules(tables::REFERENCE_ENTITIES)
    }

    /// Build a catalog from an explicit reference entity list
    ///
    /// The primary, survivor and geographic projections are always included.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Configuration`] on an invalid identifier or a
    /// duplicated entity name.
    pub fn from_rules(reference: &[(&str, &[FieldRule])]) -> Result<Self> {
        let mut entities = BTreeMap::new();
        for (name, rules) in reference {
            let spec = ProjectionSpec::resolve(name, &BASE_FIELDS, rules)?;
            if entities.insert(name.to_string(), spec).is_some() {
                return Err(SyncError::Configuration(format!(
                    "Entity '{name}' is registered twice"
                )));
            }
        }

        let incident = ProjectionSpec::from_columns(
            tables::INCIDENT_TABLE,
            tables::INCIDENT_COLUMNS
                .iter()
                .map(|c| Column::plain(*c))
                .collect(),
        )?;

        let survivor = ProjectionSpec::from_columns(
            tables::SURVIVOR_TABLE,
            tables::SURVIVOR_COLUMNS
                .iter()
                .map(|c| Column::plain(*c))
                .collect(),
        )?;

        let county =
            ProjectionSpec::resolve(tables::COUNTY_TABLE, &BASE_FIELDS, tables::COUNTY_RULES)?;
        let sub_county = ProjectionSpec::resolve(
            tables::SUB_COUNTY_TABLE,
            &BASE_FIELDS,
            tables::SUB_COUNTY_RULES,
        )?;

        for relation in &tables::CHILD_RELATIONS {
            projection::check_identifier(relation.table, relation.table)?;
            projection::check_identifier(relation.table, relation.value_column)?;
        }

        let catalog = Self {
            entities,
            incident,
            survivor,
            county,
            sub_county,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Look up a reference entity projection by name
    pub fn get(&self, entity_name: &str) -> Option<&ProjectionSpec> {
        self.entities.get(entity_name)
    }

    /// Reference entity projections in name order
    pub fn iter(&self) -> impl Iterator<Item = &ProjectionSpec> {
        self.entities.values()
    }

    /// Number of reference entities
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Projection of the primary entity
    pub fn incident(&self) -> &ProjectionSpec {
        &self.incident
    }

    /// Projection of survivor sub-records
    pub fn survivor(&self) -> &ProjectionSpec {
        &self.survivor
    }

    /// Projection of the parent geographic table
    pub fn county(&self) -> &ProjectionSpec {
        &self.county
    }

    /// Projection of the child geographic table
    pub fn sub_county(&self) -> &ProjectionSpec {
        &self.sub_county
    }

    /// One-to-many id relations of the primary entity
    pub fn child_relations(&self) -> &'static [ChildRelation] {
        &tables::CHILD_RELATIONS
    }

    /// Check the structural requirements the extractor relies on
    ///
    /// Every windowed projection must select `id` and `updated_at`, survivors
    /// must carry the case key, and sub-counties must carry the county key.
    pub fn validate(&self) -> Result<()> {
        let windowed = self
            .entities
            .values()
            .chain([&self.incident, &self.county, &self.sub_county]);
        for spec in windowed {
            for required in ["id", "updated_at"] {
                if !spec.selects_column(required) {
                    return Err(SyncError::Configuration(format!(
                        "Projection for '{}' must select '{required}'",
                        spec.entity_name()
                    )));
                }
            }
        }

        if !self.survivor.selects_column(tables::CASE_FOREIGN_KEY) {
            return Err(SyncError::Configuration(format!(
                "Projection for '{}' must select '{}'",
                self.survivor.entity_name(),
                tables::CASE_FOREIGN_KEY
            )));
        }

        if !self.sub_county.selects_column(tables::COUNTY_FOREIGN_KEY) {
            return Err(SyncError::Configuration(format!(
                "Projection for '{}' must select '{}'",
                self.sub_county.entity_name(),
                tables::COUNTY_FOREIGN_KEY
            )));
        }

        Ok(())
    }
}
