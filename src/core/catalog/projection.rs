//! Projection specs
//!
//! A projection is the allow-listed column list read for one entity. It is
//! resolved once, at catalog construction, by applying an ordered rule list to
//! a shared base field set. Identifiers are validated here so that the query
//! builder can splice them into SQL text without ever seeing caller input.

use crate::domain::{Result, SyncError};
use regex::Regex;
use std::sync::OnceLock;

/// Fields every reference entity starts from
pub const BASE_FIELDS: [&str; 4] = ["id", "name", "created_at", "updated_at"];

/// One edit applied to the base field set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRule {
    /// Drop a field from the set (no-op if absent)
    Remove(&'static str),
    /// Append a column (no-op if a field with that name is already present)
    Add(&'static str),
    /// Append a column under a different output name
    AddAs {
        column: &'static str,
        alias: &'static str,
    },
}

/// A selected column, optionally renamed in the output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Column name in the table
    pub name: String,
    /// Output name, if different from the column name
    pub alias: Option<String>,
}

impl Column {
    /// A column selected under its own name
    pub fn plain(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
        }
    }

    /// A column selected under an alias
    pub fn aliased(name: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: Some(alias.into()),
        }
    }

    /// Key this column has in the output row
    pub fn output_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

/// The resolved, immutable column list for one entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectionSpec {
    entity_name: String,
    columns: Vec<Column>,
}

impl ProjectionSpec {
    /// Resolve a projection from a base field set and a rule list
    ///
    /// Order is preserved and output names never repeat.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Configuration`] if the entity name or any field
    /// reference is not a plain SQL identifier, or if the result is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use incident_sync::core::catalog::{FieldRule, ProjectionSpec, BASE_FIELDS};
    ///
    /// let spec = ProjectionSpec::resolve(
    ///     "age_brackets",
    ///     &BASE_FIELDS,
    ///     &[FieldRule::Remove("name"), FieldRule::Add("min"), FieldRule::Add("max")],
    /// )
    /// .unwrap();
    /// assert_eq!(spec.field_names(), vec!["id", "created_at", "updated_at", "min", "max"]);
    /// ```
    pub fn resolve(entity_name: &str, base: &[&str], rules: &[FieldRule]) -> Result<Self> {
        let mut columns: Vec<Column> = Vec::with_capacity(base.len() + rules.len());
        for field in base {
            push_unique(&mut columns, Column::plain(*field));
        }

        for rule in rules {
            match *rule {
                FieldRule::Remove(field) => columns.retain(|c| c.output_name() != field),
                FieldRule::Add(field) => push_unique(&mut columns, Column::plain(field)),
                FieldRule::AddAs { column, alias } => {
                    push_unique(&mut columns, Column::aliased(column, alias))
                }
            }
        }

        Self::from_columns(entity_name, columns)
    }

    /// Build a projection from an explicit column list
    ///
    /// # Errors
    ///
    /// Same validation as [`ProjectionSpec::resolve`]; duplicate output names
    /// are rejected rather than collapsed.
    pub fn from_columns(entity_name: &str, columns: Vec<Column>) -> Result<Self> {
        check_identifier(entity_name, entity_name)?;

        if columns.is_empty() {
            return Err(SyncError::Configuration(format!(
                "Projection for '{entity_name}' selects no columns"
            )));
        }

        for (index, column) in columns.iter().enumerate() {
            check_identifier(entity_name, &column.name)?;
            if let Some(alias) = &column.alias {
                check_identifier(entity_name, alias)?;
            }
            if columns[..index]
                .iter()
                .any(|c| c.output_name() == column.output_name())
            {
                return Err(SyncError::Configuration(format!(
                    "Projection for '{entity_name}' selects '{}' twice",
                    column.output_name()
                )));
            }
        }

        Ok(Self {
            entity_name: entity_name.to_string(),
            columns,
        })
    }

    /// Entity (and table) name
    pub fn entity_name(&self) -> &str {
        &self.entity_name
    }

    /// Selected columns in order
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Output field names in order
    pub fn field_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::output_name).collect()
    }

    /// Whether the table column is selected (under any output name)
    pub fn selects_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }
}

fn push_unique(columns: &mut Vec<Column>, column: Column) {
    if !columns
        .iter()
        .any(|c| c.output_name() == column.output_name())
    {
        columns.push(column);
    }
}

fn identifier_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[a-z_][a-z0-9_]{0,62}$").expect("identifier pattern is a valid regex")
    })
}

/// Check that a catalog name is a plain lower-case SQL identifier
pub(crate) fn check_identifier(entity_name: &str, identifier: &str) -> Result<()> {
    if identifier_pattern().is_match(identifier) {
        Ok(())
    } else {
        Err(SyncError::Configuration(format!(
            "Projection for '{entity_name}' references invalid identifier '{identifier}'"
        )))
    }
}
