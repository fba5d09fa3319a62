//! Read-only query builder
//!
//! SQL text is assembled only from catalog identifiers, which are validated
//! when the catalog is built. The watermark is the single bound parameter
//! (`$1`) of every query produced here.

use crate::core::catalog::{ChildRelation, Column, ProjectionSpec};
use std::fmt;

/// A prepared read query with exactly one timestamp parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectQuery {
    entity: String,
    sql: String,
}

impl SelectQuery {
    /// Rows of `spec` changed after the watermark, oldest first, capped at `limit`
    ///
    /// # Examples
    ///
    /// ```rust
    /// use incident_sync::core::catalog::{ProjectionSpec, BASE_FIELDS};
    /// use incident_sync::core::extract::SelectQuery;
    ///
    /// let spec = ProjectionSpec::resolve("referrals", &BASE_FIELDS, &[]).unwrap();
    /// let query = SelectQuery::window(&spec, 1000);
    /// assert!(query.sql().ends_with("LIMIT 1000"));
    /// ```
    pub fn window(spec: &ProjectionSpec, limit: usize) -> Self {
        let sql = format!(
            "SELECT {} FROM {} t WHERE {} ORDER BY {} LIMIT {}",
            select_list("t", spec.columns()),
            quote(spec.entity_name()),
            window_predicate("t"),
            window_order("t"),
            limit
        );

        Self {
            entity: spec.entity_name().to_string(),
            sql,
        }
    }

    /// Child id pairs `(case_id, value)` for every parent inside the window
    ///
    /// The parent subquery repeats the parent window exactly, so the child
    /// set always matches the parent page.
    pub fn children(
        relation: &ChildRelation,
        foreign_key: &str,
        parent: &ProjectionSpec,
        parent_limit: usize,
        limit: usize,
    ) -> Self {
        let columns = [
            Column::plain(foreign_key),
            Column::plain(relation.value_column),
        ];
        Self::related_rows(
            relation.table,
            &columns,
            foreign_key,
            parent,
            parent_limit,
            limit,
        )
    }

    /// Rows of `spec` whose `foreign_key` points at a parent inside the window
    pub fn related(
        spec: &ProjectionSpec,
        foreign_key: &str,
        parent: &ProjectionSpec,
        parent_limit: usize,
        limit: usize,
    ) -> Self {
        Self::related_rows(
            spec.entity_name(),
            spec.columns(),
            foreign_key,
            parent,
            parent_limit,
            limit,
        )
    }

    fn related_rows(
        table: &str,
        columns: &[Column],
        foreign_key: &str,
        parent: &ProjectionSpec,
        parent_limit: usize,
        limit: usize,
    ) -> Self {
        let sql = format!(
            "SELECT {} FROM {} c WHERE c.{} IN (SELECT p.{} FROM {} p WHERE {} ORDER BY {} LIMIT {}) ORDER BY c.{} ASC LIMIT {}",
            select_list("c", columns),
            quote(table),
            quote(foreign_key),
            quote("id"),
            quote(parent.entity_name()),
            window_predicate("p"),
            window_order("p"),
            parent_limit,
            quote(foreign_key),
            limit
        );

        Self {
            entity: table.to_string(),
            sql,
        }
    }

    /// Table the query reads from
    pub fn entity(&self) -> &str {
        &self.entity
    }

    /// SQL text, with `$1` as the watermark placeholder
    pub fn sql(&self) -> &str {
        &self.sql
    }
}

impl fmt::Display for SelectQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}

fn quote(identifier: &str) -> String {
    format!("\"{identifier}\"")
}

fn select_list(table_alias: &str, columns: &[Column]) -> String {
    columns
        .iter()
        .map(|column| match &column.alias {
            Some(alias) => format!("{table_alias}.{} AS {}", quote(&column.name), quote(alias)),
            None => format!("{table_alias}.{}", quote(&column.name)),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn window_predicate(table_alias: &str) -> String {
    format!("{table_alias}.{} > $1::timestamptz", quote("updated_at"))
}

fn window_order(table_alias: &str) -> String {
    format!(
        "{table_alias}.{} ASC, {table_alias}.{} ASC",
        quote("updated_at"),
        quote("id")
    )
}
