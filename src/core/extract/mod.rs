//! Extraction layer
//!
//! Reads changed rows from the relational store for both channels. Every
//! query is built from the [`ProjectionCatalog`] and bound to a single
//! watermark parameter. Incident and reference pages are capped and anything
//! beyond the cap is left for the next run; child and survivor sets for an
//! incident page are never truncated, and overflowing their cap fails the
//! phase.
//!
//! The primary dataset is read in separate steps (parents, then each child
//! relation and the survivor sub-records restricted to the same parent
//! window) and joined in memory.

pub mod primary;
pub mod query;

pub use query::SelectQuery;

use crate::adapters::database::RelationalStore;
use crate::config::ExtractConfig;
use crate::core::catalog::tables::{CASE_FOREIGN_KEY, COUNTY_FOREIGN_KEY, SUB_COUNTY_NEST_KEY};
use crate::core::catalog::{ProjectionCatalog, ProjectionSpec};
use crate::core::normalize::{collect_child_values, nest_children};
use crate::core::state::Watermark;
use crate::domain::{RawIncident, RawRow, Result, SyncError};
use primary::ChildSet;
use std::sync::Arc;

/// Raw output of the primary extraction
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrimaryExtract {
    /// Incidents with child collections, oldest change first
    pub incidents: Vec<RawIncident>,
    /// Survivor rows for those incidents, not yet attached
    pub survivors: Vec<RawRow>,
}

/// Runs catalog queries against a relational store
pub struct Extractor {
    store: Arc<dyn RelationalStore + Send + Sync>,
    catalog: Arc<ProjectionCatalog>,
    limits: ExtractConfig,
}

impl Extractor {
    pub fn new(
        store: Arc<dyn RelationalStore + Send + Sync>,
        catalog: Arc<ProjectionCatalog>,
        limits: ExtractConfig,
    ) -> Self {
        Self {
            store,
            catalog,
            limits,
        }
    }

    /// Catalog the extractor reads with
    pub fn catalog(&self) -> &ProjectionCatalog {
        &self.catalog
    }

    /// Read incidents changed after the watermark with their children
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::SyncError::QueryFailure`] if any of the
    /// queries fails; partial results are discarded.
    pub async fn extract_primary_entities(&self, since: &Watermark) -> Result<PrimaryExtract> {
        let incident_spec = self.catalog.incident();
        let parents = self
            .store
            .query(
                &SelectQuery::window(incident_spec, self.limits.incident_limit),
                since.timestamp,
            )
            .await?;

        if parents.is_empty() {
            tracing::info!(since = %since.timestamp, "No changed incidents");
            return Ok(PrimaryExtract::default());
        }

        let mut child_sets = Vec::with_capacity(self.catalog.child_relations().len());
        for relation in self.catalog.child_relations() {
            let query = SelectQuery::children(
                relation,
                CASE_FOREIGN_KEY,
                incident_spec,
                self.limits.incident_limit,
                self.limits.child_limit.saturating_add(1),
            );
            let rows = self.store.query(&query, since.timestamp).await?;
            ensure_within_cap(query.entity(), rows.len(), self.limits.child_limit, "child_limit")?;

            child_sets.push(ChildSet {
                output: relation.output,
                values: collect_child_values(rows, CASE_FOREIGN_KEY, relation.value_column),
            });
        }

        let survivors = self
            .store
            .query(
                &SelectQuery::related(
                    self.catalog.survivor(),
                    CASE_FOREIGN_KEY,
                    incident_spec,
                    self.limits.incident_limit,
                    self.limits.survivor_limit.saturating_add(1),
                ),
                since.timestamp,
            )
            .await?;
        ensure_within_cap(
            self.catalog.survivor().entity_name(),
            survivors.len(),
            self.limits.survivor_limit,
            "survivor_limit",
        )?;

        let incidents = primary::assemble(parents, child_sets);
        warn_if_capped(
            incident_spec.entity_name(),
            incidents.len(),
            self.limits.incident_limit,
        );
        tracing::info!(
            incidents = incidents.len(),
            survivors = survivors.len(),
            "Extracted primary entities"
        );

        Ok(PrimaryExtract {
            incidents,
            survivors,
        })
    }

    /// Read rows of one reference entity changed after the watermark
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::SyncError::QueryFailure`] if the query fails.
    pub async fn extract_entity(
        &self,
        spec: &ProjectionSpec,
        since: &Watermark,
    ) -> Result<Vec<RawRow>> {
        self.windowed(spec, self.limits.entity_limit, since).await
    }

    /// Read changed counties with their changed sub-counties nested
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::SyncError::QueryFailure`] if either query fails.
    pub async fn extract_geography(&self, since: &Watermark) -> Result<Vec<RawRow>> {
        let counties = self
            .windowed(self.catalog.county(), self.limits.geography_limit, since)
            .await?;
        let sub_counties = self
            .windowed(self.catalog.sub_county(), self.limits.geography_limit, since)
            .await?;

        Ok(nest_children(
            counties,
            sub_counties,
            COUNTY_FOREIGN_KEY,
            SUB_COUNTY_NEST_KEY,
        ))
    }

    async fn windowed(
        &self,
        spec: &ProjectionSpec,
        limit: usize,
        since: &Watermark,
    ) -> Result<Vec<RawRow>> {
        let rows = self
            .store
            .query(&SelectQuery::window(spec, limit), since.timestamp)
            .await?;
        warn_if_capped(spec.entity_name(), rows.len(), limit);
        tracing::debug!(entity = spec.entity_name(), rows = rows.len(), "Extracted entity");
        Ok(rows)
    }
}

fn warn_if_capped(entity: &str, rows: usize, limit: usize) {
    if rows >= limit {
        tracing::warn!(
            entity,
            rows,
            limit,
            "Page cap reached; remaining rows are deferred to the next run"
        );
    }
}

/// Child and survivor rows for the incident page must arrive complete
///
/// Queries ask for one row past the cap, so exceeding it is detectable.
fn ensure_within_cap(entity: &str, rows: usize, limit: usize, setting: &str) -> Result<()> {
    if rows > limit {
        return Err(SyncError::QueryFailure(format!(
            "{entity} returned more than {limit} rows for the incident page; raise extract.{setting}"
        )));
    }
    Ok(())
}
