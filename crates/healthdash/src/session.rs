//! Interactive session: one loaded table, a mutable filter state, and a
//! full recomputation on every change.

use std::collections::BTreeSet;
use tracing::{debug, info};

use crate::aggregation::Aggregates;
use crate::config::DashboardConfig;
use crate::error::{Result, ResultExt};
use crate::filter::{FilterEngine, FilterState};
use crate::loader::{DatasetLoader, LoadedTable};
use crate::presentation::{Dashboard, DashboardParts, FilterControl, TablePreview};
use crate::resolver::{ColumnResolver, ResolvedColumns};

pub const GENDER_FILTER_LABEL: &str = "Select Gender";
pub const CONDITION_FILTER_LABEL: &str = "Select Medical Condition";

/// Holds the loaded table and current filters.
///
/// The table and its column roles are fixed at open time. Filter setters
/// return the recomputed dashboard so a caller never renders stale output.
#[derive(Debug, Clone)]
pub struct DashboardSession {
    config: DashboardConfig,
    table: LoadedTable,
    columns: ResolvedColumns,
    gender_options: Vec<String>,
    condition_options: Vec<String>,
    filters: FilterState,
}

static_assertions::assert_impl_all!(DashboardSession: Send, Sync);

impl DashboardSession {
    /// Load the configured dataset and resolve its columns.
    pub fn open(config: DashboardConfig) -> Result<Self> {
        config.validate()?;
        let table = DatasetLoader::load(&config)?;
        Self::from_table(config, table)
    }

    /// Start a session over a table that is already loaded.
    pub fn from_table(config: DashboardConfig, table: LoadedTable) -> Result<Self> {
        let columns = ColumnResolver::resolve(&table.column_names())?;
        let gender_options = FilterEngine::distinct_values(table.frame(), &columns.gender)
            .context("Collecting gender options")?;
        let condition_options = FilterEngine::distinct_values(table.frame(), &columns.condition)
            .context("Collecting condition options")?;

        let filters = FilterState::all(&table, &columns)?;

        info!(
            "Session ready: {} genders, {} conditions",
            gender_options.len(),
            condition_options.len()
        );

        Ok(Self {
            config,
            table,
            columns,
            gender_options,
            condition_options,
            filters,
        })
    }

    pub fn table(&self) -> &LoadedTable {
        &self.table
    }

    pub fn columns(&self) -> &ResolvedColumns {
        &self.columns
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    /// The two sidebar controls. Options keep first-appearance order;
    /// `selected` lists the chosen options in that same order.
    pub fn filter_controls(&self) -> Vec<FilterControl> {
        let control = |label: &str, options: &[String], chosen: &BTreeSet<String>| {
            FilterControl {
                label: label.to_string(),
                options: options.to_vec(),
                selected: options
                    .iter()
                    .filter(|option| chosen.contains(*option))
                    .cloned()
                    .collect(),
            }
        };

        vec![
            control(GENDER_FILTER_LABEL, &self.gender_options, &self.filters.genders),
            control(
                CONDITION_FILTER_LABEL,
                &self.condition_options,
                &self.filters.conditions,
            ),
        ]
    }

    pub fn set_gender_filter<I, S>(&mut self, genders: I) -> Result<Dashboard>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filters = std::mem::take(&mut self.filters).with_genders(genders);
        self.dashboard()
    }

    pub fn set_condition_filter<I, S>(&mut self, conditions: I) -> Result<Dashboard>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filters = std::mem::take(&mut self.filters).with_conditions(conditions);
        self.dashboard()
    }

    /// Select every option again.
    pub fn reset_filters(&mut self) -> Result<Dashboard> {
        self.filters = FilterState::all(&self.table, &self.columns)?;
        self.dashboard()
    }

    /// Recompute everything for the current filters.
    pub fn dashboard(&self) -> Result<Dashboard> {
        let view = FilterEngine::apply(&self.table, &self.columns, &self.filters)
            .context("Applying filters")?;
        debug!("Recomputing dashboard over {} rows", view.height());

        let aggregates = Aggregates::compute(&view, &self.columns)?;
        let preview =
            TablePreview::from_frame(&view, self.config.preview_rows).context("Building preview")?;

        Ok(Dashboard::assemble(DashboardParts {
            title: &self.config.title,
            table: self.table.summary(),
            filters: self.filter_controls(),
            aggregates: &aggregates,
            admission_column: &self.columns.admission,
            preview,
        }))
    }
}
