//! Filter engine: inclusion sets over the gender and condition columns.

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use tracing::debug;

use crate::error::Result;
use crate::loader::LoadedTable;
use crate::resolver::ResolvedColumns;
use crate::utils::column_as_strings;

/// Option standing for a blank gender or condition cell.
pub const MISSING_OPTION: &str = "(missing)";

/// Allowed values for the two filterable roles.
///
/// A row is kept only when its gender is in `genders` AND its condition is
/// in `conditions`. Blank cells match [`MISSING_OPTION`]. An empty set keeps
/// nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub genders: BTreeSet<String>,
    pub conditions: BTreeSet<String>,
}

impl FilterState {
    /// Select every distinct gender and condition in the table, blanks included.
    pub fn all(table: &LoadedTable, columns: &ResolvedColumns) -> Result<Self> {
        let df = table.frame();
        Ok(Self {
            genders: FilterEngine::distinct_values(df, &columns.gender)?
                .into_iter()
                .collect(),
            conditions: FilterEngine::distinct_values(df, &columns.condition)?
                .into_iter()
                .collect(),
        })
    }

    /// Replace the allowed genders.
    pub fn with_genders<I, S>(mut self, genders: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.genders = genders.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the allowed conditions.
    pub fn with_conditions<I, S>(mut self, conditions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.conditions = conditions.into_iter().map(Into::into).collect();
        self
    }

    /// True when either set is empty, so no row can pass.
    pub fn selects_nothing(&self) -> bool {
        self.genders.is_empty() || self.conditions.is_empty()
    }
}

/// Applies a [`FilterState`] to a loaded table.
pub struct FilterEngine;

impl FilterEngine {
    /// Produce the filtered view. The loaded table is left untouched.
    pub fn apply(
        table: &LoadedTable,
        columns: &ResolvedColumns,
        state: &FilterState,
    ) -> Result<DataFrame> {
        let df = table.frame();
        if state.selects_nothing() {
            debug!("Filter selects no gender or no condition; view is empty");
            return Ok(df.head(Some(0)));
        }

        let genders = column_as_strings(df, &columns.gender)?;
        let conditions = column_as_strings(df, &columns.condition)?;

        let mask: Vec<bool> = genders
            .iter()
            .zip(conditions.iter())
            .map(|(gender, condition)| {
                state.genders.contains(option_label(gender))
                    && state.conditions.contains(option_label(condition))
            })
            .collect();

        let view = df.filter(&BooleanChunked::from_slice("filter".into(), &mask))?;
        debug!(
            "Filter kept {} of {} rows ({} genders, {} conditions allowed)",
            view.height(),
            df.height(),
            state.genders.len(),
            state.conditions.len()
        );
        Ok(view)
    }

    /// Distinct values of a column in first-appearance order. Blank cells
    /// show up once as [`MISSING_OPTION`].
    pub fn distinct_values(df: &DataFrame, column: &str) -> Result<Vec<String>> {
        let mut seen = HashSet::new();
        let values = column_as_strings(df, column)?
            .iter()
            .map(|value| option_label(value).to_string())
            .filter(|value| seen.insert(value.clone()))
            .collect();
        Ok(values)
    }
}

fn option_label(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or(MISSING_OPTION)
}
