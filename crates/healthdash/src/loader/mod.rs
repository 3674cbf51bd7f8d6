//! Dataset loading: CSV → normalized, size-capped `DataFrame`.
//!
//! Loading happens once per session. The result is a [`LoadedTable`] that is
//! never mutated afterwards; every filter change works on views of it.

mod sampling;

pub use sampling::sample_row_mask;

use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

use crate::config::DashboardConfig;
use crate::error::{DashboardError, Result};
use crate::utils::column_names;

/// The in-memory table a session works from.
#[derive(Debug, Clone)]
pub struct LoadedTable {
    df: DataFrame,
    original_rows: usize,
    source: String,
}

impl LoadedTable {
    /// The loaded rows, capped and with trimmed column names.
    pub fn frame(&self) -> &DataFrame {
        &self.df
    }

    /// Row count of the source before sampling.
    pub fn original_rows(&self) -> usize {
        self.original_rows
    }

    /// Row count kept in memory.
    pub fn rows(&self) -> usize {
        self.df.height()
    }

    /// Whether sampling dropped rows.
    pub fn was_sampled(&self) -> bool {
        self.rows() < self.original_rows
    }

    /// Column names in header order.
    pub fn column_names(&self) -> Vec<String> {
        column_names(&self.df)
    }

    /// Summary for display and reports.
    pub fn summary(&self) -> TableSummary {
        TableSummary {
            source: self.source.clone(),
            original_rows: self.original_rows,
            loaded_rows: self.rows(),
            columns: self.df.width(),
            sampled: self.was_sampled(),
        }
    }
}

/// Serializable description of a [`LoadedTable`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableSummary {
    pub source: String,
    pub original_rows: usize,
    pub loaded_rows: usize,
    pub columns: usize,
    pub sampled: bool,
}

/// Reads and normalizes the dataset.
pub struct DatasetLoader;

impl DatasetLoader {
    /// Load the CSV named by `config.data_path`.
    pub fn load(config: &DashboardConfig) -> Result<LoadedTable> {
        let path = config.data_path.as_path();
        let source_name = path.display().to_string();

        if !path.exists() {
            return Err(DashboardError::data_load(&source_name, "file not found"));
        }

        info!("Loading dataset from: {}", source_name);
        let df = read_csv_with_fallback(path)
            .map_err(|e| DashboardError::data_load(&source_name, e.to_string()))?;
        debug!("Raw dataset shape: {:?}", df.shape());

        Self::normalize(df, config, source_name)
    }

    /// Apply the same normalization to a frame that is already in memory.
    pub fn from_dataframe(df: DataFrame, config: &DashboardConfig) -> Result<LoadedTable> {
        Self::normalize(df, config, "<memory>".to_string())
    }

    fn normalize(df: DataFrame, config: &DashboardConfig, source: String) -> Result<LoadedTable> {
        if df.width() == 0 {
            return Err(DashboardError::data_load(&source, "dataset has no header"));
        }

        let df = trim_column_names(df).map_err(|reason| DashboardError::data_load(&source, reason))?;
        let original_rows = df.height();

        let df = if original_rows > config.max_rows {
            let mask = sample_row_mask(original_rows, config.max_rows, config.sample_seed);
            let sampled = df.filter(&mask)?;
            info!(
                "Sampled {} of {} rows (seed {})",
                sampled.height(),
                original_rows,
                config.sample_seed
            );
            sampled
        } else {
            df
        };

        info!("Dataset loaded: {} rows x {} columns", df.height(), df.width());

        Ok(LoadedTable {
            df,
            original_rows,
            source,
        })
    }
}

/// Read with inferred column types, then retry with every column as text.
///
/// Types are inferred from the first 100 rows, so a stray `N/A` further down
/// a numeric column fails the first pass. Text columns are parsed per cell
/// later on, which turns such values into missing entries.
fn read_csv_with_fallback(path: &Path) -> PolarsResult<DataFrame> {
    match read_csv(path, Some(100)) {
        Ok(df) => return Ok(df),
        Err(e) => {
            debug!("Typed loading failed: {}", e);
        }
    }

    debug!("Retrying with every column read as text");
    read_csv(path, Some(0))
}

fn read_csv(path: &Path, infer_schema_length: Option<usize>) -> PolarsResult<DataFrame> {
    CsvReadOptions::default()
        .with_infer_schema_length(infer_schema_length)
        .with_has_header(true)
        .with_parse_options(CsvParseOptions::default().with_quote_char(Some(b'"')))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()
}

/// Strip surrounding whitespace from every column name.
fn trim_column_names(mut df: DataFrame) -> std::result::Result<DataFrame, String> {
    let trimmed: Vec<String> = column_names(&df)
        .iter()
        .map(|name| name.trim().to_string())
        .collect();

    if let Some(empty) = trimmed.iter().position(String::is_empty) {
        return Err(format!("column {} has an empty name", empty + 1));
    }

    let mut seen = HashSet::new();
    if let Some(duplicate) = trimmed.iter().find(|name| !seen.insert(name.as_str())) {
        return Err(format!("duplicate column name '{}' after trimming", duplicate));
    }

    df.set_column_names(trimmed.iter().map(String::as_str))
        .map_err(|e| e.to_string())?;
    Ok(df)
}
