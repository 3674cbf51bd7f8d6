//! Tabular preview of the filtered view.

use polars::prelude::*;
use serde::Serialize;

use crate::utils::{column_as_strings, column_names};

/// First rows of the view, every cell rendered as a string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TablePreview {
    pub columns: Vec<String>,
    /// Row-major; missing cells are empty strings.
    pub rows: Vec<Vec<String>>,
    /// Rows in the view, not just the ones shown.
    pub total_rows: usize,
}

impl TablePreview {
    pub fn from_frame(view: &DataFrame, max_rows: usize) -> PolarsResult<Self> {
        let head = view.head(Some(max_rows));
        let columns = column_names(&head);

        let mut rows = vec![Vec::with_capacity(columns.len()); head.height()];
        for name in &columns {
            for (row, cell) in rows.iter_mut().zip(column_as_strings(&head, name)?) {
                row.push(cell.unwrap_or_default());
            }
        }

        Ok(Self {
            columns,
            rows,
            total_rows: view.height(),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
