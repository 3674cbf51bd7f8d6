//! Configuration types for the dashboard.
//!
//! This module provides configuration options using the builder pattern.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default location of the dataset, relative to the working directory.
pub const DEFAULT_DATA_PATH: &str = "data/healthcare_dataset.csv";

/// Environment variable consulted for the dataset path.
pub const DATA_PATH_ENV: &str = "HEALTHDASH_DATA";

/// Configuration for a dashboard session.
///
/// Use [`DashboardConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use healthdash::config::DashboardConfig;
///
/// let config = DashboardConfig::builder()
///     .data_path("data/healthcare_dataset.csv")
///     .max_rows(2000)
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Path to the CSV dataset.
    /// Default: "data/healthcare_dataset.csv"
    pub data_path: PathBuf,

    /// Maximum number of rows kept in memory after loading.
    /// Larger inputs are sampled down to exactly this many rows.
    /// Default: 2000
    pub max_rows: usize,

    /// Seed for the row sampler. The same seed on the same input always
    /// keeps the same rows.
    /// Default: 42
    pub sample_seed: u64,

    /// Number of rows shown in the table preview.
    /// Default: 20
    pub preview_rows: usize,

    /// Page title.
    /// Default: "Healthcare Data Dashboard"
    pub title: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            max_rows: 2000,
            sample_seed: 42,
            preview_rows: 20,
            title: "Healthcare Data Dashboard".to_string(),
        }
    }
}

impl DashboardConfig {
    /// Create a new configuration builder.
    pub fn builder() -> DashboardConfigBuilder {
        DashboardConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.max_rows == 0 {
            return Err(ConfigValidationError::InvalidMaxRows(self.max_rows));
        }

        if self.data_path.as_os_str().is_empty() {
            return Err(ConfigValidationError::EmptyDataPath);
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid max rows: {0} (must be at least 1)")]
    InvalidMaxRows(usize),

    #[error("Dataset path must not be empty")]
    EmptyDataPath,
}

/// Builder for [`DashboardConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct DashboardConfigBuilder {
    data_path: Option<PathBuf>,
    max_rows: Option<usize>,
    sample_seed: Option<u64>,
    preview_rows: Option<usize>,
    title: Option<String>,
}

impl DashboardConfigBuilder {
    /// Set the dataset path.
    pub fn data_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_path = Some(path.into());
        self
    }

    /// Set the row cap applied after loading.
    pub fn max_rows(mut self, rows: usize) -> Self {
        self.max_rows = Some(rows);
        self
    }

    /// Set the sampling seed.
    pub fn sample_seed(mut self, seed: u64) -> Self {
        self.sample_seed = Some(seed);
        self
    }

    /// Set how many rows the table preview shows.
    pub fn preview_rows(mut self, rows: usize) -> Self {
        self.preview_rows = Some(rows);
        self
    }

    /// Set the page title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `DashboardConfig` or an error if validation fails.
    pub fn build(self) -> Result<DashboardConfig, ConfigValidationError> {
        let defaults = DashboardConfig::default();
        let config = DashboardConfig {
            data_path: self.data_path.unwrap_or(defaults.data_path),
            max_rows: self.max_rows.unwrap_or(defaults.max_rows),
            sample_seed: self.sample_seed.unwrap_or(defaults.sample_seed),
            preview_rows: self.preview_rows.unwrap_or(defaults.preview_rows),
            title: self.title.unwrap_or(defaults.title),
        };

        config.validate()?;
        Ok(config)
    }
}
