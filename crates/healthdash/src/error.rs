//! Custom error types for the dashboard pipeline.
//!
//! Only two failures are fatal to a render: the dataset cannot be loaded, or
//! a required semantic role has no matching column. Everything downstream of
//! resolution (empty filter selections, unparsable dates) degrades to
//! "no data" instead of failing.
//!
//! Errors are serializable so a frontend can display them as `{code, message}`.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

use crate::resolver::SemanticRole;

/// The main error type for the dashboard pipeline.
#[derive(Error, Debug)]
pub enum DashboardError {
    /// The dataset file is missing, unreadable, or has no usable header.
    #[error("Failed to load dataset '{path}': {reason}")]
    DataLoad { path: String, reason: String },

    /// A required semantic role has no matching column.
    #[error("No column found for required role '{role}' (expected a column name containing \"{keyword}\")")]
    ColumnResolution {
        role: SemanticRole,
        keyword: &'static str,
    },

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<DashboardError>,
    },
}

impl DashboardError {
    /// Build a [`DashboardError::DataLoad`] for the given path.
    pub fn data_load(path: impl Into<String>, reason: impl Into<String>) -> Self {
        DashboardError::DataLoad {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Build a [`DashboardError::ColumnResolution`] for a role.
    pub fn unresolved(role: SemanticRole) -> Self {
        DashboardError::ColumnResolution {
            role,
            keyword: role.keyword(),
        }
    }

    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        DashboardError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get error code for frontend handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::DataLoad { .. } => "DATA_LOAD_ERROR",
            Self::ColumnResolution { .. } => "COLUMN_RESOLUTION_ERROR",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Whether this error prevents the dashboard from rendering at all.
    ///
    /// Load and resolution failures are fatal. Config errors are not, since
    /// the caller can fix the input and retry.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::InvalidConfig(_) => false,
            Self::WithContext { source, .. } => source.is_fatal(),
            _ => true,
        }
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for DashboardError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("DashboardError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

impl From<crate::config::ConfigValidationError> for DashboardError {
    fn from(err: crate::config::ConfigValidationError) -> Self {
        DashboardError::InvalidConfig(err.to_string())
    }
}

/// Result type alias for dashboard operations.
pub type Result<T> = std::result::Result<T, DashboardError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| DashboardError::Polars(e).with_context(context))
    }
}

impl<T> ResultExt<T> for std::io::Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| DashboardError::Io(e).with_context(context))
    }
}
