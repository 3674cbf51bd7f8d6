//! Healthcare Dashboard Library
//!
//! Loads a patient-admission CSV, binds its columns to semantic roles, and
//! turns a filtered view of it into KPI cards, chart descriptions, insights
//! and a table preview.
//!
//! # Overview
//!
//! The pipeline runs in five stages:
//!
//! - **Loader**: reads the CSV with Polars, trims header names, and samples
//!   large files down to a fixed row cap with a seeded RNG
//! - **Column Resolver**: binds gender, condition, admission, discharge,
//!   billing, insurance and age to columns by case-insensitive keyword match
//! - **Filter Engine**: keeps rows whose gender and condition are both in the
//!   selected sets
//! - **Aggregation**: KPIs, ranked distributions, the patient journey funnel,
//!   and month-bucketed time series
//! - **Presentation**: formats everything into a [`Dashboard`] and lays it
//!   out on any [`RenderSurface`]
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use healthdash::{DashboardConfig, DashboardSession, TerminalSurface};
//!
//! let config = DashboardConfig::builder()
//!     .data_path("data/healthcare_dataset.csv")
//!     .build()?;
//!
//! let mut session = DashboardSession::open(config)?;
//! let dashboard = session.set_gender_filter(["Female"])?;
//!
//! let mut surface = TerminalSurface::new(std::io::stdout());
//! dashboard.render_to(&mut surface)?;
//! ```
//!
//! # Rendering
//!
//! Implement [`RenderSurface`] to draw the dashboard somewhere other than a
//! terminal. Charts arrive as [`ChartSpec`] values (kind, title, series,
//! palette, axis labels); the surface decides how to draw them.
//!
//! # Errors
//!
//! Only a failed load or an unresolvable required column is an error. An
//! empty filter selection or an unparsable date yields "no data" values
//! instead.

pub mod aggregation;
pub mod config;
pub mod error;
pub mod filter;
pub mod loader;
pub mod presentation;
pub mod reporting;
pub mod resolver;
pub mod session;
pub mod utils;

// Re-exports for convenient access
pub use aggregation::{Aggregates, CategoryCount, Kpis, RankedDistribution};
pub use config::{ConfigValidationError, DashboardConfig, DashboardConfigBuilder};
pub use error::{DashboardError, Result as DashboardResult, ResultExt};
pub use filter::{FilterEngine, FilterState, MISSING_OPTION};
pub use loader::{DatasetLoader, LoadedTable, TableSummary};
pub use presentation::{
    ChartKind, ChartSeries, ChartSpec, Dashboard, FilterControl, KpiCard, PageLayout,
    RenderSurface, TablePreview, TerminalSurface,
};
pub use reporting::{DashboardReport, ReportGenerator};
pub use resolver::{ColumnResolver, ResolvedColumns, SemanticRole};
pub use session::DashboardSession;
pub use utils::{clean_numeric_string, is_error_marker, parse_numeric_string};
