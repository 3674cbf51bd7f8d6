//! Saved dashboard reports.
//!
//! The `--json` flag and `--emit-report` both serialize the same
//! [`DashboardReport`]: a generation timestamp plus the full [`Dashboard`].
//!
//! ```rust,ignore
//! use healthdash::{DashboardConfig, DashboardSession, ReportGenerator};
//! use std::path::PathBuf;
//!
//! let session = DashboardSession::open(DashboardConfig::default())?;
//! let generator = ReportGenerator::new(PathBuf::from("outputs"));
//! generator.write_report_to_file(&session.dashboard()?, "healthcare_dataset")?;
//! ```
//!
//! [`Dashboard`]: crate::presentation::Dashboard

mod generator;

pub use generator::{DashboardReport, ReportGenerator};
