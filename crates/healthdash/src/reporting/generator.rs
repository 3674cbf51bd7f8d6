use chrono::Local;
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

use crate::error::{Result, ResultExt};
use crate::presentation::Dashboard;

/// A dashboard snapshot with the time it was produced.
#[derive(Debug, Serialize)]
pub struct DashboardReport<'a> {
    /// Local time, `YYYY-MM-DD HH:MM:SS`.
    pub generated_at: String,
    pub dashboard: &'a Dashboard,
}

impl<'a> DashboardReport<'a> {
    pub fn new(dashboard: &'a Dashboard) -> Self {
        Self {
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            dashboard,
        }
    }
}

/// Writes dashboard reports under one output directory.
pub struct ReportGenerator {
    output_dir: PathBuf,
}

impl ReportGenerator {
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }

    /// Write `<output_dir>/<report_base_name>_dashboard.json` and return its path.
    /// The directory is created if needed.
    pub fn write_report_to_file(
        &self,
        dashboard: &Dashboard,
        report_base_name: &str,
    ) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)
            .context(format!("Creating {}", self.output_dir.display()))?;

        let report_path = self
            .output_dir
            .join(format!("{}_dashboard.json", report_base_name));
        let report = DashboardReport::new(dashboard);
        let mut file = File::create(&report_path)?;
        file.write_all(serde_json::to_string_pretty(&report)?.as_bytes())?;

        info!("Report saved: {}", report_path.display());

        Ok(report_path)
    }
}
