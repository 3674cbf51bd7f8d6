//! Presentation adapter: aggregates → KPI cards, chart specs, insights and
//! a table preview, laid out on a [`RenderSurface`].
//!
//! # Page layout
//!
//! 1. Page title, wide layout.
//! 2. Sidebar "Filter Data" with the gender and condition multi-selects.
//! 3. Four KPI cards.
//! 4. Main charts: gender pie, condition bar, journey funnel, and the
//!    insurance sunburst / payment donut when their columns exist.
//! 5. "Extra Analytics": admissions line, billing area.
//! 6. "Sample Data Preview".
//!
//! [`Dashboard`] is plain data and serializes to JSON, so the same value
//! feeds the terminal renderer, `--json` output, and saved reports.

pub mod charts;
pub mod insights;
pub mod preview;
pub mod surface;

pub use charts::{
    CategoryPoint, ChartKind, ChartSeries, ChartSpec, SET3_PALETTE, SunburstNode, TimePoint,
};
pub use insights::{NO_DATA_INSIGHT, condition_insight, gender_insight};
pub use preview::TablePreview;
pub use surface::{PageLayout, RenderSurface, TerminalSurface};

use serde::Serialize;

use crate::aggregation::{Aggregates, Kpis};
use crate::error::Result;
use crate::loader::TableSummary;

/// Rendered in place of an average when the view has no usable values.
pub const NO_DATA: &str = "no data";

// ============================================================================
// KPI cards
// ============================================================================

/// A labelled headline number, already formatted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KpiCard {
    pub label: String,
    pub value: String,
}

impl KpiCard {
    fn new(label: &str, value: String) -> Self {
        Self {
            label: label.to_string(),
            value,
        }
    }
}

fn or_no_data(value: Option<f64>, format: impl FnOnce(f64) -> String) -> String {
    value.map(format).unwrap_or_else(|| NO_DATA.to_string())
}

/// Format the four headline metrics.
pub fn kpi_cards(kpis: &Kpis) -> Vec<KpiCard> {
    vec![
        KpiCard::new("Total Patients", kpis.total_patients.to_string()),
        KpiCard::new("Avg Age", or_no_data(kpis.avg_age, |v| format!("{:.1} yrs", v))),
        KpiCard::new(
            "Avg Billing",
            or_no_data(kpis.avg_billing, |v| format!("${:.2}", v)),
        ),
        KpiCard::new(
            "Avg Stay",
            or_no_data(kpis.avg_stay_days, |v| format!("{:.1} days", v)),
        ),
    ]
}

// ============================================================================
// Filter controls
// ============================================================================

/// A sidebar multi-select: every option, and which are currently chosen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterControl {
    pub label: String,
    pub options: Vec<String>,
    pub selected: Vec<String>,
}

// ============================================================================
// Dashboard
// ============================================================================

/// Inputs for [`Dashboard::assemble`].
pub struct DashboardParts<'a> {
    pub title: &'a str,
    pub table: TableSummary,
    pub filters: Vec<FilterControl>,
    pub aggregates: &'a Aggregates,
    /// Admission column name, used as the admissions chart x-axis label.
    pub admission_column: &'a str,
    pub preview: TablePreview,
}

/// A fully computed dashboard for one filter state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub title: String,
    pub table: TableSummary,
    pub filters: Vec<FilterControl>,
    pub kpis: Vec<KpiCard>,
    pub charts: Vec<ChartSpec>,
    pub extra_charts: Vec<ChartSpec>,
    pub preview: TablePreview,
    /// Informational lines, e.g. sampling or rows with unusable dates.
    pub notes: Vec<String>,
}

impl Dashboard {
    pub fn assemble(parts: DashboardParts<'_>) -> Self {
        let agg = parts.aggregates;

        let mut charts = vec![
            charts::gender_pie(&agg.gender).with_insight(gender_insight(&agg.gender)),
            charts::condition_bar(&agg.condition).with_insight(condition_insight(&agg.condition)),
            charts::journey_funnel(&agg.funnel),
        ];
        if let Some(ref departments) = agg.insurance_by_department {
            charts.push(charts::insurance_sunburst(departments));
        }
        if let Some(ref payments) = agg.payment_methods {
            charts.push(charts::payment_donut(payments));
        }

        let extra_charts = vec![
            charts::admissions_line(&agg.admissions_over_time, parts.admission_column),
            charts::billing_area(&agg.billing_over_time),
        ];

        let mut notes = Vec::new();
        if parts.table.sampled {
            notes.push(format!(
                "Showing a random sample of {} out of {} rows.",
                parts.table.loaded_rows, parts.table.original_rows
            ));
        }
        if agg.rows_with_bad_dates > 0 {
            notes.push(format!(
                "{} rows without usable admission/discharge dates are left out of stay and time charts.",
                agg.rows_with_bad_dates
            ));
        }

        Self {
            title: parts.title.to_string(),
            table: parts.table,
            filters: parts.filters,
            kpis: kpi_cards(&agg.kpis),
            charts,
            extra_charts,
            preview: parts.preview,
            notes,
        }
    }

    /// Find a chart by id in either section.
    pub fn chart(&self, id: &str) -> Option<&ChartSpec> {
        self.charts
            .iter()
            .chain(&self.extra_charts)
            .find(|chart| chart.id == id)
    }

    /// Lay the dashboard out on `surface`, top to bottom.
    pub fn render_to(&self, surface: &mut dyn RenderSurface) -> Result<()> {
        surface.page(&self.title, PageLayout::Wide)?;

        surface.sidebar_header("Filter Data")?;
        for control in &self.filters {
            surface.sidebar_multiselect(control)?;
        }

        for note in &self.notes {
            surface.markdown(note)?;
        }

        for card in &self.kpis {
            surface.metric(card)?;
        }
        surface.divider()?;

        for chart in &self.charts {
            surface.chart(chart)?;
        }

        surface.subheader("Extra Analytics")?;
        for chart in &self.extra_charts {
            surface.chart(chart)?;
        }

        surface.subheader("Sample Data Preview")?;
        surface.table_preview(&self.preview)?;
        Ok(())
    }
}
