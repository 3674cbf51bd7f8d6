//! Integration tests for the dashboard pipeline.
//!
//! These tests drive a [`DashboardSession`] end to end over CSV fixtures.

use healthdash::{
    ChartKind, ChartSeries, Dashboard, DashboardConfig, DashboardError, DashboardReport,
    DashboardSession, DatasetLoader, MISSING_OPTION, SemanticRole, TerminalSurface,
};
use polars::prelude::*;
use pretty_assertions::assert_eq;
use std::path::PathBuf;

// ============================================================================
// Helper Functions
// ============================================================================

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn config_for(filename: &str) -> DashboardConfig {
    DashboardConfig::builder()
        .data_path(fixtures_path().join(filename))
        .build()
        .expect("valid config")
}

fn open(filename: &str) -> DashboardSession {
    DashboardSession::open(config_for(filename)).expect("session should open")
}

fn kpi_values(dashboard: &Dashboard) -> Vec<&str> {
    dashboard.kpis.iter().map(|k| k.value.as_str()).collect()
}

fn insight<'a>(dashboard: &'a Dashboard, chart_id: &str) -> Option<&'a str> {
    dashboard
        .chart(chart_id)
        .and_then(|chart| chart.insight.as_deref())
}

/// A synthetic frame with `rows` rows and every required role present.
fn synthetic_frame(rows: usize) -> DataFrame {
    let genders: Vec<&str> = (0..rows).map(|i| if i % 2 == 0 { "F" } else { "M" }).collect();
    let conditions: Vec<&str> = (0..rows)
        .map(|i| ["Flu", "Cold", "Asthma"][i % 3])
        .collect();
    let admissions: Vec<String> = (0..rows)
        .map(|i| format!("2023-{:02}-01", i % 12 + 1))
        .collect();
    let discharges: Vec<String> = (0..rows)
        .map(|i| format!("2023-{:02}-03", i % 12 + 1))
        .collect();
    let billing: Vec<f64> = (0..rows).map(|i| i as f64).collect();
    let insurance: Vec<&str> = (0..rows).map(|_| "X").collect();
    let ages: Vec<i64> = (0..rows).map(|i| (i % 90) as i64).collect();
    let ids: Vec<i64> = (0..rows).map(|i| i as i64).collect();

    df!(
        "Id" => ids,
        "Gender" => genders,
        "Medical Condition" => conditions,
        "Date of Admission" => admissions,
        "Discharge Date" => discharges,
        "Billing Amount" => billing,
        "Insurance Provider" => insurance,
        "Age" => ages
    )
    .unwrap()
}

// ============================================================================
// End-to-End Scenario
// ============================================================================

#[test]
fn test_three_patient_scenario() {
    let session = open("three_patients.csv");
    let dashboard = session.dashboard().unwrap();

    assert_eq!(kpi_values(&dashboard), vec!["3", "40.0 yrs", "$150.00", "2.7 days"]);
    assert_eq!(
        insight(&dashboard, "gender_distribution"),
        Some("Most patients are **M** with 2 patients (66.7%).")
    );
    assert_eq!(
        insight(&dashboard, "condition_counts"),
        Some("The most common condition is **Flu** with 2 cases.")
    );

    let admissions = dashboard.chart("admissions_over_time").unwrap();
    let ChartSeries::Temporal(points) = &admissions.series else {
        panic!("admissions chart should be temporal");
    };
    let buckets: Vec<(&str, f64)> = points.iter().map(|p| (p.x.as_str(), p.value)).collect();
    assert_eq!(buckets, vec![("2023-01", 1.0), ("2023-02", 2.0)]);
    assert_eq!(admissions.kind, ChartKind::Line { markers: true });
    assert_eq!(admissions.x_label.as_deref(), Some("Date of Admission"));

    let funnel = dashboard.chart("patient_journey").unwrap();
    let ChartSeries::Categorical(stages) = &funnel.series else {
        panic!("funnel should be categorical");
    };
    let counts: Vec<f64> = stages.iter().map(|s| s.value).collect();
    assert_eq!(counts, vec![3.0, 2.0, 2.0]);
}

#[test]
fn test_padded_headers_are_trimmed() {
    let session = open("three_patients.csv");
    assert!(session.table().column_names().contains(&"Age".to_string()));
    assert_eq!(session.columns().age, "Age");
}

#[test]
fn test_ambiguous_admission_role_uses_first_match() {
    let session = open("three_patients.csv");
    let columns = session.columns();
    assert_eq!(columns.admission, "Date of Admission");

    let ambiguity = columns
        .ambiguities
        .iter()
        .find(|a| a.role == SemanticRole::Admission)
        .expect("admission should be ambiguous");
    assert_eq!(ambiguity.ignored, vec!["Admission Type".to_string()]);
}

// ============================================================================
// Filtering
// ============================================================================

#[test]
fn test_gender_filter_narrows_every_aggregate() {
    let mut session = open("three_patients.csv");
    let dashboard = session.set_gender_filter(["M"]).unwrap();

    assert_eq!(kpi_values(&dashboard), vec!["2", "40.0 yrs", "$125.00", "3.0 days"]);
    assert_eq!(dashboard.preview.rows.len(), 2);
    assert_eq!(
        insight(&dashboard, "gender_distribution"),
        Some("Most patients are **M** with 2 patients (100.0%).")
    );
}

#[test]
fn test_empty_selection_degrades_to_no_data() {
    let mut session = open("three_patients.csv");
    let dashboard = session.set_gender_filter(Vec::<String>::new()).unwrap();

    assert_eq!(kpi_values(&dashboard), vec!["0", "no data", "no data", "no data"]);
    assert_eq!(
        insight(&dashboard, "condition_counts"),
        Some("No data for the current filters.")
    );
    assert!(dashboard.extra_charts.iter().all(|c| c.series.is_empty()));

    let reset = session.reset_filters().unwrap();
    assert_eq!(reset.kpis[0].value, "3");
}

#[test]
fn test_blank_gender_rows_count_until_deselected() {
    let mut session = open("blank_gender.csv");
    let controls = session.filter_controls();
    assert_eq!(
        controls[0].options,
        vec!["M".to_string(), MISSING_OPTION.to_string(), "F".to_string()]
    );

    let dashboard = session.dashboard().unwrap();
    assert_eq!(dashboard.kpis[0].value, "3");

    let narrowed = session.set_gender_filter(["M", "F"]).unwrap();
    assert_eq!(narrowed.kpis[0].value, "2");
}

#[test]
fn test_ties_name_every_top_group() {
    let dashboard = open("ties.csv").dashboard().unwrap();
    assert_eq!(
        insight(&dashboard, "gender_distribution"),
        Some("Most patients are **M** and **F** with 2 patients each.")
    );
    assert_eq!(
        insight(&dashboard, "condition_counts"),
        Some("The most common conditions are **Flu** and **Cold** with 2 cases each.")
    );
}

// ============================================================================
// Optional Charts and Messy Data
// ============================================================================

#[test]
fn test_optional_charts_follow_columns() {
    let with = open("departments.csv").dashboard().unwrap();
    let sunburst = with.chart("insurance_by_department").unwrap();
    let ChartSeries::Hierarchical(nodes) = &sunburst.series else {
        panic!("sunburst should be hierarchical");
    };
    assert_eq!(nodes[0].label, "Cardiology");
    assert_eq!(nodes[0].value, 3.0);
    assert_eq!(
        with.chart("payment_methods").map(|c| c.kind),
        Some(ChartKind::Pie { hole: 0.5 })
    );

    let without = open("three_patients.csv").dashboard().unwrap();
    assert!(without.chart("insurance_by_department").is_none());
    assert!(without.chart("payment_methods").is_none());
}

#[test]
fn test_messy_values_are_cleaned_or_skipped() {
    let dashboard = open("messy.csv").dashboard().unwrap();

    assert_eq!(kpi_values(&dashboard), vec!["3", "40.0 yrs", "$767.25", "2.0 days"]);
    assert!(dashboard.notes.iter().any(|n| n.starts_with("1 rows without usable")));

    let admissions = dashboard.chart("admissions_over_time").unwrap();
    let ChartSeries::Temporal(points) = &admissions.series else {
        panic!("admissions chart should be temporal");
    };
    let total: f64 = points.iter().map(|p| p.value).sum();
    assert_eq!(total, 2.0);
}

#[test]
fn test_late_missing_marker_in_numeric_column_still_loads() {
    let session = open("late_missing_billing.csv");
    assert_eq!(session.table().rows(), 150);

    let dashboard = session.dashboard().unwrap();
    assert_eq!(dashboard.kpis[0].value, "150");
    assert_eq!(dashboard.kpis[2].value, "$174.50");
}

// ============================================================================
// Fatal Errors
// ============================================================================

#[test]
fn test_missing_required_column_is_fatal() {
    let err = DashboardSession::open(config_for("missing_billing.csv")).unwrap_err();
    assert!(matches!(
        err,
        DashboardError::ColumnResolution {
            role: SemanticRole::Billing,
            ..
        }
    ));
    assert_eq!(err.error_code(), "COLUMN_RESOLUTION_ERROR");
}

#[test]
fn test_missing_file_is_data_load_error() {
    let err = DashboardSession::open(config_for("does_not_exist.csv")).unwrap_err();
    assert_eq!(err.error_code(), "DATA_LOAD_ERROR");
}

#[test]
fn test_empty_file_is_data_load_error() {
    let err = DashboardSession::open(config_for("empty.csv")).unwrap_err();
    assert_eq!(err.error_code(), "DATA_LOAD_ERROR");
}

// ============================================================================
// Sampling
// ============================================================================

#[test]
fn test_large_tables_are_sampled_deterministically() {
    let config = DashboardConfig::default();
    let first = DatasetLoader::from_dataframe(synthetic_frame(2500), &config).unwrap();
    let second = DatasetLoader::from_dataframe(synthetic_frame(2500), &config).unwrap();

    assert_eq!(first.rows(), 2000);
    assert_eq!(first.original_rows(), 2500);
    assert!(first.was_sampled());
    assert!(first.frame().equals_missing(second.frame()));

    let session = DashboardSession::from_table(config, first).unwrap();
    let dashboard = session.dashboard().unwrap();
    assert_eq!(dashboard.kpis[0].value, "2000");
    assert_eq!(
        dashboard.notes,
        vec!["Showing a random sample of 2000 out of 2500 rows.".to_string()]
    );
    assert_eq!(dashboard.preview.rows.len(), 20);
}

#[test]
fn test_small_tables_are_not_sampled() {
    let table =
        DatasetLoader::from_dataframe(synthetic_frame(2000), &DashboardConfig::default()).unwrap();
    assert_eq!(table.rows(), 2000);
    assert!(!table.was_sampled());
}

// ============================================================================
// Output
// ============================================================================

#[test]
fn test_json_report_shape() {
    let dashboard = open("departments.csv").dashboard().unwrap();
    let json = serde_json::to_value(DashboardReport::new(&dashboard)).unwrap();

    assert_eq!(json["dashboard"]["title"], "Healthcare Data Dashboard");
    assert_eq!(json["dashboard"]["kpis"][0]["label"], "Total Patients");
    assert_eq!(json["dashboard"]["charts"][0]["kind"]["type"], "pie");
    assert_eq!(json["dashboard"]["filters"][1]["label"], "Select Medical Condition");
    assert!(json["generated_at"].is_string());
}

#[test]
fn test_terminal_rendering() {
    let dashboard = open("three_patients.csv").dashboard().unwrap();
    let mut surface = TerminalSurface::new(Vec::new());
    dashboard.render_to(&mut surface).unwrap();
    let text = String::from_utf8(surface.into_inner()).unwrap();

    assert!(text.contains("HEALTHCARE DATA DASHBOARD"));
    assert!(text.contains("Select Gender: 2 of 2 selected: M, F"));
    assert!(text.contains("Most patients are M with 2 patients (66.7%)."));
    assert!(text.contains("Extra Analytics"));
    assert!(text.contains("(3 of 3 rows shown)"));
}
