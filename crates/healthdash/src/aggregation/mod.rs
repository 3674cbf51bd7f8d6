//! Aggregation pipeline over the filtered view.
//!
//! Each aggregate is a pure function of the view. [`Aggregates::compute`]
//! extracts the role columns once, parses dates into derived vectors (the
//! view itself is never modified), and builds every KPI and chart input.
//!
//! An empty view is valid input: counts are zero, averages are `None`, and
//! every series is empty.

pub mod dates;
pub mod distribution;
pub mod hierarchy;
pub mod kpis;
pub mod timeline;

pub use dates::{YearMonth, parse_timestamp, stay_days};
pub use distribution::{CategoryCount, RankedDistribution};
pub use hierarchy::{DepartmentNode, insurance_by_department};
pub use kpis::{FunnelStage, Kpis, patient_journey};
pub use timeline::{MonthlyCount, MonthlyTotal, admissions_by_month, billing_by_month};

use polars::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::error::{Result, ResultExt};
use crate::resolver::ResolvedColumns;
use crate::utils::{column_as_f64, column_as_strings};

/// Everything the dashboard shows, before formatting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Aggregates {
    pub kpis: Kpis,
    pub gender: RankedDistribution,
    pub condition: RankedDistribution,
    pub funnel: Vec<FunnelStage>,
    /// Present only when the dataset has a `Department` column.
    pub insurance_by_department: Option<Vec<DepartmentNode>>,
    /// Present only when the dataset has a `PaymentMethod` column.
    pub payment_methods: Option<RankedDistribution>,
    pub admissions_over_time: Vec<MonthlyCount>,
    pub billing_over_time: Vec<MonthlyTotal>,
    /// Rows left out of stay and time-series aggregates for an unparsable
    /// or missing admission/discharge date.
    pub rows_with_bad_dates: usize,
}

impl Aggregates {
    /// Compute every aggregate for `view`.
    pub fn compute(view: &DataFrame, columns: &ResolvedColumns) -> Result<Self> {
        let total = view.height();

        let ages = column_as_f64(view, &columns.age).context("Reading age column")?;
        let billing = column_as_f64(view, &columns.billing).context("Reading billing column")?;
        let admissions = dates::parse_timestamp_column(view, &columns.admission)
            .context("Reading admission column")?;
        let discharges = dates::parse_timestamp_column(view, &columns.discharge)
            .context("Reading discharge column")?;

        let stays = kpis::stay_lengths(&admissions, &discharges);
        let rows_with_bad_dates = stays.iter().filter(|s| s.is_none()).count();
        if rows_with_bad_dates > 0 {
            debug!(
                "{} of {} rows excluded from date aggregates",
                rows_with_bad_dates, total
            );
        }

        let gender = RankedDistribution::from_values(column_as_strings(view, &columns.gender)?);
        let condition =
            RankedDistribution::from_values(column_as_strings(view, &columns.condition)?);

        let insurance_by_department = match &columns.department {
            Some(department) => Some(insurance_by_department(
                &column_as_strings(view, department)?,
                &column_as_strings(view, &columns.insurance)?,
            )),
            None => None,
        };

        let payment_methods = match &columns.payment_method {
            Some(payment) => Some(RankedDistribution::from_values(column_as_strings(
                view, payment,
            )?)),
            None => None,
        };

        Ok(Self {
            kpis: Kpis::compute(total, &ages, &billing, &stays),
            gender,
            condition,
            funnel: patient_journey(total),
            insurance_by_department,
            payment_methods,
            admissions_over_time: admissions_by_month(&admissions),
            billing_over_time: billing_by_month(&admissions, &billing),
            rows_with_bad_dates,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::ColumnResolver;
    use crate::utils::column_names;
    use pretty_assertions::assert_eq;

    fn three_patients() -> DataFrame {
        df!(
            "gender" => &["M", "F", "M"],
            "condition" => &["Flu", "Flu", "Cold"],
            "admission" => &["2023-01-01", "2023-02-01", "2023-02-10"],
            "discharge" => &["2023-01-05", "2023-02-03", "2023-02-12"],
            "billing" => &[100.0, 200.0, 150.0],
            "insurance" => &["X", "Y", "X"],
            "age" => &[30i64, 40, 50]
        )
        .unwrap()
    }

    fn compute(df: &DataFrame) -> Aggregates {
        let columns = ColumnResolver::resolve(&column_names(df)).unwrap();
        Aggregates::compute(df, &columns).unwrap()
    }

    #[test]
    fn test_three_patient_scenario() {
        let agg = compute(&three_patients());

        assert_eq!(agg.kpis.total_patients, 3);
        assert_eq!(agg.kpis.avg_age, Some(40.0));
        assert_eq!(agg.kpis.avg_billing, Some(150.0));
        assert_eq!(agg.kpis.avg_stay_days, Some(2.7));

        assert_eq!(agg.gender.entries[0].value, "M");
        assert_eq!(agg.gender.entries[0].count, 2);
        assert_eq!(agg.gender.entries[1].value, "F");
        assert_eq!(agg.gender.entries[1].count, 1);

        assert_eq!(
            agg.admissions_over_time,
            vec![
                MonthlyCount { month: "2023-01".to_string(), count: 1 },
                MonthlyCount { month: "2023-02".to_string(), count: 2 },
            ]
        );
        assert_eq!(agg.billing_over_time[1].total, 350.0);
        assert_eq!(agg.rows_with_bad_dates, 0);
        assert!(agg.insurance_by_department.is_none());
        assert!(agg.payment_methods.is_none());
    }

    #[test]
    fn test_empty_view_reports_no_data() {
        let df = three_patients().head(Some(0));
        let agg = compute(&df);

        assert_eq!(agg.kpis.total_patients, 0);
        assert_eq!(agg.kpis.avg_age, None);
        assert_eq!(agg.kpis.avg_billing, None);
        assert_eq!(agg.kpis.avg_stay_days, None);
        assert!(agg.gender.is_empty());
        assert!(agg.condition.is_empty());
        assert!(agg.admissions_over_time.is_empty());
        assert!(agg.billing_over_time.is_empty());
        assert!(agg.funnel.iter().all(|s| s.count == 0));
    }

    #[test]
    fn test_bad_dates_are_excluded_not_fatal() {
        let df = df!(
            "gender" => &["M", "F", "M"],
            "condition" => &["Flu", "Flu", "Cold"],
            "admission" => &["2023-01-01", "someday", "2023-02-10"],
            "discharge" => &["2023-01-05", "2023-02-03", "2023-02-12"],
            "billing" => &[100.0, 200.0, 150.0],
            "insurance" => &["X", "Y", "X"],
            "age" => &[30i64, 40, 50]
        )
        .unwrap();
        let agg = compute(&df);

        assert_eq!(agg.rows_with_bad_dates, 1);
        assert_eq!(agg.kpis.avg_stay_days, Some(3.0));
        let total: usize = agg.admissions_over_time.iter().map(|m| m.count).sum();
        assert_eq!(total, 2);
        // Non-date KPIs still cover every row.
        assert_eq!(agg.kpis.avg_age, Some(40.0));
    }

    #[test]
    fn test_optional_charts_when_columns_exist() {
        let df = df!(
            "gender" => &["M", "F", "M"],
            "condition" => &["Flu", "Flu", "Cold"],
            "admission" => &["2023-01-01", "2023-02-01", "2023-02-10"],
            "discharge" => &["2023-01-05", "2023-02-03", "2023-02-12"],
            "billing" => &[100.0, 200.0, 150.0],
            "insurance" => &["X", "Y", "X"],
            "age" => &[30i64, 40, 50],
            "Department" => &["Cardio", "Cardio", "Neuro"],
            "PaymentMethod" => &["Cash", "Card", "Card"]
        )
        .unwrap();
        let agg = compute(&df);

        let departments = agg.insurance_by_department.unwrap();
        assert_eq!(departments[0].department, "Cardio");
        assert_eq!(departments[0].count, 2);

        let payments = agg.payment_methods.unwrap();
        assert_eq!(payments.entries[0].value, "Card");
        assert_eq!(payments.entries[0].count, 2);
    }
}
