//! Scalar metrics and the synthetic patient journey funnel.

use chrono::NaiveDateTime;
use serde::Serialize;

use super::dates::stay_days;
use crate::utils::{mean_skip_missing, round_to};

/// Headline numbers for the filtered view.
///
/// Averages are `None` when the view holds no usable values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Kpis {
    pub total_patients: usize,
    /// Mean age, 1 decimal place.
    pub avg_age: Option<f64>,
    /// Mean billing amount, 2 decimal places.
    pub avg_billing: Option<f64>,
    /// Mean stay in days, 1 decimal place.
    pub avg_stay_days: Option<f64>,
}

impl Kpis {
    pub fn compute(
        total_patients: usize,
        ages: &[Option<f64>],
        billing: &[Option<f64>],
        stays: &[Option<i64>],
    ) -> Self {
        Self {
            total_patients,
            avg_age: mean_skip_missing(ages.iter().copied()).map(|v| round_to(v, 1)),
            avg_billing: mean_skip_missing(billing.iter().copied()).map(|v| round_to(v, 2)),
            avg_stay_days: mean_skip_missing(stays.iter().map(|s| s.map(|d| d as f64)))
                .map(|v| round_to(v, 1)),
        }
    }
}

/// Per-row stay length; `None` where either date is missing.
pub fn stay_lengths(
    admissions: &[Option<NaiveDateTime>],
    discharges: &[Option<NaiveDateTime>],
) -> Vec<Option<i64>> {
    admissions
        .iter()
        .zip(discharges)
        .map(|(admission, discharge)| match (admission, discharge) {
            (Some(a), Some(d)) => Some(stay_days(*a, *d)),
            _ => None,
        })
        .collect()
}

/// One stage of the patient journey funnel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunnelStage {
    pub stage: &'static str,
    pub count: usize,
}

/// Illustrative three-stage funnel derived from the patient count alone.
///
/// The stages are not backed by treatment fields in the data:
/// admitted = total, under treatment = ⌊total × 0.8⌋,
/// discharged = ⌊total × 0.75⌋.
pub fn patient_journey(total: usize) -> Vec<FunnelStage> {
    vec![
        FunnelStage {
            stage: "Admitted",
            count: total,
        },
        FunnelStage {
            stage: "Under Treatment",
            count: total * 4 / 5,
        },
        FunnelStage {
            stage: "Discharged",
            count: total * 3 / 4,
        },
    ]
}
