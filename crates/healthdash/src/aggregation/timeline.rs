//! Calendar-month time series keyed on admission date.

use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::BTreeMap;

use super::dates::YearMonth;

/// Admissions counted in one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyCount {
    /// `YYYY-MM`.
    pub month: String,
    pub count: usize,
}

/// Billing summed over one month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyTotal {
    /// First instant of the month.
    pub month_start: NaiveDateTime,
    pub total: f64,
}

/// Rows per admission month, oldest first. Rows without a parsable
/// admission date are skipped.
pub fn admissions_by_month(admissions: &[Option<NaiveDateTime>]) -> Vec<MonthlyCount> {
    let mut buckets: BTreeMap<YearMonth, usize> = BTreeMap::new();
    for ts in admissions.iter().flatten() {
        *buckets.entry(YearMonth::of(ts)).or_insert(0) += 1;
    }

    buckets
        .into_iter()
        .map(|(month, count)| MonthlyCount {
            month: month.to_string(),
            count,
        })
        .collect()
}

/// Billing sum per admission month, oldest first.
///
/// A month appears as soon as it has one dated row; missing billing values
/// add nothing to its sum.
pub fn billing_by_month(
    admissions: &[Option<NaiveDateTime>],
    billing: &[Option<f64>],
) -> Vec<MonthlyTotal> {
    let mut buckets: BTreeMap<YearMonth, f64> = BTreeMap::new();
    for (ts, amount) in admissions.iter().zip(billing) {
        if let Some(ts) = ts {
            *buckets.entry(YearMonth::of(ts)).or_insert(0.0) += amount.unwrap_or(0.0);
        }
    }

    buckets
        .into_iter()
        .map(|(month, total)| MonthlyTotal {
            month_start: month.start(),
            total,
        })
        .collect()
}
