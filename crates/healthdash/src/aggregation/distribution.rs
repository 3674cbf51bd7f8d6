//! Ranked value counts with tie-aware top detection.
//!
//! Gender, condition and payment-method charts all go through
//! [`RankedDistribution`], so ties are handled the same way everywhere.

use serde::Serialize;
use std::collections::HashMap;

/// One group of a distribution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCount {
    pub value: String,
    pub count: usize,
    /// Share of the counted total, 0–100.
    pub percentage: f64,
}

/// Groups sorted by count, descending.
///
/// Groups with equal counts keep the order in which their value first
/// appeared in the input.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RankedDistribution {
    pub entries: Vec<CategoryCount>,
    /// Number of non-missing values counted.
    pub total: usize,
}

impl RankedDistribution {
    /// Count the non-missing values of a column.
    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: AsRef<str>,
    {
        let mut order: Vec<String> = Vec::new();
        let mut counts: HashMap<String, usize> = HashMap::new();

        for value in values.into_iter().flatten() {
            let value = value.as_ref();
            match counts.get_mut(value) {
                Some(count) => *count += 1,
                None => {
                    counts.insert(value.to_string(), 1);
                    order.push(value.to_string());
                }
            }
        }

        let total: usize = counts.values().sum();
        let mut entries: Vec<CategoryCount> = order
            .into_iter()
            .map(|value| {
                let count = counts[&value];
                CategoryCount {
                    percentage: (count as f64 / total as f64) * 100.0,
                    value,
                    count,
                }
            })
            .collect();
        // Stable sort keeps first-appearance order among equal counts.
        entries.sort_by(|a, b| b.count.cmp(&a.count));

        Self { entries, total }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every group sharing the maximum count. Empty when there is no data.
    pub fn top(&self) -> &[CategoryCount] {
        let Some(first) = self.entries.first() else {
            return &[];
        };
        let tied = self
            .entries
            .iter()
            .take_while(|entry| entry.count == first.count)
            .count();
        &self.entries[..tied]
    }

    /// True when two or more groups share the maximum count.
    pub fn has_tie(&self) -> bool {
        self.top().len() > 1
    }
}
