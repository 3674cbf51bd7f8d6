//! One-sentence takeaways shown under the gender and condition charts.

use crate::aggregation::{CategoryCount, RankedDistribution};

/// Shown in place of an insight when the filtered view is empty.
pub const NO_DATA_INSIGHT: &str = "No data for the current filters.";

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{} {}", count, noun)
    } else {
        format!("{} {}s", count, noun)
    }
}

/// `**a**`, `**a** and **b**`, `**a**, **b** and **c**`.
fn join_bold(groups: &[CategoryCount]) -> String {
    let names: Vec<String> = groups.iter().map(|g| format!("**{}**", g.value)).collect();
    match names.split_last() {
        Some((last, rest)) if !rest.is_empty() => format!("{} and {}", rest.join(", "), last),
        Some((last, _)) => last.clone(),
        None => String::new(),
    }
}

fn ranked_insight(
    dist: &RankedDistribution,
    single: impl FnOnce(&CategoryCount) -> String,
    tied: impl FnOnce(&str, usize) -> String,
) -> String {
    match dist.top() {
        [] => NO_DATA_INSIGHT.to_string(),
        [top] => single(top),
        groups => tied(&join_bold(groups), groups[0].count),
    }
}

pub fn gender_insight(gender: &RankedDistribution) -> String {
    ranked_insight(
        gender,
        |top| {
            format!(
                "Most patients are **{}** with {} ({:.1}%).",
                top.value,
                plural(top.count, "patient"),
                top.percentage
            )
        },
        |names, count| format!("Most patients are {} with {} each.", names, plural(count, "patient")),
    )
}

pub fn condition_insight(condition: &RankedDistribution) -> String {
    ranked_insight(
        condition,
        |top| {
            format!(
                "The most common condition is **{}** with {}.",
                top.value,
                plural(top.count, "case")
            )
        },
        |names, count| {
            format!(
                "The most common conditions are {} with {} each.",
                names,
                plural(count, "case")
            )
        },
    )
}
