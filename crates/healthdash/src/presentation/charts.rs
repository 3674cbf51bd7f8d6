//! Chart descriptions handed to the charting collaborator.
//!
//! A [`ChartSpec`] says what to draw (kind, title, axis labels, palette) and
//! carries the data as a categorical, temporal, or hierarchical series. It
//! holds no drawing logic.

use serde::Serialize;

use crate::aggregation::{
    CategoryCount, DepartmentNode, FunnelStage, MonthlyCount, MonthlyTotal, RankedDistribution,
};

/// Qualitative "Set3" palette.
pub const SET3_PALETTE: [&str; 12] = [
    "#8dd3c7", "#ffffb3", "#bebada", "#fb8072", "#80b1d3", "#fdb462", "#b3de69", "#fccde5",
    "#d9d9d9", "#bc80bd", "#ccebc5", "#ffed6f",
];

/// How the series should be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChartKind {
    /// Pie, or donut when `hole > 0`.
    Pie { hole: f64 },
    Bar,
    Funnel,
    Sunburst,
    Line { markers: bool },
    Area,
}

/// A category and its value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryPoint {
    pub label: String,
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentage: Option<f64>,
}

/// A point on a time axis. `x` is a month label or an ISO timestamp.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimePoint {
    pub x: String,
    pub value: f64,
}

/// One sunburst sector, in flattened id/parent form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SunburstNode {
    pub id: String,
    pub label: String,
    /// Empty for the inner ring.
    pub parent: String,
    pub value: f64,
}

/// Chart data.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "shape", content = "points", rename_all = "snake_case")]
pub enum ChartSeries {
    Categorical(Vec<CategoryPoint>),
    Temporal(Vec<TimePoint>),
    Hierarchical(Vec<SunburstNode>),
}

impl ChartSeries {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Categorical(points) => points.is_empty(),
            Self::Temporal(points) => points.is_empty(),
            Self::Hierarchical(nodes) => nodes.is_empty(),
        }
    }
}

/// Everything needed to draw one chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    /// Stable identifier, e.g. `"gender_distribution"`.
    pub id: &'static str,
    pub title: String,
    pub kind: ChartKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_label: Option<String>,
    pub series: ChartSeries,
    pub palette: &'static [&'static str],
    /// Sentence shown under the chart.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insight: Option<String>,
}

impl ChartSpec {
    fn new(id: &'static str, title: &str, kind: ChartKind, series: ChartSeries) -> Self {
        Self {
            id,
            title: title.to_string(),
            kind,
            x_label: None,
            y_label: None,
            series,
            palette: &SET3_PALETTE,
            insight: None,
        }
    }

    fn axes(mut self, x: impl Into<String>, y: impl Into<String>) -> Self {
        self.x_label = Some(x.into());
        self.y_label = Some(y.into());
        self
    }

    /// Attach an insight sentence.
    pub fn with_insight(mut self, insight: impl Into<String>) -> Self {
        self.insight = Some(insight.into());
        self
    }
}

fn category_points(entries: &[CategoryCount]) -> Vec<CategoryPoint> {
    entries
        .iter()
        .map(|e| CategoryPoint {
            label: e.value.clone(),
            value: e.count as f64,
            percentage: Some(e.percentage),
        })
        .collect()
}

pub fn gender_pie(gender: &RankedDistribution) -> ChartSpec {
    ChartSpec::new(
        "gender_distribution",
        "Gender Distribution of Patients",
        ChartKind::Pie { hole: 0.0 },
        ChartSeries::Categorical(category_points(&gender.entries)),
    )
}

pub fn condition_bar(condition: &RankedDistribution) -> ChartSpec {
    ChartSpec::new(
        "condition_counts",
        "Patients by Medical Condition",
        ChartKind::Bar,
        ChartSeries::Categorical(category_points(&condition.entries)),
    )
    .axes("Condition", "Count")
}

pub fn journey_funnel(stages: &[FunnelStage]) -> ChartSpec {
    let points = stages
        .iter()
        .map(|s| CategoryPoint {
            label: s.stage.to_string(),
            value: s.count as f64,
            percentage: None,
        })
        .collect();
    ChartSpec::new(
        "patient_journey",
        "Patient Journey Funnel",
        ChartKind::Funnel,
        ChartSeries::Categorical(points),
    )
    .axes("Count", "Stage")
}

/// Department ring inside, insurance ring outside. Child ids are
/// `"<department>/<insurance>"` so equal insurance names stay distinct.
pub fn insurance_sunburst(nodes: &[DepartmentNode]) -> ChartSpec {
    let mut sectors = Vec::new();
    for dept in nodes {
        sectors.push(SunburstNode {
            id: dept.department.clone(),
            label: dept.department.clone(),
            parent: String::new(),
            value: dept.count as f64,
        });
        for ins in &dept.insurance {
            sectors.push(SunburstNode {
                id: format!("{}/{}", dept.department, ins.value),
                label: ins.value.clone(),
                parent: dept.department.clone(),
                value: ins.count as f64,
            });
        }
    }
    ChartSpec::new(
        "insurance_by_department",
        "Insurance Distribution Across Departments",
        ChartKind::Sunburst,
        ChartSeries::Hierarchical(sectors),
    )
}

pub fn payment_donut(payments: &RankedDistribution) -> ChartSpec {
    ChartSpec::new(
        "payment_methods",
        "Distribution of Payment Methods",
        ChartKind::Pie { hole: 0.5 },
        ChartSeries::Categorical(category_points(&payments.entries)),
    )
}

/// `admission_column` labels the x axis, as the month key is derived from it.
pub fn admissions_line(series: &[MonthlyCount], admission_column: &str) -> ChartSpec {
    let points = series
        .iter()
        .map(|m| TimePoint {
            x: m.month.clone(),
            value: m.count as f64,
        })
        .collect();
    ChartSpec::new(
        "admissions_over_time",
        "Admissions Over Time",
        ChartKind::Line { markers: true },
        ChartSeries::Temporal(points),
    )
    .axes(admission_column, "Count")
}

pub fn billing_area(series: &[MonthlyTotal]) -> ChartSpec {
    let points = series
        .iter()
        .map(|m| TimePoint {
            x: m.month_start.format("%Y-%m-%dT%H:%M:%S").to_string(),
            value: m.total,
        })
        .collect();
    ChartSpec::new(
        "billing_over_time",
        "Total Billing Amount Over Time",
        ChartKind::Area,
        ChartSeries::Temporal(points),
    )
    .axes("Admission Month", "Total Billing")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregation::{insurance_by_department, patient_journey, parse_timestamp};

    #[test]
    fn test_gender_pie_points() {
        let dist = RankedDistribution::from_values([Some("M"), Some("F"), Some("M")]);
        let chart = gender_pie(&dist);
        assert_eq!(chart.kind, ChartKind::Pie { hole: 0.0 });
        let ChartSeries::Categorical(points) = &chart.series else {
            panic!("expected categorical series");
        };
        assert_eq!(points[0].label, "M");
        assert_eq!(points[0].value, 2.0);
        assert_eq!(chart.palette.len(), 12);
    }

    #[test]
    fn test_payment_donut_has_hole() {
        let dist = RankedDistribution::from_values([Some("Cash")]);
        assert_eq!(payment_donut(&dist).kind, ChartKind::Pie { hole: 0.5 });
    }

    #[test]
    fn test_funnel_stage_order() {
        let chart = journey_funnel(&patient_journey(10));
        let ChartSeries::Categorical(points) = &chart.series else {
            panic!("expected categorical series");
        };
        let labels: Vec<&str> = points.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["Admitted", "Under Treatment", "Discharged"]);
        assert_eq!(points[2].value, 7.0);
    }

    #[test]
    fn test_sunburst_flattening() {
        let departments = vec![Some("A".to_string()), Some("B".to_string())];
        let insurance = vec![Some("X".to_string()), Some("X".to_string())];
        let chart = insurance_sunburst(&insurance_by_department(&departments, &insurance));
        let ChartSeries::Hierarchical(nodes) = &chart.series else {
            panic!("expected hierarchical series");
        };
        assert_eq!(nodes.len(), 4);
        assert_eq!(nodes[1].id, "A/X");
        assert_eq!(nodes[1].parent, "A");
        assert_eq!(nodes[3].id, "B/X");
    }

    #[test]
    fn test_billing_area_keys_by_month_start() {
        let totals = vec![MonthlyTotal {
            month_start: parse_timestamp("2023-02-01").unwrap(),
            total: 350.0,
        }];
        let chart = billing_area(&totals);
        let ChartSeries::Temporal(points) = &chart.series else {
            panic!("expected temporal series");
        };
        assert_eq!(points[0].x, "2023-02-01T00:00:00");
        assert_eq!(chart.y_label.as_deref(), Some("Total Billing"));
    }

    #[test]
    fn test_chart_serialization_shape() {
        let chart = admissions_line(
            &[MonthlyCount {
                month: "2023-01".to_string(),
                count: 1,
            }],
            "Date of Admission",
        );
        let json = serde_json::to_value(&chart).unwrap();
        assert_eq!(json["kind"]["type"], "line");
        assert_eq!(json["kind"]["markers"], true);
        assert_eq!(json["series"]["shape"], "temporal");
        assert_eq!(json["series"]["points"][0]["x"], "2023-01");
        assert_eq!(json["x_label"], "Date of Admission");
    }
}
