//! Two-level grouping: department, then insurance provider.

use serde::Serialize;

use super::distribution::{CategoryCount, RankedDistribution};

/// One department and the insurance mix inside it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartmentNode {
    pub department: String,
    pub count: usize,
    pub insurance: Vec<CategoryCount>,
}

/// Count rows by department, then by insurance within each department.
///
/// Rows missing either value are left out, matching how a sunburst drops
/// incomplete paths. Departments are ordered by size, largest first.
pub fn insurance_by_department(
    departments: &[Option<String>],
    insurance: &[Option<String>],
) -> Vec<DepartmentNode> {
    let pairs: Vec<(&str, &str)> = departments
        .iter()
        .zip(insurance)
        .filter_map(|(d, i)| Some((d.as_deref()?, i.as_deref()?)))
        .collect();

    let ranked = RankedDistribution::from_values(pairs.iter().map(|(d, _)| Some(*d)));

    ranked
        .entries
        .into_iter()
        .map(|dept| {
            let inner = RankedDistribution::from_values(
                pairs
                    .iter()
                    .filter(|(d, _)| *d == dept.value)
                    .map(|(_, i)| Some(*i)),
            );
            DepartmentNode {
                department: dept.value,
                count: dept.count,
                insurance: inner.entries,
            }
        })
        .collect()
}
