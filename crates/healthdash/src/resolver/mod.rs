//! Column resolution: binding semantic roles to concrete column names.
//!
//! Healthcare exports rarely agree on headers ("Gender", "Patient Gender",
//! "Billing Amount", "billing_usd" ...). Each required [`SemanticRole`] is
//! bound to the first column whose name contains the role keyword, compared
//! case-insensitively, scanning columns in header order.
//!
//! When more than one column matches, the first still wins. The extra
//! candidates are recorded in [`ResolvedColumns::ambiguities`] and logged as
//! warnings so the choice is visible.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

use crate::error::{DashboardError, Result};

/// Exact name of the optional department column.
pub const DEPARTMENT_COLUMN: &str = "Department";

/// Exact name of the optional payment method column.
pub const PAYMENT_METHOD_COLUMN: &str = "PaymentMethod";

/// A semantic category that must be bound to one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SemanticRole {
    Gender,
    Condition,
    Admission,
    Discharge,
    Billing,
    Insurance,
    Age,
}

impl SemanticRole {
    /// All required roles, in resolution order.
    pub const ALL: [SemanticRole; 7] = [
        SemanticRole::Gender,
        SemanticRole::Condition,
        SemanticRole::Admission,
        SemanticRole::Discharge,
        SemanticRole::Billing,
        SemanticRole::Insurance,
        SemanticRole::Age,
    ];

    /// Lowercase substring a column name must contain to fill this role.
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Gender => "gender",
            Self::Condition => "condition",
            Self::Admission => "admission",
            Self::Discharge => "discharge",
            Self::Billing => "billing",
            Self::Insurance => "insurance",
            Self::Age => "age",
        }
    }

    fn matches(&self, column: &str) -> bool {
        column.to_lowercase().contains(self.keyword())
    }
}

impl fmt::Display for SemanticRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A role with more than one matching column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmbiguousRole {
    pub role: SemanticRole,
    /// The column that was bound.
    pub chosen: String,
    /// Later columns that also matched and were ignored.
    pub ignored: Vec<String>,
}

/// The role → column binding for one dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedColumns {
    pub gender: String,
    pub condition: String,
    pub admission: String,
    pub discharge: String,
    pub billing: String,
    pub insurance: String,
    pub age: String,
    /// `Department`, when present.
    pub department: Option<String>,
    /// `PaymentMethod`, when present.
    pub payment_method: Option<String>,
    /// Roles where more than one column matched.
    pub ambiguities: Vec<AmbiguousRole>,
}

impl ResolvedColumns {
    /// Column bound to `role`.
    pub fn column(&self, role: SemanticRole) -> &str {
        match role {
            SemanticRole::Gender => &self.gender,
            SemanticRole::Condition => &self.condition,
            SemanticRole::Admission => &self.admission,
            SemanticRole::Discharge => &self.discharge,
            SemanticRole::Billing => &self.billing,
            SemanticRole::Insurance => &self.insurance,
            SemanticRole::Age => &self.age,
        }
    }
}

/// Resolves semantic roles against an ordered header.
pub struct ColumnResolver;

impl ColumnResolver {
    /// Bind every required role, or fail naming the first missing one.
    pub fn resolve<S: AsRef<str>>(columns: &[S]) -> Result<ResolvedColumns> {
        let mut ambiguities = Vec::new();
        let mut bind = |role: SemanticRole| -> Result<String> {
            let mut matches = columns
                .iter()
                .map(AsRef::as_ref)
                .filter(|name| role.matches(name));

            let chosen = matches
                .next()
                .ok_or_else(|| DashboardError::unresolved(role))?
                .to_string();
            let ignored: Vec<String> = matches.map(str::to_string).collect();

            if ignored.is_empty() {
                debug!("Role '{}' bound to column '{}'", role, chosen);
            } else {
                warn!(
                    "Role '{}' matches several columns; using '{}' and ignoring {:?}",
                    role, chosen, ignored
                );
                ambiguities.push(AmbiguousRole {
                    role,
                    chosen: chosen.clone(),
                    ignored,
                });
            }

            Ok(chosen)
        };

        let gender = bind(SemanticRole::Gender)?;
        let condition = bind(SemanticRole::Condition)?;
        let admission = bind(SemanticRole::Admission)?;
        let discharge = bind(SemanticRole::Discharge)?;
        let billing = bind(SemanticRole::Billing)?;
        let insurance = bind(SemanticRole::Insurance)?;
        let age = bind(SemanticRole::Age)?;

        let optional = |exact: &str| {
            columns
                .iter()
                .map(AsRef::as_ref)
                .find(|name| *name == exact)
                .map(str::to_string)
        };

        Ok(ResolvedColumns {
            gender,
            condition,
            admission,
            discharge,
            billing,
            insurance,
            age,
            department: optional(DEPARTMENT_COLUMN),
            payment_method: optional(PAYMENT_METHOD_COLUMN),
            ambiguities,
        })
    }
}
