//! Plan types and their column layouts
//!
//! The same assignment algorithm runs over spreadsheets whose column names
//! depend on the business process. `PlanConfig` names the columns that carry
//! the resource, hours and dates for one plan type.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::warn;

use crate::ConfigError;

/// Business process a row set belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanType {
    Development,
    Maintenance,
    Support,
    Testing,
}

impl PlanType {
    pub const ALL: [PlanType; 4] = [
        PlanType::Development,
        PlanType::Maintenance,
        PlanType::Support,
        PlanType::Testing,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PlanType::Development => "development",
            PlanType::Maintenance => "maintenance",
            PlanType::Support => "support",
            PlanType::Testing => "testing",
        }
    }

    /// Label used by the upstream spreadsheets
    pub fn label(&self) -> &'static str {
        match self {
            PlanType::Development => "Plan de Desarrollo",
            PlanType::Maintenance => "Plan de Mantenimiento",
            PlanType::Support => "Plan de Soporte",
            PlanType::Testing => "Plan de Pruebas",
        }
    }

    /// Parse a plan name, falling back to `Development` for unknown names
    pub fn from_name_or_default(name: &str) -> Self {
        name.parse().unwrap_or_else(|_| {
            warn!(plan = name, "unknown plan type, using development layout");
            PlanType::Development
        })
    }
}

impl std::fmt::Display for PlanType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlanType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        PlanType::ALL
            .into_iter()
            .find(|plan| {
                plan.as_str().eq_ignore_ascii_case(trimmed)
                    || plan.label().eq_ignore_ascii_case(trimmed)
            })
            .ok_or_else(|| ConfigError::UnknownPlanType(trimmed.to_string()))
    }
}

/// Kind of resource a plan assigns
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResourceRole {
    Developer,
    Tester,
}

/// Column layout and assignment switches for one plan type
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanConfig {
    /// Column holding the assigned resource name
    pub resource_col: String,
    /// Column holding the task effort in hours
    pub hours_col: String,
    /// Column holding the date the task becomes available
    pub available_date_col: String,
    /// Column holding the planned date, used when the available date is empty
    pub plan_date_col: String,
    pub start_date_col: String,
    pub end_date_col: String,
    /// Column holding the technical group tag
    pub group_col: String,
    /// Singular resource title ("Developer", "Tester")
    pub resource_title: String,
    /// Pick candidates from the row's group pool instead of the role pool
    pub use_group_based_assignment: bool,
}

impl PlanConfig {
    /// Default layout for a plan type
    pub fn for_plan(plan: PlanType) -> Self {
        let testing = plan == PlanType::Testing;
        Self {
            resource_col: "abapAssigned".into(),
            hours_col: if testing { "abapTestTime" } else { "abapDevelopmentTime" }.into(),
            available_date_col: "effortReadyDate".into(),
            plan_date_col: "plannedAbapDevStart".into(),
            start_date_col: "plannedAbapDevStart".into(),
            end_date_col: "plannedAbapDevEnd".into(),
            group_col: "grupo_dev".into(),
            resource_title: if testing { "Tester" } else { "Developer" }.into(),
            use_group_based_assignment: !testing,
        }
    }

    /// Role derived from the resource title
    pub fn role(&self) -> ResourceRole {
        if self.resource_title.contains("Developer") {
            ResourceRole::Developer
        } else {
            ResourceRole::Tester
        }
    }
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self::for_plan(PlanType::Development)
    }
}

/// Partial override of a `PlanConfig`, as written in configuration files
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlanConfigPatch {
    pub resource_col: Option<String>,
    pub hours_col: Option<String>,
    pub available_date_col: Option<String>,
    pub plan_date_col: Option<String>,
    pub start_date_col: Option<String>,
    pub end_date_col: Option<String>,
    pub group_col: Option<String>,
    pub resource_title: Option<String>,
    pub use_group_based_assignment: Option<bool>,
}

impl PlanConfigPatch {
    pub fn apply(self, base: &mut PlanConfig) {
        fn set<T>(target: &mut T, value: Option<T>) {
            if let Some(value) = value {
                *target = value;
            }
        }
        set(&mut base.resource_col, self.resource_col);
        set(&mut base.hours_col, self.hours_col);
        set(&mut base.available_date_col, self.available_date_col);
        set(&mut base.plan_date_col, self.plan_date_col);
        set(&mut base.start_date_col, self.start_date_col);
        set(&mut base.end_date_col, self.end_date_col);
        set(&mut base.group_col, self.group_col);
        set(&mut base.resource_title, self.resource_title);
        set(&mut base.use_group_based_assignment, self.use_group_based_assignment);
    }
}
