//! Planner configuration
//!
//! Holidays, resource catalogs and plan layouts are loaded once from TOML and
//! validated before any assignment runs. A malformed resource entry rejects
//! the whole configuration.
//!
//! ```toml
//! [holidays]
//! "2025-12-25" = "Christmas"
//!
//! [[groups]]
//! name = "GRID"
//! resources = [{ name = "ana", level = "SENIOR", max_tasks = 4 }]
//!
//! [[testers]]
//! name = "qa1"
//! level = "PLENO"
//!
//! [plans.testing]
//! hours_col = "qaHours"
//! ```

use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tracing::debug;

use crate::catalog::{Level, Resource, ResourceCatalog, ResourcePool, DEFAULT_MAX_TASKS};
use crate::plan::{PlanConfig, PlanConfigPatch, PlanType};
use crate::{Calendar, ConfigError, HolidaySet};

const BUILTIN_TOML: &str = include_str!("../defaults.toml");

/// Everything an assignment run needs besides the rows
#[derive(Clone, Debug, PartialEq)]
pub struct PlannerConfig {
    pub holidays: HolidaySet,
    pub catalog: ResourceCatalog,
    plans: HashMap<PlanType, PlanConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    holidays: BTreeMap<String, String>,
    #[serde(default)]
    groups: Vec<RawGroup>,
    #[serde(default)]
    testers: Vec<RawResource>,
    #[serde(default)]
    plans: BTreeMap<String, PlanConfigPatch>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawGroup {
    name: String,
    #[serde(default)]
    resources: Vec<RawResource>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawResource {
    name: String,
    level: Option<String>,
    max_tasks: Option<i64>,
    #[serde(default)]
    skills: Vec<String>,
}

impl RawResource {
    fn validate(self, pool: &str) -> Result<Resource, ConfigError> {
        let level = match self.level.as_deref().map(str::trim) {
            None | Some("") => {
                return Err(ConfigError::MissingLevel {
                    pool: pool.to_string(),
                    resource: self.name,
                })
            }
            Some(text) => text.parse::<Level>().map_err(|level| ConfigError::UnknownLevel {
                pool: pool.to_string(),
                resource: self.name.clone(),
                level,
            })?,
        };

        let max_tasks = self.max_tasks.unwrap_or(DEFAULT_MAX_TASKS as i64);
        let max_tasks = u32::try_from(max_tasks)
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| ConfigError::InvalidCapacity {
                pool: pool.to_string(),
                resource: self.name.clone(),
                max_tasks,
            })?;

        Ok(Resource {
            name: self.name,
            level,
            max_tasks,
            skills: self.skills,
        })
    }
}

fn validate_pool(raw: Vec<RawResource>, pool: &str) -> Result<ResourcePool, ConfigError> {
    raw.into_iter().map(|r| r.validate(pool)).collect()
}

impl PlannerConfig {
    /// The configuration shipped with the crate
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_toml_str(BUILTIN_TOML)
    }

    /// Read and validate a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading planner configuration");
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(text)?;

        let holidays = HolidaySet::from_iso_map(raw.holidays)?;

        let groups = raw
            .groups
            .into_iter()
            .map(|group| Ok((group.name.clone(), validate_pool(group.resources, &group.name)?)))
            .collect::<Result<Vec<_>, ConfigError>>()?;
        let testers = validate_pool(raw.testers, "testers")?;
        let catalog = ResourceCatalog::new(groups, testers)?;

        let mut plans: HashMap<PlanType, PlanConfig> = PlanType::ALL
            .into_iter()
            .map(|plan| (plan, PlanConfig::for_plan(plan)))
            .collect();
        for (name, patch) in raw.plans {
            let plan_type: PlanType = name.parse()?;
            if let Some(plan) = plans.get_mut(&plan_type) {
                patch.apply(plan);
            }
        }

        debug!(
            holidays = holidays.len(),
            groups = catalog.group_names().count(),
            developers = catalog.all_developers().len(),
            testers = catalog.testers().len(),
            "planner configuration loaded"
        );

        Ok(Self {
            holidays,
            catalog,
            plans,
        })
    }

    /// Working-day calendar built from the configured holidays
    pub fn calendar(&self) -> Calendar {
        Calendar::new(self.holidays.clone())
    }

    /// Column layout for a plan type
    pub fn plan(&self, plan: PlanType) -> PlanConfig {
        self.plans
            .get(&plan)
            .cloned()
            .unwrap_or_else(|| PlanConfig::for_plan(plan))
    }
}
