//! Resource catalogs
//!
//! Resources are grouped into named pools (one per technical group) plus a
//! testers pool. Pools are ordered: iteration order decides which resource
//! wins a first-fit assignment, so it is never re-sorted.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::debug;

use crate::{ConfigError, GroupName, ResourceName};

/// Capacity used when a resource entry does not declare `max_tasks`
pub const DEFAULT_MAX_TASKS: u32 = 15;

/// Seniority tier of a resource
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Level {
    Junior,
    Pleno,
    SemiSenior,
    Senior,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Junior => "JUNIOR",
            Level::Pleno => "PLENO",
            Level::SemiSenior => "SEMI_SENIOR",
            Level::Senior => "SENIOR",
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "JUNIOR" => Ok(Level::Junior),
            "PLENO" => Ok(Level::Pleno),
            "SEMI_SENIOR" | "SEMISENIOR" => Ok(Level::SemiSenior),
            "SENIOR" => Ok(Level::Senior),
            _ => Err(s.to_string()),
        }
    }
}

/// A developer or tester that tasks can be assigned to
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    /// Unique name within its pool
    pub name: ResourceName,
    /// Seniority tier
    pub level: Level,
    /// Maximum number of tasks bound to this resource at once
    pub max_tasks: u32,
    /// Skill tags
    pub skills: Vec<String>,
}

impl Resource {
    /// Create a resource with the default capacity
    pub fn new(name: impl Into<String>, level: Level) -> Self {
        Self {
            name: name.into(),
            level,
            max_tasks: DEFAULT_MAX_TASKS,
            skills: Vec::new(),
        }
    }

    /// Set the capacity
    pub fn max_tasks(mut self, max_tasks: u32) -> Self {
        self.max_tasks = max_tasks;
        self
    }

    /// Add a skill tag
    pub fn skill(mut self, skill: impl Into<String>) -> Self {
        self.skills.push(skill.into());
        self
    }

    pub fn has_skill(&self, skill: &str) -> bool {
        self.skills.iter().any(|s| s.eq_ignore_ascii_case(skill))
    }
}

/// Ordered sequence of resources
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResourcePool {
    resources: Vec<Resource>,
}

impl ResourcePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a resource. A resource with the same name is replaced in place,
    /// keeping its original position.
    pub fn upsert(&mut self, resource: Resource) {
        match self.resources.iter_mut().find(|r| r.name == resource.name) {
            Some(existing) => *existing = resource,
            None => self.resources.push(resource),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Resource> {
        self.resources.iter().find(|r| r.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Resource> {
        self.resources.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.resources.iter().map(|r| r.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Total capacity across the pool
    pub fn total_capacity(&self) -> u64 {
        self.resources.iter().map(|r| r.max_tasks as u64).sum()
    }

    fn validate(&self, pool: &str) -> Result<(), ConfigError> {
        for (idx, resource) in self.resources.iter().enumerate() {
            if resource.max_tasks == 0 {
                return Err(ConfigError::InvalidCapacity {
                    pool: pool.to_string(),
                    resource: resource.name.clone(),
                    max_tasks: 0,
                });
            }
            if self.resources[..idx].iter().any(|r| r.name == resource.name) {
                return Err(ConfigError::DuplicateResource {
                    pool: pool.to_string(),
                    resource: resource.name.clone(),
                });
            }
        }
        Ok(())
    }
}

impl FromIterator<Resource> for ResourcePool {
    fn from_iter<T: IntoIterator<Item = Resource>>(iter: T) -> Self {
        Self {
            resources: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ResourcePool {
    type Item = &'a Resource;
    type IntoIter = std::slice::Iter<'a, Resource>;

    fn into_iter(self) -> Self::IntoIter {
        self.resources.iter()
    }
}

/// Which pool a lookup asks for
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CatalogKey<'a> {
    /// A technical group; unknown groups fall back to `AllDevelopers`
    Group(&'a str),
    /// Every developer group flattened into one pool
    AllDevelopers,
    Testers,
}

/// Static catalog of developer groups and testers
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResourceCatalog {
    groups: Vec<(GroupName, ResourcePool)>,
    testers: ResourcePool,
    all_developers: ResourcePool,
}

impl ResourceCatalog {
    /// Build and validate a catalog.
    ///
    /// Every resource needs a positive capacity and a name unique within its
    /// pool; group names must be unique ignoring case.
    pub fn new(
        groups: Vec<(GroupName, ResourcePool)>,
        testers: ResourcePool,
    ) -> Result<Self, ConfigError> {
        for (idx, (name, pool)) in groups.iter().enumerate() {
            if groups[..idx].iter().any(|(other, _)| other.eq_ignore_ascii_case(name)) {
                return Err(ConfigError::DuplicateGroup(name.clone()));
            }
            pool.validate(name)?;
        }
        testers.validate("testers")?;

        let mut all_developers = ResourcePool::new();
        for (_, pool) in &groups {
            for resource in pool {
                all_developers.upsert(resource.clone());
            }
        }

        Ok(Self {
            groups,
            testers,
            all_developers,
        })
    }

    /// Look up a group pool, ignoring case
    pub fn group(&self, name: &str) -> Option<&ResourcePool> {
        let name = name.trim();
        self.groups
            .iter()
            .find(|(group, _)| group.eq_ignore_ascii_case(name))
            .map(|(_, pool)| pool)
    }

    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|(name, _)| name.as_str())
    }

    pub fn groups(&self) -> impl Iterator<Item = (&str, &ResourcePool)> {
        self.groups.iter().map(|(name, pool)| (name.as_str(), pool))
    }

    /// Union of every group, first position wins, last definition wins
    pub fn all_developers(&self) -> &ResourcePool {
        &self.all_developers
    }

    pub fn testers(&self) -> &ResourcePool {
        &self.testers
    }

    /// Candidate pool for a lookup key
    pub fn resources_for(&self, key: CatalogKey<'_>) -> &ResourcePool {
        match key {
            CatalogKey::Group(name) => match self.group(name) {
                Some(pool) => pool,
                None => {
                    debug!(group = name, "unknown group, using all developers");
                    &self.all_developers
                }
            },
            CatalogKey::AllDevelopers => &self.all_developers,
            CatalogKey::Testers => &self.testers,
        }
    }
}
